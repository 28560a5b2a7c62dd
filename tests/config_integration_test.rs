//! Configuration loading against the checked-in config directory

mod common;

use common::{config_dir, MockOperationSource};
use settle_core::config::{ConfigManager, LogFormat};
use settle_core::orchestration::{BatchSubmitter, ConfirmationPoller, PollCadence};
use settle_core::resilience::RetryOrchestrator;
use std::time::Duration;

fn load(environment: &str) -> std::sync::Arc<ConfigManager> {
    ConfigManager::load_with_env_source(Some(config_dir()), environment, Some(Default::default()))
        .expect("checked-in configuration should load")
}

#[test]
fn test_development_uses_base_file() {
    common::setup();
    let manager = load("development");
    let config = manager.config();

    assert_eq!(config.retry.max_retries, 3);
    assert_eq!(config.retry.retry_delay_ms, 2000);
    assert_eq!(config.polling.cadence(), PollCadence::Fixed(Duration::from_secs(1)));
    assert_eq!(config.submission.default_batch_size, 3);
    assert_eq!(config.logging.format, LogFormat::Pretty);
}

#[test]
fn test_test_environment_shortens_timings() {
    common::setup();
    let manager = load("test");
    let config = manager.config();

    assert_eq!(config.retry.max_retries, 3);
    assert_eq!(config.retry.retry_delay_ms, 10);
    assert_eq!(config.polling.timeout(), Duration::from_secs(2));
    assert_eq!(config.logging.level, "debug");
}

#[test]
fn test_production_enables_backoff_and_json_logs() {
    common::setup();
    let manager = load("production");
    let config = manager.config();

    assert!(matches!(
        config.polling.cadence(),
        PollCadence::Exponential { multiplier, .. } if (multiplier - 1.5).abs() < f64::EPSILON
    ));
    assert_eq!(config.logging.format, LogFormat::Json);
}

#[test]
fn test_detected_environment_after_setup() {
    common::setup();
    let environment = settle_core::test_utils::test_environment();

    assert_eq!(ConfigManager::detect_environment(), environment);
    let manager = load(&environment);
    assert_eq!(manager.environment(), environment);
}

#[tokio::test]
async fn test_components_built_from_config_run_a_flow() -> anyhow::Result<()> {
    common::setup();
    let manager = load("test");
    let config = manager.config();

    let orchestrator = RetryOrchestrator::from_config("config_flow", &config.retry);
    let submitter = BatchSubmitter::from_config(&config.submission);
    let poller = ConfirmationPoller::from_config(&config.polling);
    let source = MockOperationSource::confirming_immediately(0..3);
    let count = config.submission.default_batch_size;
    let timeout = config.polling.timeout();

    let (submitter, poller, source) = (&submitter, &poller, &source);

    let resolved = orchestrator
        .run(move || {
            async move {
                let batch = submitter.submit(source, count).await?;
                let result = poller.await_all_within(source, &batch, timeout).await?;
                Ok::<usize, anyhow::Error>(result.resolved_count())
            }
        })
        .await?;

    assert_eq!(resolved, 3);
    Ok(())
}
