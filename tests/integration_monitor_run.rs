mod common;

use async_trait::async_trait;
use axum::http::StatusCode;
use codevault_monitor::{
    BackendClient, Monitor, MonitorConfig, Probe, ResultsManager, RetrievalKind, RunOutcome,
    Sample,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// Probe that succeeds instantly and counts how often it was asked
#[derive(Default)]
struct CountingProbe {
    calls: AtomicUsize,
}

#[async_trait]
impl Probe for CountingProbe {
    async fn p2p_download(&self, cid: &str) -> Sample {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Sample::measured(RetrievalKind::P2p, cid, Duration::from_millis(50), 4096)
    }

    async fn centralized_download(&self, url: &str) -> Sample {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Sample::measured(RetrievalKind::Centralized, url, Duration::from_millis(200), 4096)
    }
}

fn monitor(config: MonitorConfig) -> Monitor<CountingProbe> {
    let backend = BackendClient::new(&config).unwrap();
    Monitor::new(config, backend, CountingProbe::default())
}

fn calls(monitor: &Monitor<CountingProbe>) -> usize {
    monitor.probe().calls.load(Ordering::SeqCst)
}

#[tokio::test]
async fn offline_backend_halts_before_sampling() {
    let dir = tempfile::tempdir().unwrap();
    let base = common::spawn(common::unhealthy_backend(StatusCode::SERVICE_UNAVAILABLE)).await;
    let config = MonitorConfig {
        output_file: dir.path().join("results.json"),
        ..common::config_for(&base)
    };
    let monitor = monitor(config);

    let outcome = monitor.run().await.unwrap();

    assert!(matches!(outcome, RunOutcome::BackendOffline(_)));
    assert_eq!(calls(&monitor), 0);
    assert!(!dir.path().join("results.json").exists());
}

#[tokio::test]
async fn unreachable_backend_halts_before_sampling() {
    let dir = tempfile::tempdir().unwrap();
    let base = common::refused_url().await;
    let config = MonitorConfig {
        output_file: dir.path().join("results.json"),
        cids: vec!["bafkreigh2akiscaildc".to_string()],
        ..common::config_for(&base)
    };
    let monitor = monitor(config);

    let outcome = monitor.run().await.unwrap();

    assert!(matches!(outcome, RunOutcome::BackendOffline(_)));
    assert_eq!(calls(&monitor), 0);
}

#[tokio::test]
async fn dashboard_failures_do_not_stop_the_run() {
    let dir = tempfile::tempdir().unwrap();
    let base = common::spawn(common::backend_without_node()).await;
    let output_file = dir.path().join("results.json");
    let config = MonitorConfig {
        output_file: output_file.clone(),
        ..common::config_for(&base)
    };
    let monitor = monitor(config);

    let result = match monitor.run().await.unwrap() {
        RunOutcome::Completed(result) => result,
        other => panic!("expected a completed run, got {:?}", other),
    };

    // One URL, two iterations, no CIDs
    assert_eq!(calls(&monitor), 2);
    assert!(result.samples(RetrievalKind::P2p).is_empty());
    assert!(result.summary_for(RetrievalKind::P2p).is_none());
    assert!(result.demo_p2p.is_some());

    let document = ResultsManager::new(&output_file).load().unwrap();
    assert_eq!(document.result.run_id, result.run_id);
    assert_eq!(document.result.samples(RetrievalKind::Centralized).len(), 2);
    let stats = document.result.summary_for(RetrievalKind::Centralized).unwrap();
    assert_eq!(stats.avg_latency_ms, 200.0);
    assert_eq!(stats.std_dev, 0.0);
}

#[tokio::test]
async fn full_run_samples_both_paths_in_order() {
    let dir = tempfile::tempdir().unwrap();
    let base = common::spawn(common::healthy_backend()).await;
    let config = MonitorConfig {
        output_file: dir.path().join("results.json"),
        cids: vec!["bafyfirst".to_string(), "bafysecond".to_string()],
        demo_p2p: false,
        ..common::config_for(&base)
    };
    let monitor = monitor(config);

    let result = match monitor.run().await.unwrap() {
        RunOutcome::Completed(result) => result,
        other => panic!("expected a completed run, got {:?}", other),
    };

    assert_eq!(calls(&monitor), 2 * 2 + 2);
    let p2p: Vec<&str> = result
        .samples(RetrievalKind::P2p)
        .iter()
        .map(|s| s.target())
        .collect();
    assert_eq!(p2p, vec!["bafyfirst", "bafyfirst", "bafysecond", "bafysecond"]);
    assert_eq!(result.summary_for(RetrievalKind::P2p).unwrap().samples, 4);
    assert!(result.demo_p2p.is_none());
}

#[cfg(feature = "charts")]
#[tokio::test]
async fn chart_is_written_when_enabled() {
    let dir = tempfile::tempdir().unwrap();
    let base = common::spawn(common::healthy_backend()).await;
    let chart_file = dir.path().join("chart.svg");
    let config = MonitorConfig {
        output_file: dir.path().join("results.json"),
        chart_file: chart_file.clone(),
        chart: true,
        ..common::config_for(&base)
    };

    let outcome = monitor(config).run().await.unwrap();

    assert!(matches!(outcome, RunOutcome::Completed(_)));
    let svg = std::fs::read_to_string(&chart_file).unwrap();
    assert!(svg.contains("<svg"));
}

#[tokio::test]
async fn dashboard_command_requires_healthy_backend() {
    let online = common::spawn(common::healthy_backend()).await;
    assert!(monitor(common::config_for(&online)).dashboard().await.is_ok());

    let offline = common::spawn(common::unhealthy_backend(StatusCode::INTERNAL_SERVER_ERROR)).await;
    assert!(monitor(common::config_for(&offline)).dashboard().await.is_err());
}

#[tokio::test]
async fn probe_command_covers_urls_and_cids() {
    let base = common::spawn(common::healthy_backend()).await;
    let monitor = Monitor::from_config(common::config_for(&base)).unwrap();

    let results = monitor
        .probe_latency(
            &[format!("{}/files/readme", base)],
            &["bafyprobe".to_string()],
        )
        .await;

    assert_eq!(results.len(), 2);
    assert!(results[0].success);
    assert_eq!(results[1].url, format!("{}/ipfs/bafyprobe", base));
    // The mock serves no gateway, so the CID probe reaches it and gets a 404
    assert_eq!(results[1].status, Some(404));
}
