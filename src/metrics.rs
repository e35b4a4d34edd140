use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::utils::{calculate_stats, round2};

/// The two compared download strategies
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RetrievalKind {
    /// Content fetched by CID through the backend's IPFS node
    P2p,
    /// Plain HTTP(S) download from a public URL
    Centralized,
}

impl std::fmt::Display for RetrievalKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RetrievalKind::P2p => write!(f, "P2P (IPFS)"),
            RetrievalKind::Centralized => write!(f, "Centralized"),
        }
    }
}

/// One measured retrieval attempt and its outcome
///
/// Successful samples always carry non-negative latency and size; failed
/// samples always carry a non-empty error and zeroed measurements. Fields are
/// private so those invariants cannot be broken after construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    #[serde(rename = "type")]
    kind: RetrievalKind,
    target: String,
    latency_ms: f64,
    size_bytes: u64,
    speed_mbps: f64,
    success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl Sample {
    /// A successful sample whose throughput is derived from size and elapsed time
    pub fn measured(kind: RetrievalKind, target: &str, elapsed: Duration, size_bytes: u64) -> Self {
        let speed_mbps = throughput_mbps(size_bytes, elapsed);
        Self::reported(kind, target, elapsed, size_bytes, speed_mbps)
    }

    /// A successful sample whose throughput was reported by the remote side
    pub fn reported(
        kind: RetrievalKind,
        target: &str,
        elapsed: Duration,
        size_bytes: u64,
        speed_mbps: f64,
    ) -> Self {
        Self {
            kind,
            target: target.to_string(),
            latency_ms: round2(elapsed.as_secs_f64() * 1000.0),
            size_bytes,
            speed_mbps: if speed_mbps.is_finite() { speed_mbps.max(0.0) } else { 0.0 },
            success: true,
            error: None,
        }
    }

    /// A failed sample carrying a diagnostic
    pub fn failed(kind: RetrievalKind, target: &str, error: impl Into<String>) -> Self {
        let error = error.into();
        let error = if error.trim().is_empty() {
            "unknown error".to_string()
        } else {
            error
        };

        Self {
            kind,
            target: target.to_string(),
            latency_ms: 0.0,
            size_bytes: 0,
            speed_mbps: 0.0,
            success: false,
            error: Some(error),
        }
    }

    pub fn kind(&self) -> RetrievalKind {
        self.kind
    }

    /// URL or content identifier the sample was taken against
    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn latency_ms(&self) -> f64 {
        self.latency_ms
    }

    pub fn size_bytes(&self) -> u64 {
        self.size_bytes
    }

    pub fn speed_mbps(&self) -> f64 {
        self.speed_mbps
    }

    pub fn is_success(&self) -> bool {
        self.success
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }
}

/// Throughput in megabits per second, rounded to 2 decimal places
///
/// A zero elapsed time yields 0 rather than a division by zero.
pub fn throughput_mbps(size_bytes: u64, elapsed: Duration) -> f64 {
    let secs = elapsed.as_secs_f64();
    if secs > 0.0 {
        round2(size_bytes as f64 * 8.0 / secs / 1_000_000.0)
    } else {
        0.0
    }
}

/// Latency summary over the successful samples of one retrieval kind
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryStatistics {
    pub samples: usize,
    pub avg_latency_ms: f64,
    pub min_latency_ms: f64,
    pub max_latency_ms: f64,
    /// Sample standard deviation; 0 for a single sample
    pub std_dev: f64,
    pub avg_speed_mbps: f64,
}

impl SummaryStatistics {
    /// Summarize the successful samples, or `None` when there are none
    pub fn from_samples<'a, I>(samples: I) -> Option<Self>
    where
        I: IntoIterator<Item = &'a Sample>,
    {
        let successful: Vec<&Sample> = samples.into_iter().filter(|s| s.is_success()).collect();
        let latencies: Vec<f64> = successful.iter().map(|s| s.latency_ms()).collect();
        let (mean, min, max, std_dev) = calculate_stats(&latencies)?;

        let avg_speed =
            successful.iter().map(|s| s.speed_mbps()).sum::<f64>() / successful.len() as f64;

        Some(Self {
            samples: successful.len(),
            avg_latency_ms: round2(mean),
            min_latency_ms: round2(min),
            max_latency_ms: round2(max),
            std_dev: round2(std_dev),
            avg_speed_mbps: round2(avg_speed),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn centralized(ms: u64) -> Sample {
        Sample::measured(
            RetrievalKind::Centralized,
            "https://example.com",
            Duration::from_millis(ms),
            1000,
        )
    }

    #[test]
    fn test_throughput_mbps() {
        // 1 MB in one second is 8 Mbps
        assert_eq!(throughput_mbps(1_000_000, Duration::from_secs(1)), 8.0);
        assert_eq!(throughput_mbps(125_000, Duration::from_millis(500)), 2.0);
        assert_eq!(throughput_mbps(1000, Duration::from_millis(3)), 2.67);
        assert_eq!(throughput_mbps(1_000_000, Duration::ZERO), 0.0);
    }

    #[test]
    fn test_measured_sample() {
        let sample = centralized(250);

        assert!(sample.is_success());
        assert_eq!(sample.kind(), RetrievalKind::Centralized);
        assert_eq!(sample.latency_ms(), 250.0);
        assert_eq!(sample.size_bytes(), 1000);
        assert_eq!(sample.speed_mbps(), 0.03);
        assert!(sample.error().is_none());
    }

    #[test]
    fn test_failed_sample_always_has_error() {
        let sample = Sample::failed(RetrievalKind::P2p, "QmA", "");
        assert!(!sample.is_success());
        assert_eq!(sample.error(), Some("unknown error"));

        let sample = Sample::failed(RetrievalKind::P2p, "QmA", "connection refused");
        assert_eq!(sample.error(), Some("connection refused"));
        assert_eq!(sample.latency_ms(), 0.0);
    }

    #[test]
    fn test_reported_speed_is_sanitized() {
        let sample = Sample::reported(
            RetrievalKind::P2p,
            "QmA",
            Duration::from_millis(10),
            10,
            f64::NAN,
        );
        assert_eq!(sample.speed_mbps(), 0.0);
    }

    #[test]
    fn test_summary_statistics() {
        let samples = vec![centralized(100), centralized(200), centralized(300)];
        let summary = SummaryStatistics::from_samples(&samples).unwrap();

        assert_eq!(summary.samples, 3);
        assert_eq!(summary.avg_latency_ms, 200.0);
        assert_eq!(summary.min_latency_ms, 100.0);
        assert_eq!(summary.max_latency_ms, 300.0);
        assert_eq!(summary.std_dev, 100.0);
    }

    #[test]
    fn test_summary_single_sample_has_zero_std_dev() {
        let samples = vec![centralized(120)];
        let summary = SummaryStatistics::from_samples(&samples).unwrap();

        assert_eq!(summary.samples, 1);
        assert_eq!(summary.avg_latency_ms, 120.0);
        assert_eq!(summary.std_dev, 0.0);
    }

    #[test]
    fn test_summary_ignores_failures() {
        let samples = vec![
            centralized(100),
            Sample::failed(RetrievalKind::Centralized, "https://example.com", "timeout"),
            centralized(300),
        ];
        let summary = SummaryStatistics::from_samples(&samples).unwrap();

        assert_eq!(summary.samples, 2);
        assert_eq!(summary.avg_latency_ms, 200.0);
        assert_eq!(summary.min_latency_ms, 100.0);
    }

    #[test]
    fn test_summary_absent_without_successes() {
        let failed = vec![Sample::failed(RetrievalKind::P2p, "QmA", "timeout")];
        assert!(SummaryStatistics::from_samples(&failed).is_none());
        assert!(SummaryStatistics::from_samples(&Vec::<Sample>::new()).is_none());
    }

    #[test]
    fn test_retrieval_kind_display_and_serde() {
        assert_eq!(RetrievalKind::P2p.to_string(), "P2P (IPFS)");
        assert_eq!(RetrievalKind::Centralized.to_string(), "Centralized");
        assert_eq!(serde_json::to_string(&RetrievalKind::P2p).unwrap(), "\"p2p\"");
        assert_eq!(
            serde_json::to_string(&RetrievalKind::Centralized).unwrap(),
            "\"centralized\""
        );
    }
}
