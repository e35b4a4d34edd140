use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use uuid::Uuid;

use crate::metrics::{RetrievalKind, Sample, SummaryStatistics};

/// Complete outcome of one benchmark run
///
/// Built once by the orchestrator and then only read. Only successful
/// samples are kept in the per-kind sequences; failed attempts are counted
/// in `failures`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BenchmarkResult {
    pub run_id: Uuid,
    pub timestamp: DateTime<Utc>,
    pub iterations: usize,
    pub p2p_results: Vec<Sample>,
    pub centralized_results: Vec<Sample>,
    pub failures: BTreeMap<RetrievalKind, usize>,
    /// Only kinds with at least one successful sample appear here
    pub summary: BTreeMap<RetrievalKind, SummaryStatistics>,
    /// Illustrative P2P figures; never measured data
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub demo_p2p: Option<DemoFigures>,
}

impl BenchmarkResult {
    /// Assemble a result and compute the per-kind summaries
    pub fn new(
        timestamp: DateTime<Utc>,
        iterations: usize,
        p2p_results: Vec<Sample>,
        centralized_results: Vec<Sample>,
        failures: BTreeMap<RetrievalKind, usize>,
    ) -> Self {
        let mut summary = BTreeMap::new();
        for (kind, samples) in [
            (RetrievalKind::P2p, &p2p_results),
            (RetrievalKind::Centralized, &centralized_results),
        ] {
            if let Some(stats) = SummaryStatistics::from_samples(samples) {
                summary.insert(kind, stats);
            }
        }

        Self {
            run_id: Uuid::new_v4(),
            timestamp,
            iterations,
            p2p_results,
            centralized_results,
            failures,
            summary,
            demo_p2p: None,
        }
    }

    pub fn samples(&self, kind: RetrievalKind) -> &[Sample] {
        match kind {
            RetrievalKind::P2p => &self.p2p_results,
            RetrievalKind::Centralized => &self.centralized_results,
        }
    }

    pub fn summary_for(&self, kind: RetrievalKind) -> Option<&SummaryStatistics> {
        self.summary.get(&kind)
    }

    pub fn failures_for(&self, kind: RetrievalKind) -> usize {
        self.failures.get(&kind).copied().unwrap_or(0)
    }

    /// Attach demo P2P figures when there is no real P2P data to compare
    ///
    /// No-op when a P2P summary exists or no centralized summary exists.
    pub fn with_demo_p2p(mut self) -> Self {
        if self.summary_for(RetrievalKind::P2p).is_none() {
            if let Some(centralized) = self.summary_for(RetrievalKind::Centralized) {
                self.demo_p2p = Some(DemoFigures::from_centralized(centralized));
            }
        }
        self
    }
}

/// Synthetic P2P figures derived from the centralized summary
///
/// Exists only so a comparison chart can be drawn before any CID has been
/// benchmarked. Always serialized with `"synthetic": true`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DemoFigures {
    pub synthetic: bool,
    pub avg_latency_ms: f64,
    pub min_latency_ms: f64,
    pub max_latency_ms: f64,
    pub latencies_ms: Vec<f64>,
}

impl DemoFigures {
    pub fn from_centralized(centralized: &SummaryStatistics) -> Self {
        let avg = centralized.avg_latency_ms * 0.3;
        Self {
            synthetic: true,
            avg_latency_ms: avg,
            min_latency_ms: centralized.min_latency_ms * 0.2,
            max_latency_ms: centralized.max_latency_ms * 0.4,
            latencies_ms: (-2..=2).map(|i| avg + f64::from(i) * 5.0).collect(),
        }
    }
}

/// System information for reproducibility
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemInfo {
    pub os: String,
    pub architecture: String,
    pub cpu_cores: usize,
    pub monitor_version: String,
}

impl Default for SystemInfo {
    fn default() -> Self {
        Self {
            os: std::env::consts::OS.to_string(),
            architecture: std::env::consts::ARCH.to_string(),
            cpu_cores: num_cpus::get(),
            monitor_version: crate::VERSION.to_string(),
        }
    }
}

/// Document written to the results file
#[derive(Debug, Serialize, Deserialize)]
pub struct ResultsDocument {
    pub system_info: SystemInfo,
    #[serde(flatten)]
    pub result: BenchmarkResult,
}

/// Writes benchmark results to the output file
pub struct ResultsManager {
    output_file: PathBuf,
}

impl ResultsManager {
    pub fn new(output_file: &Path) -> Self {
        Self {
            output_file: output_file.to_path_buf(),
        }
    }

    pub fn output_file(&self) -> &Path {
        &self.output_file
    }

    /// Write `result` as pretty JSON, replacing any previous file
    pub fn save(&self, result: &BenchmarkResult) -> Result<()> {
        let document = ResultsDocument {
            system_info: SystemInfo::default(),
            result: result.clone(),
        };

        let json = serde_json::to_string_pretty(&document)?;
        std::fs::write(&self.output_file, json)
            .with_context(|| format!("Failed to write results to {:?}", self.output_file))?;

        debug!("Wrote run {} to {:?}", result.run_id, self.output_file);
        info!("💾 Results saved to: {}", self.output_file.display());
        Ok(())
    }

    /// Read a previously written results file
    pub fn load(&self) -> Result<ResultsDocument> {
        let json = std::fs::read_to_string(&self.output_file)
            .with_context(|| format!("Failed to read results from {:?}", self.output_file))?;
        Ok(serde_json::from_str(&json)?)
    }
}
