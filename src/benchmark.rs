//! # Benchmark Engine Module
//!
//! Drives the samplers over every target and assembles a
//! [`BenchmarkResult`].
//!
//! ## Execution Model
//!
//! Targets and iterations run strictly one after another: each sample is
//! awaited to completion (or timeout) before the next one starts, so samples
//! never compete for bandwidth. There are no retries; a failed sample is
//! logged, counted and dropped.
//!
//! ## Progress Output
//!
//! One line per target and per iteration is logged as sampling proceeds so
//! a long run visibly makes progress.

use chrono::Utc;
use std::collections::BTreeMap;
use tracing::{info, warn};

use crate::metrics::{RetrievalKind, Sample};
use crate::results::BenchmarkResult;
use crate::sampler::Probe;
use crate::utils::truncate_id;

/// Runs the sampling loop for both retrieval kinds
pub struct BenchmarkRunner<'a, P: Probe + ?Sized> {
    probe: &'a P,
    iterations: usize,
}

impl<'a, P: Probe + ?Sized> BenchmarkRunner<'a, P> {
    pub fn new(probe: &'a P, iterations: usize) -> Self {
        Self { probe, iterations }
    }

    /// Sample every CID over P2P and every URL over the centralized path
    pub async fn run(&self, cids: &[String], urls: &[String]) -> BenchmarkResult {
        let timestamp = Utc::now();
        let mut failures = BTreeMap::new();

        let mut p2p_results = Vec::new();
        if !cids.is_empty() {
            info!("");
            info!("📡 Testing P2P Downloads...");
            for cid in cids {
                info!("   Testing CID: {}", truncate_id(cid, 20));
                self.sample_target(RetrievalKind::P2p, cid, &mut p2p_results, &mut failures)
                    .await;
            }
        }

        let mut centralized_results = Vec::new();
        if !urls.is_empty() {
            info!("");
            info!("🌐 Testing Centralized Downloads...");
            for url in urls {
                info!("   Testing: {}", truncate_id(url, 50));
                self.sample_target(
                    RetrievalKind::Centralized,
                    url,
                    &mut centralized_results,
                    &mut failures,
                )
                .await;
            }
        }

        BenchmarkResult::new(
            timestamp,
            self.iterations,
            p2p_results,
            centralized_results,
            failures,
        )
    }

    async fn sample_target(
        &self,
        kind: RetrievalKind,
        target: &str,
        successes: &mut Vec<Sample>,
        failures: &mut BTreeMap<RetrievalKind, usize>,
    ) {
        for i in 1..=self.iterations {
            let sample = self.probe.sample(kind, target).await;

            if sample.is_success() {
                info!(
                    "      Iteration {}: {}ms, {} Mbps",
                    i,
                    sample.latency_ms(),
                    sample.speed_mbps()
                );
                successes.push(sample);
            } else {
                warn!(
                    "      Iteration {}: Failed - {}",
                    i,
                    sample.error().unwrap_or("Unknown error")
                );
                *failures.entry(kind).or_insert(0) += 1;
            }
        }
    }
}
