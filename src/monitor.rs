//! # Monitor Run
//!
//! The sequence the binary performs by default:
//!
//! 1. **Health gate**: `GET /api/health`; anything but 200 ends the run
//!    before a single sample is taken
//! 2. **Dashboard**: peer and bandwidth snapshot
//! 3. **Benchmark**: every CID over P2P, every URL over HTTP
//! 4. **Report**: summary table, then the results file
//! 5. **Chart**: optional SVG comparison

use anyhow::{Context, Result};
use colored::*;
use tracing::{error, info, warn};

use crate::benchmark::BenchmarkRunner;
use crate::chart::{self, CHARTS_AVAILABLE};
use crate::cli::MonitorConfig;
use crate::client::BackendClient;
use crate::dashboard;
use crate::error::BackendError;
use crate::metrics::RetrievalKind;
use crate::report;
use crate::results::{BenchmarkResult, ResultsManager};
use crate::sampler::{HttpProbe, Probe, ProbeResult};
use crate::utils::truncate_id;

const URL_DISPLAY_CHARS: usize = 60;

/// How a run ended
#[derive(Debug)]
pub enum RunOutcome {
    /// The health check failed; nothing was sampled
    BackendOffline(BackendError),
    Completed(BenchmarkResult),
}

/// Top-level driver for a monitor run
pub struct Monitor<P: Probe> {
    config: MonitorConfig,
    backend: BackendClient,
    probe: P,
}

/// What the chart step does for a finished run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ChartStep {
    /// Not requested; nothing is printed
    Skip,
    /// Requested, but the binary was built without the `charts` feature
    Unavailable,
    /// Requested, but there is no centralized data to compare against
    NoData,
    Render,
}

fn chart_step(requested: bool, available: bool, has_centralized: bool) -> ChartStep {
    match (requested, available, has_centralized) {
        (false, _, _) => ChartStep::Skip,
        (true, false, _) => ChartStep::Unavailable,
        (true, true, false) => ChartStep::NoData,
        (true, true, true) => ChartStep::Render,
    }
}

impl Monitor<HttpProbe> {
    /// Monitor backed by real HTTP samplers
    pub fn from_config(config: MonitorConfig) -> Result<Self> {
        let backend = BackendClient::new(&config).context("Failed to build HTTP client")?;
        let probe = HttpProbe::new(&config).context("Failed to build HTTP client")?;
        Ok(Self::new(config, backend, probe))
    }

    /// Time one GET per URL, then one per CID through the gateway
    ///
    /// Prints a line per target and returns every result in order.
    pub async fn probe_latency(&self, urls: &[String], cids: &[String]) -> Vec<ProbeResult> {
        let targets = urls
            .iter()
            .cloned()
            .chain(cids.iter().map(|cid| self.config.gateway_url_for(cid)));

        let mut results = Vec::new();
        for url in targets {
            let result = self.probe.measure_latency(&url).await;
            match (&result.latency_ms, &result.error) {
                (Some(ms), None) => info!(
                    "✅ {}: {}ms ({} bytes)",
                    truncate_id(&url, URL_DISPLAY_CHARS),
                    ms,
                    result.size_bytes.unwrap_or(0)
                ),
                (_, err) => warn!(
                    "❌ {}: {}",
                    truncate_id(&url, URL_DISPLAY_CHARS),
                    err.as_deref().unwrap_or("unknown error")
                ),
            }
            results.push(result);
        }
        results
    }
}

impl<P: Probe> Monitor<P> {
    pub fn new(config: MonitorConfig, backend: BackendClient, probe: P) -> Self {
        Self {
            config,
            backend,
            probe,
        }
    }

    pub fn config(&self) -> &MonitorConfig {
        &self.config
    }

    pub fn probe(&self) -> &P {
        &self.probe
    }

    /// Check the backend, printing the outcome
    pub async fn check_backend(&self) -> Result<(), BackendError> {
        match self.backend.health().await {
            Ok(()) => {
                info!("✅ Backend is online");
                Ok(())
            }
            Err(e) => {
                error!("❌ Backend is offline ({}). Please start the backend server first.", e);
                error!("   Run: cd backend && npm start");
                Err(e)
            }
        }
    }

    /// Health gate followed by the dashboard
    pub async fn dashboard(&self) -> Result<(), BackendError> {
        self.print_banner();
        self.check_backend().await?;
        dashboard::show(&self.backend).await;
        Ok(())
    }

    /// Full run: health gate, dashboard, benchmark, report, chart
    pub async fn run(&self) -> Result<RunOutcome> {
        self.print_banner();
        if let Err(e) = self.check_backend().await {
            return Ok(RunOutcome::BackendOffline(e));
        }

        dashboard::show(&self.backend).await;

        println!();
        println!("{}", "-".repeat(60));
        if self.config.cids.is_empty() {
            println!("{}", "📌 Demo Mode: Testing with sample URLs".bold());
        } else {
            println!("{}", "🚀 CodeVault Performance Benchmark".bold());
        }
        println!("{}", "-".repeat(60));

        let runner = BenchmarkRunner::new(&self.probe, self.config.iterations);
        let mut result = runner.run(&self.config.cids, &self.config.urls).await;
        if self.config.demo_p2p {
            result = result.with_demo_p2p();
        }

        report::print_summary(&result);
        ResultsManager::new(&self.config.output_file).save(&result)?;

        println!();
        println!("{}", "=".repeat(60));
        println!("{}", "✅ Monitoring complete!".green().bold());
        println!("{}", "=".repeat(60));

        self.render_chart(&result);
        Ok(RunOutcome::Completed(result))
    }

    fn render_chart(&self, result: &BenchmarkResult) {
        let step = chart_step(
            self.config.chart,
            CHARTS_AVAILABLE,
            !result.samples(RetrievalKind::Centralized).is_empty(),
        );
        match step {
            ChartStep::Skip => return,
            ChartStep::Unavailable => {
                warn!("⚠️  Cannot generate chart: built without the `charts` feature");
                return;
            }
            ChartStep::NoData => {
                warn!("⚠️  Skipping chart: no successful centralized samples");
                return;
            }
            ChartStep::Render => {}
        }

        info!("");
        info!("📈 Generating performance graph...");
        match chart::render_comparison_chart(result, &self.config.chart_file) {
            Ok(()) => info!("📊 Graph saved to: {}", self.config.chart_file.display()),
            Err(e) => warn!("⚠️  Failed to generate chart: {:#}", e),
        }
    }

    fn print_banner(&self) {
        println!();
        println!("{}", "=".repeat(60));
        println!("{}", "🔒 CodeVault Performance Monitor".bold());
        println!("{}", "=".repeat(60));
        println!("Backend URL: {}", self.backend.base_url());
        println!("IPFS Gateway: {}", self.config.gateway_url);
    }
}
