//! # CodeVault Performance Monitor
//!
//! Measures and compares download performance of two retrieval paths:
//!
//! - **P2P (IPFS)**: content fetched by CID through the CodeVault backend's
//!   benchmarking endpoint
//! - **Centralized**: plain HTTP(S) downloads from public URLs
//!
//! ## Architecture Overview
//!
//! - `cli`: Command-line parsing and the [`MonitorConfig`] value built from it
//! - `client`: Typed access to the backend HTTP API
//! - `sampler`: The [`Probe`] seam and its HTTP implementation
//! - `benchmark`: Sequential orchestration of samples into a [`BenchmarkResult`]
//! - `metrics`: Samples, retrieval kinds and summary statistics
//! - `results`: The persisted result document and demo figures
//! - `report` / `dashboard`: Console rendering
//! - `chart`: Optional SVG comparison chart (cargo feature `charts`)
//! - `monitor`: The full run used by the binary
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use codevault_monitor::{HttpProbe, BenchmarkRunner, MonitorConfig};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = MonitorConfig::default();
//!     let probe = HttpProbe::new(&config)?;
//!     let runner = BenchmarkRunner::new(&probe, config.iterations);
//!     let result = runner.run(&config.cids, &config.urls).await;
//!
//!     println!("{:?}", result.summary);
//!     Ok(())
//! }
//! ```

/// Sequential benchmark orchestration
pub mod benchmark;

/// Optional comparison chart rendering
pub mod chart;

/// Command-line interface and configuration
pub mod cli;

/// Typed client for the CodeVault backend API
pub mod client;

/// Peer and bandwidth dashboard
pub mod dashboard;

pub mod error;

pub mod logging;

/// Samples, retrieval kinds and summary statistics
pub mod metrics;

/// Top-level run: health gate, dashboard, benchmark, report, chart
pub mod monitor;

/// Console summary of a benchmark run
pub mod report;

/// Result document and persistence
pub mod results;

/// Download samplers and the latency probe
pub mod sampler;

pub mod utils;

pub use benchmark::BenchmarkRunner;
pub use cli::{Args, MonitorConfig};
pub use client::BackendClient;
pub use error::BackendError;
pub use metrics::{RetrievalKind, Sample, SummaryStatistics};
pub use monitor::{Monitor, RunOutcome};
pub use results::{BenchmarkResult, DemoFigures, ResultsManager};
pub use sampler::{HttpProbe, Probe, ProbeResult};

/// The current version of the monitor, recorded in every results file
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default configuration values
///
/// Every default used by the CLI and by [`MonitorConfig::default`] lives here
/// so the two never drift apart.
pub mod defaults {
    use std::time::Duration;

    /// Backend base URL, overridable with `BACKEND_URL`
    pub const BACKEND_URL: &str = "http://localhost:3001";

    /// IPFS gateway base URL, overridable with `IPFS_GATEWAY`
    pub const IPFS_GATEWAY: &str = "http://127.0.0.1:8080";

    /// Public URLs used as centralized targets when none are given
    pub const PUBLIC_TEST_URLS: [&str; 2] = [
        "https://raw.githubusercontent.com/nodejs/node/main/README.md",
        "https://raw.githubusercontent.com/facebook/react/main/README.md",
    ];

    /// Samples taken per target
    pub const ITERATIONS: usize = 3;

    /// Results document, overwritten on every run
    pub const OUTPUT_FILE: &str = "benchmark_results.json";

    /// Comparison chart, overwritten on every run
    pub const CHART_FILE: &str = "benchmark_results.svg";

    /// Timeout for the `/api/health` liveness check
    pub const HEALTH_TIMEOUT: Duration = Duration::from_secs(5);

    /// Timeout for info/stats calls and single latency probes
    pub const INFO_TIMEOUT: Duration = Duration::from_secs(10);

    /// Timeout for bulk downloads on either path
    pub const DOWNLOAD_TIMEOUT: Duration = Duration::from_secs(60);
}
