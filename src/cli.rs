use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::defaults;

/// CodeVault Performance Monitor - compare P2P (IPFS) and centralized downloads
#[derive(Parser, Debug)]
#[clap(version, about, long_about = None)]
pub struct Args {
    /// Base URL of the CodeVault backend
    #[clap(long, env = "BACKEND_URL", default_value = defaults::BACKEND_URL, global = true)]
    pub backend_url: String,

    /// Base URL of the IPFS HTTP gateway
    #[clap(long = "gateway-url", env = "IPFS_GATEWAY", default_value = defaults::IPFS_GATEWAY, global = true)]
    pub gateway_url: String,

    /// Content identifiers to benchmark over the P2P path (repeatable)
    #[clap(long = "cid", value_name = "CID", help_heading = "Benchmark Options")]
    pub cids: Vec<String>,

    /// Public URLs to benchmark over the centralized path (repeatable)
    #[clap(long = "url", value_name = "URL", default_values = defaults::PUBLIC_TEST_URLS, help_heading = "Benchmark Options")]
    pub urls: Vec<String>,

    /// Number of samples taken per target
    #[clap(short = 'i', long, default_value_t = defaults::ITERATIONS, value_parser = parse_iterations, help_heading = "Benchmark Options")]
    pub iterations: usize,

    /// Output file for results (JSON format)
    #[clap(short = 'o', long, default_value = defaults::OUTPUT_FILE)]
    pub output_file: PathBuf,

    /// Output file for the comparison chart (SVG format)
    #[clap(long, default_value = defaults::CHART_FILE)]
    pub chart_file: PathBuf,

    /// Skip chart generation
    #[clap(long, default_value_t = false)]
    pub no_chart: bool,

    /// Do not fabricate illustrative P2P figures when no P2P data exists
    #[clap(long, default_value_t = false)]
    pub no_demo: bool,

    /// Timeout for the backend health check
    #[clap(long, default_value = "5s", value_parser = parse_duration, global = true)]
    pub health_timeout: Duration,

    /// Timeout for info/stats requests and latency probes
    #[clap(long, default_value = "10s", value_parser = parse_duration, global = true)]
    pub info_timeout: Duration,

    /// Timeout for each download sample
    #[clap(long, default_value = "60s", value_parser = parse_duration, global = true)]
    pub download_timeout: Duration,

    /// Verbose output
    #[clap(short = 'v', long, default_value_t = false, global = true)]
    pub verbose: bool,

    #[clap(subcommand)]
    pub command: Option<Command>,
}

/// Operations other than the default full benchmark run
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Check the backend and print the peer/bandwidth dashboard only
    Dashboard,

    /// Time a single GET against each URL
    Probe {
        /// URLs to probe
        #[clap(value_name = "URL")]
        urls: Vec<String>,

        /// Content identifiers to probe through the IPFS gateway
        #[clap(long = "cid", value_name = "CID")]
        cids: Vec<String>,
    },
}

/// Per-request timeouts
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timeouts {
    pub health: Duration,
    pub info: Duration,
    pub download: Duration,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            health: defaults::HEALTH_TIMEOUT,
            info: defaults::INFO_TIMEOUT,
            download: defaults::DOWNLOAD_TIMEOUT,
        }
    }
}

/// Configuration for a monitor run
///
/// Built once at startup and handed to every component that needs it, so no
/// component reads the environment on its own.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MonitorConfig {
    pub backend_url: String,
    pub gateway_url: String,
    pub cids: Vec<String>,
    pub urls: Vec<String>,
    pub iterations: usize,
    pub output_file: PathBuf,
    pub chart_file: PathBuf,
    pub chart: bool,
    pub demo_p2p: bool,
    pub timeouts: Timeouts,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            backend_url: defaults::BACKEND_URL.to_string(),
            gateway_url: defaults::IPFS_GATEWAY.to_string(),
            cids: Vec::new(),
            urls: defaults::PUBLIC_TEST_URLS
                .iter()
                .map(|url| url.to_string())
                .collect(),
            iterations: defaults::ITERATIONS,
            output_file: PathBuf::from(defaults::OUTPUT_FILE),
            chart_file: PathBuf::from(defaults::CHART_FILE),
            chart: true,
            demo_p2p: true,
            timeouts: Timeouts::default(),
        }
    }
}

impl From<&Args> for MonitorConfig {
    fn from(args: &Args) -> Self {
        Self {
            backend_url: args.backend_url.clone(),
            gateway_url: args.gateway_url.clone(),
            cids: args.cids.clone(),
            urls: args.urls.clone(),
            iterations: args.iterations,
            output_file: args.output_file.clone(),
            chart_file: args.chart_file.clone(),
            chart: !args.no_chart,
            demo_p2p: !args.no_demo,
            timeouts: Timeouts {
                health: args.health_timeout,
                info: args.info_timeout,
                download: args.download_timeout,
            },
        }
    }
}

impl MonitorConfig {
    /// Gateway URL serving `cid`
    pub fn gateway_url_for(&self, cid: &str) -> String {
        format!("{}/ipfs/{}", self.gateway_url.trim_end_matches('/'), cid)
    }
}

fn parse_iterations(s: &str) -> Result<usize, String> {
    let iterations: usize = s
        .trim()
        .parse()
        .map_err(|_| format!("Invalid iteration count: {}", s))?;
    if iterations == 0 {
        return Err("Iteration count must be at least 1".to_string());
    }
    Ok(iterations)
}

/// Parse duration from string (e.g., "10s", "500ms", "5m")
fn parse_duration(s: &str) -> Result<Duration, String> {
    let s = s.trim();

    if s.is_empty() {
        return Err("Duration cannot be empty".to_string());
    }

    let (num_str, unit) = if let Some(stripped) = s.strip_suffix("ms") {
        (stripped, "ms")
    } else if let Some(stripped) = s.strip_suffix('s') {
        (stripped, "s")
    } else if let Some(stripped) = s.strip_suffix('m') {
        (stripped, "m")
    } else {
        (s, "s")
    };

    let num: f64 = num_str
        .parse()
        .map_err(|_| format!("Invalid number in duration: {}", num_str))?;
    if num <= 0.0 {
        return Err("Duration must be positive".to_string());
    }

    let duration = match unit {
        "ms" => Duration::from_millis(num as u64),
        "s" => Duration::from_secs_f64(num),
        "m" => Duration::from_secs_f64(num * 60.0),
        _ => return Err(format!("Invalid duration unit: {}", unit)),
    };

    Ok(duration)
}
