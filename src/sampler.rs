//! # Download Samplers
//!
//! Each sampler performs exactly one request and converts every outcome,
//! including connection errors and timeouts, into data. Nothing in this
//! module returns an error to its caller.
//!
//! The [`Probe`] trait is the seam between the orchestrator and the network;
//! [`HttpProbe`] is the real implementation.

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use tracing::debug;

use crate::cli::MonitorConfig;
use crate::client::BackendClient;
use crate::error::BackendError;
use crate::metrics::{RetrievalKind, Sample};
use crate::utils::round2;

/// Source of download samples for both retrieval kinds
#[async_trait]
pub trait Probe: Send + Sync {
    /// Retrieve `cid` over the P2P path
    async fn p2p_download(&self, cid: &str) -> Sample;

    /// Retrieve `url` over the centralized path
    async fn centralized_download(&self, url: &str) -> Sample;

    /// Dispatch on retrieval kind
    async fn sample(&self, kind: RetrievalKind, target: &str) -> Sample {
        match kind {
            RetrievalKind::P2p => self.p2p_download(target).await,
            RetrievalKind::Centralized => self.centralized_download(target).await,
        }
    }
}

/// Outcome of a single timed GET against an arbitrary URL
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProbeResult {
    pub url: String,
    pub status: Option<u16>,
    pub latency_ms: Option<f64>,
    pub size_bytes: Option<u64>,
    pub success: bool,
    pub error: Option<String>,
}

/// Samplers backed by real HTTP requests
pub struct HttpProbe {
    http: reqwest::Client,
    backend: BackendClient,
    download_timeout: Duration,
    probe_timeout: Duration,
}

impl HttpProbe {
    /// No idle connections are pooled; every sample opens its own connection.
    pub fn new(config: &MonitorConfig) -> Result<Self, BackendError> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("codevault-monitor/", env!("CARGO_PKG_VERSION")))
            .pool_max_idle_per_host(0)
            .build()?;

        Ok(Self {
            backend: BackendClient::with_http(http.clone(), config),
            http,
            download_timeout: config.timeouts.download,
            probe_timeout: config.timeouts.info,
        })
    }

    /// Time a single GET against `url`
    ///
    /// Any response counts as reachable; non-2xx statuses are reported as
    /// failures but keep their status, latency and size.
    pub async fn measure_latency(&self, url: &str) -> ProbeResult {
        let (elapsed, outcome) = timed_get(&self.http, url, self.probe_timeout).await;

        match outcome {
            Ok((status, size)) => ProbeResult {
                url: url.to_string(),
                status: Some(status.as_u16()),
                latency_ms: Some(round2(elapsed.as_secs_f64() * 1000.0)),
                size_bytes: Some(size),
                success: status.is_success(),
                error: (!status.is_success()).then(|| format!("HTTP {}", status)),
            },
            Err(e) => ProbeResult {
                url: url.to_string(),
                status: None,
                latency_ms: None,
                size_bytes: None,
                success: false,
                error: Some(e.to_string()),
            },
        }
    }
}

#[async_trait]
impl Probe for HttpProbe {
    async fn p2p_download(&self, cid: &str) -> Sample {
        let started = Instant::now();
        let outcome = self.backend.p2p_benchmark(cid).await;
        let elapsed = started.elapsed();

        match outcome {
            Ok(body) => Sample::reported(
                RetrievalKind::P2p,
                cid,
                elapsed,
                body.bytes.max(0.0) as u64,
                round2(body.speed_mbps),
            ),
            Err(e) => {
                debug!("P2P download of {} failed: {:?}", cid, e);
                Sample::failed(RetrievalKind::P2p, cid, e.to_string())
            }
        }
    }

    async fn centralized_download(&self, url: &str) -> Sample {
        let (elapsed, outcome) = timed_get(&self.http, url, self.download_timeout).await;

        match outcome {
            Ok((status, size)) if status.is_success() => {
                Sample::measured(RetrievalKind::Centralized, url, elapsed, size)
            }
            Ok((status, _)) => {
                Sample::failed(RetrievalKind::Centralized, url, format!("HTTP {}", status))
            }
            Err(e) => {
                debug!("Centralized download of {} failed: {:?}", url, e);
                Sample::failed(RetrievalKind::Centralized, url, e.to_string())
            }
        }
    }
}

/// GET `url`, reading the whole body, and time only the request itself
async fn timed_get(
    http: &reqwest::Client,
    url: &str,
    timeout: Duration,
) -> (Duration, Result<(StatusCode, u64), reqwest::Error>) {
    let request = http.get(url).timeout(timeout);

    let started = Instant::now();
    let outcome = async {
        let response = request.send().await?;
        let status = response.status();
        let body = response.bytes().await?;
        Ok::<_, reqwest::Error>((status, body.len() as u64))
    }
    .await;

    (started.elapsed(), outcome)
}
