use reqwest::StatusCode;
use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

use crate::cli::{MonitorConfig, Timeouts};
use crate::error::BackendError;

/// Node metadata returned by `GET /api/ipfs/info`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PeerInfo {
    pub success: bool,
    pub error: Option<String>,
    pub node_id: Option<String>,
    pub agent_version: Option<String>,
    #[serde(deserialize_with = "lenient_count")]
    pub peer_count: usize,
    pub peers: Vec<Peer>,
}

/// One connected peer
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Peer {
    pub peer_id: Option<String>,
    pub address: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub latency: Option<String>,
}

/// Bandwidth counters returned by `GET /api/stats`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkStats {
    pub success: bool,
    pub error: Option<String>,
    pub bandwidth: Bandwidth,
}

/// Cumulative bytes and instantaneous bytes/sec
///
/// The backend serializes these as bigints, which arrive either as JSON
/// numbers or as numeric strings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Bandwidth {
    #[serde(deserialize_with = "lenient_f64")]
    pub total_in: f64,
    #[serde(deserialize_with = "lenient_f64")]
    pub total_out: f64,
    #[serde(deserialize_with = "lenient_f64")]
    pub rate_in: f64,
    #[serde(deserialize_with = "lenient_f64")]
    pub rate_out: f64,
}

/// Body of `GET /api/benchmark/p2p/{cid}`
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct P2pBenchmark {
    #[serde(deserialize_with = "lenient_f64")]
    pub bytes: f64,
    #[serde(deserialize_with = "lenient_f64")]
    pub speed_mbps: f64,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrText {
    Number(f64),
    Text(String),
}

fn lenient_f64<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<NumberOrText>::deserialize(deserializer)? {
        None => Ok(0.0),
        Some(NumberOrText::Number(n)) => Ok(n),
        Some(NumberOrText::Text(s)) => s.trim().parse().map_err(de::Error::custom),
    }
}

fn lenient_count<'de, D>(deserializer: D) -> Result<usize, D::Error>
where
    D: Deserializer<'de>,
{
    let n = lenient_f64(deserializer)?;
    if n.is_finite() && n >= 0.0 && n.fract() == 0.0 {
        Ok(n as usize)
    } else {
        Err(de::Error::custom(format!("invalid count: {}", n)))
    }
}

fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<NumberOrText>::deserialize(deserializer)? {
        None => None,
        Some(NumberOrText::Number(n)) => Some(n.to_string()),
        Some(NumberOrText::Text(s)) => Some(s),
    })
}

/// Client for the CodeVault backend API
#[derive(Debug, Clone)]
pub struct BackendClient {
    http: reqwest::Client,
    base_url: String,
    timeouts: Timeouts,
}

impl BackendClient {
    pub fn new(config: &MonitorConfig) -> Result<Self, BackendError> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("codevault-monitor/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self::with_http(http, config))
    }

    /// Build on an existing HTTP client so connections can be shared
    pub fn with_http(http: reqwest::Client, config: &MonitorConfig) -> Self {
        Self {
            http,
            base_url: config.backend_url.trim_end_matches('/').to_string(),
            timeouts: config.timeouts,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Liveness check; anything but `200 OK` is an error
    pub async fn health(&self) -> Result<(), BackendError> {
        let response = self
            .http
            .get(self.endpoint("/api/health"))
            .timeout(self.timeouts.health)
            .send()
            .await?;

        let status = response.status();
        if status != StatusCode::OK {
            let body = response.text().await.unwrap_or_default();
            return Err(BackendError::Status { status, body });
        }
        Ok(())
    }

    pub async fn peer_info(&self) -> Result<PeerInfo, BackendError> {
        let info: PeerInfo = self.get_json("/api/ipfs/info", self.timeouts.info).await?;
        if !info.success {
            return Err(BackendError::Rejected(
                info.error
                    .unwrap_or_else(|| "Failed to get peer info".to_string()),
            ));
        }
        Ok(info)
    }

    pub async fn network_stats(&self) -> Result<NetworkStats, BackendError> {
        let stats: NetworkStats = self.get_json("/api/stats", self.timeouts.info).await?;
        if !stats.success {
            return Err(BackendError::Rejected(
                stats.error.unwrap_or_else(|| "Failed to get stats".to_string()),
            ));
        }
        Ok(stats)
    }

    /// Ask the backend to fetch `cid` over IPFS and report what it measured
    pub async fn p2p_benchmark(&self, cid: &str) -> Result<P2pBenchmark, BackendError> {
        let path = format!("/api/benchmark/p2p/{}", cid);
        self.get_json(&path, self.timeouts.download).await
    }

    async fn get_json<T>(&self, path: &str, timeout: Duration) -> Result<T, BackendError>
    where
        T: for<'de> Deserialize<'de>,
    {
        let url = self.endpoint(path);
        debug!("GET {}", url);

        let response = self.http.get(&url).timeout(timeout).send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(BackendError::Status { status, body });
        }
        Ok(serde_json::from_str(&body)?)
    }
}
