//! Mock CodeVault backend shared by the integration tests.
#![allow(dead_code)]

use axum::{
    extract::Path,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use codevault_monitor::MonitorConfig;
use serde_json::json;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

/// Body size served by `/files/readme`
pub const README_BYTES: usize = 2048;

/// CID the mock backend fails with a plain-text 500
pub const BROKEN_CID: &str = "bafybrokencid";

/// CID the mock backend answers with a non-JSON body
pub const GARBLED_CID: &str = "bafygarbledcid";

/// Serve `router` on an ephemeral local port and return its base URL
pub async fn spawn(router: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{}", addr)
}

/// Body served by [`spawn_keep_alive_server`]; valid for both sampler kinds
pub const KEEP_ALIVE_BODY: &str = r#"{"bytes":27,"speedMbps":1.5}"#;

/// Raw HTTP/1.1 server that keeps every connection open and answers any
/// number of requests on it. Returns the base URL and the count of accepted
/// connections.
pub async fn spawn_keep_alive_server() -> (String, Arc<AtomicUsize>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let accepted = Arc::new(AtomicUsize::new(0));

    let counter = accepted.clone();
    tokio::spawn(async move {
        while let Ok((socket, _)) = listener.accept().await {
            counter.fetch_add(1, Ordering::SeqCst);
            tokio::spawn(serve_keep_alive(socket));
        }
    });

    (format!("http://{}", addr), accepted)
}

async fn serve_keep_alive(mut socket: TcpStream) {
    let response = format!(
        "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: keep-alive\r\n\r\n{}",
        KEEP_ALIVE_BODY.len(),
        KEEP_ALIVE_BODY
    );
    let mut pending = Vec::new();
    let mut chunk = [0u8; 1024];

    loop {
        let n = match socket.read(&mut chunk).await {
            Ok(0) | Err(_) => return,
            Ok(n) => n,
        };
        pending.extend_from_slice(&chunk[..n]);

        // Requests are bodiless GETs; each header block gets one response
        while let Some(end) = pending.windows(4).position(|w| w == b"\r\n\r\n") {
            pending.drain(..end + 4);
            if socket.write_all(response.as_bytes()).await.is_err() {
                return;
            }
        }
    }
}

/// Base URL of a port nothing is listening on
pub async fn refused_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}", addr)
}

/// Backend that is online and answers every endpoint
pub fn healthy_backend() -> Router {
    Router::new()
        .route("/api/health", get(|| async { Json(json!({ "status": "ok" })) }))
        .route(
            "/api/ipfs/info",
            get(|| async {
                Json(json!({
                    "success": true,
                    "nodeId": "12D3KooWMockNodeIdentifierForTests",
                    "agentVersion": "helia/4.0.0",
                    "peerCount": 1,
                    "peers": [{
                        "peerId": "12D3KooWMockPeerIdentifier",
                        "address": "/ip4/10.0.0.1/tcp/4001",
                        "latency": "12ms"
                    }]
                }))
            }),
        )
        .route(
            "/api/stats",
            get(|| async {
                Json(json!({
                    "success": true,
                    "bandwidth": {
                        "totalIn": "1048576",
                        "totalOut": 524288,
                        "rateIn": "2048.5",
                        "rateOut": 0
                    }
                }))
            }),
        )
        .route("/api/benchmark/p2p/:cid", get(p2p_benchmark))
        .merge(public_files())
}

/// Backend whose health check answers with `status`
pub fn unhealthy_backend(status: StatusCode) -> Router {
    Router::new()
        .route("/api/health", get(move || async move { status }))
        .merge(public_files())
}

/// Backend that is online but has no IPFS node: info and stats are 404
pub fn backend_without_node() -> Router {
    Router::new()
        .route("/api/health", get(|| async { Json(json!({ "status": "ok" })) }))
        .merge(public_files())
}

/// Stand-ins for public centralized download targets
pub fn public_files() -> Router {
    Router::new()
        .route("/files/readme", get(|| async { "x".repeat(README_BYTES) }))
        .route("/files/missing", get(|| async { StatusCode::NOT_FOUND }))
}

async fn p2p_benchmark(Path(cid): Path<String>) -> Response {
    match cid.as_str() {
        BROKEN_CID => (StatusCode::INTERNAL_SERVER_ERROR, "IPFS node not started").into_response(),
        GARBLED_CID => "<html>gateway error</html>".into_response(),
        _ => Json(json!({
            "success": true,
            "cid": cid,
            "bytes": 4096,
            "speedMbps": 12.5
        }))
        .into_response(),
    }
}

/// Config pointing at `base_url` for both the backend and the public files
pub fn config_for(base_url: &str) -> MonitorConfig {
    MonitorConfig {
        backend_url: base_url.to_string(),
        gateway_url: base_url.to_string(),
        urls: vec![format!("{}/files/readme", base_url)],
        iterations: 2,
        chart: false,
        ..MonitorConfig::default()
    }
}
