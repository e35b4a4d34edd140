use colored::*;

use crate::client::{BackendClient, NetworkStats, PeerInfo};
use crate::error::BackendError;
use crate::utils::{format_kilobytes_rate, format_megabytes, truncate_id};

/// Peers listed on the dashboard
const MAX_PEERS_SHOWN: usize = 5;
const ID_DISPLAY_CHARS: usize = 20;

/// Fetch both snapshots and print the dashboard
///
/// Fetch failures become inline error lines; this never fails.
pub async fn show(backend: &BackendClient) {
    let peer_info = backend.peer_info().await;
    let stats = backend.network_stats().await;

    println!();
    println!("{}", "=".repeat(60));
    println!("{}", "📊 CodeVault Network Dashboard".bold());
    println!("{}", "=".repeat(60));

    for line in peer_lines(&peer_info) {
        println!("{}", line);
    }
    for line in bandwidth_lines(&stats) {
        println!("{}", line);
    }
}

/// Lines describing the node and its peers
pub fn peer_lines(peer_info: &Result<PeerInfo, BackendError>) -> Vec<String> {
    let info = match peer_info {
        Ok(info) => info,
        Err(e) => return vec![format!("\n❌ Failed to get peer info: {}", e)],
    };

    let mut lines = vec![
        format!(
            "\n🔗 Node ID: {}",
            truncate_id(info.node_id.as_deref().unwrap_or("N/A"), ID_DISPLAY_CHARS)
        ),
        format!("📡 Agent: {}", info.agent_version.as_deref().unwrap_or("N/A")),
        format!("👥 Connected Peers: {}", info.peer_count),
    ];

    if !info.peers.is_empty() {
        lines.push("\n📋 Peer List:".to_string());
        for (i, peer) in info.peers.iter().take(MAX_PEERS_SHOWN).enumerate() {
            lines.push(format!(
                "   {}. {}",
                i + 1,
                truncate_id(peer.peer_id.as_deref().unwrap_or("N/A"), ID_DISPLAY_CHARS)
            ));
            lines.push(format!(
                "      Address: {}",
                peer.address.as_deref().unwrap_or("N/A")
            ));
            lines.push(format!(
                "      Latency: {}",
                peer.latency.as_deref().unwrap_or("N/A")
            ));
        }
    }

    lines
}

/// Lines describing cumulative and current bandwidth
pub fn bandwidth_lines(stats: &Result<NetworkStats, BackendError>) -> Vec<String> {
    let bandwidth = match stats {
        Ok(stats) => stats.bandwidth,
        Err(e) => return vec![format!("\n❌ Failed to get network stats: {}", e)],
    };

    vec![
        "\n📈 Bandwidth Statistics:".to_string(),
        format!("   Total In:  {}", format_megabytes(bandwidth.total_in)),
        format!("   Total Out: {}", format_megabytes(bandwidth.total_out)),
        format!("   Rate In:   {}", format_kilobytes_rate(bandwidth.rate_in)),
        format!("   Rate Out:  {}", format_kilobytes_rate(bandwidth.rate_out)),
    ]
}
