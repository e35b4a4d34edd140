//! # CodeVault Performance Monitor - Main Entry Point
//!
//! The main function performs these operations:
//! 1. **Parse arguments**: command line plus `BACKEND_URL` / `IPFS_GATEWAY`
//! 2. **Initialize logging**: colorized tracing output, `RUST_LOG` aware
//! 3. **Dispatch**: full benchmark run (default), `dashboard`, or `probe`
//!
//! Exit status is 1 when the backend is offline and 0 otherwise; individual
//! download failures are reported, not fatal.

use anyhow::Result;
use clap::Parser;
use codevault_monitor::{
    cli::{Args, Command, MonitorConfig},
    logging, Monitor, RunOutcome,
};
use std::process::ExitCode;
use tracing::debug;

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let args = Args::parse();
    logging::init(args.verbose);

    debug!("Configuration: {:?}", args);

    let config = MonitorConfig::from(&args);
    let monitor = Monitor::from_config(config)?;

    let code = match &args.command {
        None => match monitor.run().await? {
            RunOutcome::BackendOffline(_) => ExitCode::FAILURE,
            RunOutcome::Completed(_) => ExitCode::SUCCESS,
        },
        Some(Command::Dashboard) => match monitor.dashboard().await {
            Ok(()) => ExitCode::SUCCESS,
            Err(_) => ExitCode::FAILURE,
        },
        Some(Command::Probe { urls, cids }) => {
            let results = monitor.probe_latency(urls, cids).await;
            if results.iter().all(|r| r.success) {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            }
        }
    };

    Ok(code)
}
