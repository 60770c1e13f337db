// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Rollwerk demonstration CLI.
//
// Wires the default driver into a `PrintService` and exposes the plugin
// operations as subcommands.  Bus events are printed as JSON lines, in the
// exact wire shape a marshaling layer would forward.

use std::path::PathBuf;
use std::time::Duration;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use clap::{Parser, Subcommand};
use tokio::sync::broadcast;
use tracing::info;

use rollwerk_core::config::EngineConfig;
use rollwerk_core::error::Result;
use rollwerk_core::types::{PluginEvent, PrintOutcome, PrintRequest};
use rollwerk_print::PrintService;

#[derive(Parser)]
#[command(name = "rollwerk", version, about = "Label printer discovery and printing")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to an engine config JSON file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, default_value = "info", global = true)]
    log_level: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Search the local network for printers
    Scan {
        /// Model-name filter passed to the driver (e.g. "QL-810W")
        #[arg(long, default_value = "")]
        printer_type: String,
    },
    /// Stream BLE beacon advertisements until interrupted
    Beacon {
        /// Stop after this many seconds
        #[arg(long, default_value_t = 30)]
        duration: u64,
    },
    /// Print an image file on a selected printer
    Print {
        /// Path to the image (PNG, JPEG, ...)
        image: PathBuf,
        /// Printer model identifier (e.g. "QL-810W")
        #[arg(long)]
        printer_type: String,
        /// BLE advertised local name (wins over --ip when both are given)
        #[arg(long)]
        local_name: Option<String>,
        /// Printer IP address
        #[arg(long)]
        ip: Option<String>,
        /// Label-name index (16 selects the plain 62 mm roll)
        #[arg(long)]
        label_index: Option<i32>,
        /// Number of copies
        #[arg(long)]
        copies: Option<u32>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(cli.log_level.clone())),
        )
        .init();

    let config = match &cli.config {
        Some(path) => serde_json::from_str(&std::fs::read_to_string(path)?)?,
        None => EngineConfig::default(),
    };

    let service = PrintService::new(rollwerk_driver::default_driver(), config.clone());
    let events = service.subscribe();

    match cli.command {
        Commands::Scan { printer_type } => {
            info!(filter = %printer_type, "scanning the local network");
            service.search_network_printers(&printer_type)?;
            // One batch arrives within the scan budget plus watchdog grace.
            print_events(events, config.network_scan_timeout() + Duration::from_secs(3)).await;
        }
        Commands::Beacon { duration } => {
            info!(duration, "streaming beacon advertisements");
            service.search_beacon_printers()?;
            print_events(events, Duration::from_secs(duration)).await;
            service.stop_beacon_search()?;
        }
        Commands::Print {
            image,
            printer_type,
            local_name,
            ip,
            label_index,
            copies,
        } => {
            let encoded_image = STANDARD.encode(std::fs::read(&image)?);
            let request = PrintRequest {
                encoded_image,
                printer_type,
                local_name,
                ip_address: ip,
                label_name_index: label_index,
                number_of_copies: copies,
            };
            let outcome = service.print_image(request).await?;
            match outcome {
                PrintOutcome::Completed => println!(r#"{{"value": true}}"#),
                PrintOutcome::FailureNotified => {
                    // The failure event is already on the bus — drain it.
                    print_events(events, Duration::from_millis(500)).await;
                }
            }
        }
    }

    Ok(())
}

/// Print bus events as JSON lines until the window closes.
async fn print_events(mut events: broadcast::Receiver<PluginEvent>, window: Duration) {
    let deadline = tokio::time::Instant::now() + window;
    loop {
        match tokio::time::timeout_at(deadline, events.recv()).await {
            Ok(Ok(event)) => match serde_json::to_string(&event) {
                Ok(line) => println!("{line}"),
                Err(e) => tracing::error!(error = %e, "event serialization failed"),
            },
            Ok(Err(_)) | Err(_) => break,
        }
    }
}
