//! Blackrock host binary.
//!
//! # Architecture Overview
//!
//! ```text
//!   blackrock.toml
//!        │
//!        ▼
//!   ┌─────────┐    ┌──────────────────────────── Host ───────────────────────────┐
//!   │ config  │───▶│                                                             │
//!   └─────────┘    │  HostContext: registry · globals · services · log sink      │
//!                  │                                                             │
//!                  │  "router"  ──▶ RouterSet  (edge: [HTTP], all: [*], ...)     │
//!                  │                   ▲                                         │
//!                  │                   │ match_interface(sub)                    │
//!                  │  "HTTP"    ──▶ InterfaceModule ──▶ Active / Failed          │
//!                  │  "NanoMSG" ──▶ InterfaceModule ──▶ Unimplemented / Skipped  │
//!                  │                                                             │
//!                  │  lifecycle: Initializing → Ready → ShuttingDown → Stopped   │
//!                  └─────────────────────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;

use blackrock::config::load_config;
use blackrock::lifecycle::signals::wait_for_termination;
use blackrock::observability::init_logging;
use blackrock::Host;

#[derive(Parser)]
#[command(name = "blackrock")]
#[command(about = "Modular application host", long_about = None)]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(short, long, default_value = "blackrock.toml")]
    config: PathBuf,

    /// Validate the configuration, print the binding table and exit.
    #[arg(long)]
    check: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = load_config(&cli.config)?;
    init_logging(&config.logging);

    tracing::info!(
        path = %cli.config.display(),
        host = %config.host.name,
        "Configuration loaded"
    );

    let host = Host::new(config);

    if cli.check {
        for row in host.binding_table() {
            let routers = if row.routers.is_empty() {
                "(unmapped)".to_string()
            } else {
                row.routers.join(", ")
            };
            println!("{}/{} -> {}", row.module, row.interface, routers);
        }
        return Ok(());
    }

    host.ready(|| tracing::info!("All modules initialized"));
    if let Err(e) = host.start().await {
        tracing::error!(error = %e, "Startup failed");
        host.shutdown().await;
        return Err(e.into());
    }

    for status in host.interface_statuses() {
        tracing::info!(
            module = %status.module,
            interface = %status.interface,
            state = %status.state,
            "Sub-interface status"
        );
    }

    wait_for_termination().await;

    let report = host.shutdown().await;
    for error in &report.errors {
        tracing::error!(module = %error.module(), error = %error, "Teardown failed");
    }

    tracing::info!("Shutdown complete");
    Ok(())
}
