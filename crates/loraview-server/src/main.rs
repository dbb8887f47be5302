//! LoRA viewer server - HTTP backend for the LoRA metadata tab.
//!
//! Exposes `POST /metadata` and `POST /registry-lookup` on top of
//! loraview-core.

mod error;
mod handler;
mod server;

use anyhow::Result;
use clap::Parser;
use loraview_core::config::NetworkConfig;
use loraview_core::LoraApi;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{info, Level};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[derive(Parser, Debug)]
#[command(name = "loraview-server")]
#[command(about = "HTTP server for LoRA metadata and registry lookup")]
struct Args {
    /// Port to listen on (0 = auto-assign)
    #[arg(short, long, default_value = "0")]
    port: u16,

    /// Host to bind to
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    /// Directory every LoRA identifier is resolved against
    #[arg(long, env = "LORAVIEW_ROOT")]
    lora_root: PathBuf,

    /// Base URL of the Civitai-compatible registry API
    #[arg(long, default_value = NetworkConfig::CIVITAI_API_BASE, value_parser = parse_registry_url)]
    registry_url: String,

    /// Registry request timeout in seconds
    #[arg(long, default_value = "30")]
    timeout_secs: u64,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,

    /// Log filter directives (e.g. "loraview_core=debug,tower_http=info");
    /// overrides --debug
    #[arg(long)]
    log_filter: Option<String>,
}

fn parse_registry_url(value: &str) -> std::result::Result<String, String> {
    let url = url::Url::parse(value).map_err(|e| format!("invalid URL: {}", e))?;
    match url.scheme() {
        "http" | "https" => Ok(value.to_string()),
        other => Err(format!("unsupported scheme '{}'", other)),
    }
}

fn init_logging(args: &Args) {
    match &args.log_filter {
        Some(filter) => FmtSubscriber::builder()
            .with_env_filter(EnvFilter::new(filter))
            .with_target(false)
            .with_thread_ids(false)
            .compact()
            .init(),
        None => {
            let log_level = if args.debug { Level::DEBUG } else { Level::INFO };
            FmtSubscriber::builder()
                .with_max_level(log_level)
                .with_target(false)
                .with_thread_ids(false)
                .compact()
                .init()
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(&args);

    info!("Starting LoRA viewer server");

    let api = LoraApi::builder(&args.lora_root)
        .registry_url(&args.registry_url)
        .request_timeout(Duration::from_secs(args.timeout_secs))
        .build()?;

    info!("LoRA root: {}", api.lora_root().display());

    let addr = server::start_server(api, &args.host, args.port).await?;

    // Read by supervisors and integration tests to discover the port.
    println!("SERVER_PORT={}", addr.port());

    info!("Server running on {}", addr);

    tokio::signal::ctrl_c().await?;
    info!("Shutdown signal received, exiting");

    Ok(())
}
