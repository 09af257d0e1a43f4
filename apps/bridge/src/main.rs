use anyhow::Result;
use clap::Parser;
use mediabridge_core::MediaBridge;
use mediabridge_server::{ControlServer, ServerConfig};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Expose the current media session over HTTP and WebSocket
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// Config file (defaults to the platform config directory)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Address to listen on
    #[arg(long)]
    host: Option<String>,

    /// Port to listen on
    #[arg(short, long)]
    port: Option<u16>,

    /// Delay between media stream updates, in milliseconds
    #[arg(long)]
    poll_interval_ms: Option<u64>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,mediabridge=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();

    tracing::info!("Starting mediabridge {}", env!("CARGO_PKG_VERSION"));

    let config = load_config(&args)?;
    let addr = config.socket_addr()?;

    let platform = mediabridge_media_session::create_media_platform();
    let bridge = MediaBridge::with_config(Arc::from(platform), config.bridge_config());

    let mut server = ControlServer::new(addr, bridge, config.poll_interval());
    server.start().await?;

    tokio::signal::ctrl_c().await?;
    tracing::info!("Shutting down");
    server.stop().await;

    Ok(())
}

/// Load the config file and apply command line overrides
fn load_config(args: &Args) -> Result<ServerConfig> {
    let mut config = match &args.config {
        Some(path) => {
            tracing::info!("Config file: {}", path.display());
            ServerConfig::load(path)?
        }
        None => {
            let path = get_config_path()?;
            tracing::info!("Config file: {}", path.display());
            ServerConfig::load_or_default(&path)?
        }
    };

    apply_overrides(&mut config, args);
    config.validate()?;
    Ok(config)
}

fn apply_overrides(config: &mut ServerConfig, args: &Args) {
    if let Some(host) = &args.host {
        config.host = host.clone();
    }
    if let Some(port) = args.port {
        config.port = port;
    }
    if let Some(interval) = args.poll_interval_ms {
        config.poll_interval_ms = interval;
    }
}

/// Get the default config path (platform-specific)
fn get_config_path() -> Result<PathBuf> {
    let config_dir = dirs::config_dir()
        .ok_or_else(|| anyhow::anyhow!("Failed to get config directory"))?
        .join("mediabridge");

    Ok(config_dir.join("config.toml"))
}
