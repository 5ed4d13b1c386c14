//! Local screen-config and sync server.
//!
//! Usage:
//!   sdui-devserver --fixtures ./fixtures --port 8080

use anyhow::{Context, Result};
use clap::Parser;
use sdui_devserver::{serve, DevServerConfig};
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Debug)]
#[command(name = "sdui-devserver")]
#[command(about = "Serves screen definitions and sync bundles from a fixtures directory")]
struct Args {
    /// Directory holding screens/ and the optional bundle files
    #[arg(short, long, default_value = "fixtures")]
    fixtures: PathBuf,

    /// HTTP port
    #[arg(short, long, default_value = "8080")]
    port: u16,

    /// Address to bind
    #[arg(long, default_value = "127.0.0.1")]
    host: IpAddr,

    /// Enable verbose debug logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let log_level = if args.verbose { Level::DEBUG } else { Level::INFO };
    FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .compact()
        .init();

    let config = DevServerConfig {
        bind: SocketAddr::new(args.host, args.port),
        fixtures: args.fixtures,
    };
    info!("SDUI dev server starting...");

    tokio::select! {
        result = serve(&config) => result.context("dev server stopped")?,
        _ = tokio::signal::ctrl_c() => info!("Shutting down"),
    }
    Ok(())
}
