// Category HTTP Server: Banner extraction
//
// This binary serves artist banner extraction over HTTP and exposes the
// stored images under /images. Listens on port 5001 unless PORT is set.

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

use bannerscrape::{BannerService, ExtractorConfig, server};

#[derive(Debug, Parser)]
#[command(name = "bannerscrape", version, about = "Artist banner extraction server")]
struct Args {
    /// Port to listen on
    #[arg(long, env = "PORT", default_value_t = 5001)]
    port: u16,

    /// Directory banners are stored in and served from [env: BANNER_IMAGES_DIR]
    #[arg(long)]
    images_dir: Option<PathBuf>,

    /// Idle time between two queued jobs, in milliseconds [env: BANNER_COOLDOWN_MS]
    #[arg(long)]
    cooldown_ms: Option<u64>,

    /// Wait after the page reports complete, in milliseconds [env: BANNER_SETTLE_DELAY_MS]
    #[arg(long)]
    settle_delay_ms: Option<u64>,

    /// Token for the remote browser endpoint [env: BROWSERLESS_TOKEN]
    ///
    /// A local browser is launched when no token is configured.
    #[arg(long)]
    browserless_token: Option<String>,

    /// Show the local browser window
    #[arg(long)]
    headful: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("bannerscrape=info")),
        )
        .init();

    let args = Args::parse();

    // flags win over the environment
    let mut builder = ExtractorConfig::from_env()
        .into_builder()
        .headless(!args.headful);
    if let Some(dir) = args.images_dir {
        builder = builder.images_dir(dir);
    }
    if let Some(ms) = args.cooldown_ms {
        builder = builder.cooldown(Duration::from_millis(ms));
    }
    if let Some(ms) = args.settle_delay_ms {
        builder = builder.settle_delay(Duration::from_millis(ms));
    }
    if let Some(token) = args.browserless_token.filter(|t| !t.trim().is_empty()) {
        builder = builder.browserless_token(token.trim());
    }
    let config = Arc::new(builder.build());

    tokio::fs::create_dir_all(config.images_dir())
        .await
        .with_context(|| format!("Failed to create {}", config.images_dir().display()))?;

    match config.browserless_token() {
        Some(_) => tracing::info!("Using remote browser endpoint"),
        None => tracing::info!("Using local browser"),
    }

    let service = Arc::new(BannerService::from_config(Arc::clone(&config)));
    let router = server::build_router(service, config.images_dir());

    let listener = TcpListener::bind(("0.0.0.0", args.port))
        .await
        .with_context(|| format!("Failed to bind port {}", args.port))?;
    tracing::info!("Server running on port {}", args.port);

    server::serve(listener, router).await
}
