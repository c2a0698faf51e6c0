//! File Manager Server
//!
//! REST API for uploading, listing and reading project files in an S3
//! compatible bucket.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

use file_manager::build_router;
use file_manager::config::ServiceConfig;
use file_manager::state::AppState;

/// File Manager Server
#[derive(Parser, Debug)]
#[command(name = "file-manager")]
#[command(about = "Upload directories and zip archives into object storage projects")]
struct Args {
    /// Listen address
    #[arg(short, long, default_value = "0.0.0.0:8080", env = "FM_LISTEN_ADDR")]
    listen: String,

    /// Log level
    #[arg(long, default_value = "info", env = "RUST_LOG")]
    log_level: String,

    /// Comma-separated list of allowed CORS origins
    #[arg(
        long,
        env = "FM_ALLOWED_ORIGINS",
        value_delimiter = ',',
        default_value = "http://localhost:5173,http://localhost:8081"
    )]
    allowed_origins: Vec<String>,

    /// Maximum upload size in megabytes
    #[arg(long, default_value_t = 100, env = "FM_MAX_UPLOAD_MB")]
    max_upload_mb: usize,

    /// Parent directory for archive extraction
    #[arg(long, env = "FM_TEMP_DIR")]
    temp_dir: Option<PathBuf>,

    /// Number of worker threads
    #[arg(long, env = "FM_WORKER_THREADS")]
    worker_threads: Option<usize>,
}

fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let args = Args::parse();

    // Build runtime with configured threads
    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();

    if let Some(threads) = args.worker_threads {
        runtime_builder.worker_threads(threads);
    }

    let runtime = runtime_builder.build()?;
    runtime.block_on(async_main(args))
}

async fn async_main(args: Args) -> Result<()> {
    // Initialize tracing
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_level(true)
        .json()
        .init();

    // Initialize Prometheus metrics exporter
    let prometheus_handle = metrics_exporter_prometheus::PrometheusBuilder::new()
        .install_recorder()
        .context("Failed to install Prometheus recorder")?;

    info!("Starting file manager server");

    let config = ServiceConfig {
        allowed_origins: args.allowed_origins,
        max_upload_bytes: args.max_upload_mb * 1024 * 1024,
        temp_dir: args.temp_dir,
    };

    if let Some(temp_dir) = &config.temp_dir {
        std::fs::create_dir_all(temp_dir)
            .with_context(|| format!("Failed to create temp dir {}", temp_dir.display()))?;
    }

    let state = Arc::new(AppState::from_env(&config, Some(prometheus_handle))?);
    let app = build_router(state, &config)?;

    let addr: SocketAddr = args.listen.parse().context("Invalid listen address")?;
    info!(
        address = %addr,
        origins = ?config.allowed_origins,
        max_upload_bytes = config.max_upload_bytes,
        "Listening"
    );

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    tokio::signal::ctrl_c().await.ok();
    info!("Shutdown signal received");
}
