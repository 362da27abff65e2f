//! Campus Building Classifier Server
//!
//! HTTP API for classifying campus-building photos. Serves health-check,
//! label-listing, and prediction endpoints; falls back to deterministic
//! mock predictions when no trained model artifact is present.

mod routes;
mod state;

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use clap::Parser;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use campus_classifier::utils::logging::{init_logging, LogConfig, LogLevel};
use campus_classifier::ClassifierContext;

use crate::state::{AppState, ServerConfig};

/// Campus Building Classifier Server
#[derive(Parser, Debug)]
#[command(name = "campus-classifier-server")]
#[command(version = campus_classifier::VERSION)]
#[command(about = "HTTP API for campus building classification")]
struct Cli {
    /// Port to listen on
    #[arg(short, long, default_value = "8000")]
    port: u16,

    /// Host to bind to
    #[arg(long, default_value = "0.0.0.0")]
    host: String,

    /// Path to the labels JSON file
    #[arg(long, env = "CLASSIFIER_LABELS", default_value = "assets/labels.json")]
    labels: PathBuf,

    /// Directory containing model artifacts
    #[arg(long, env = "CLASSIFIER_MODELS_DIR", default_value = "models")]
    models_dir: PathBuf,

    /// Skip model loading and always serve mock predictions
    #[arg(long)]
    force_mock: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Debug logging with module targets (overrides --log-level)
    #[arg(short, long, conflicts_with = "quiet")]
    verbose: bool,

    /// Errors only (overrides --log-level)
    #[arg(short, long)]
    quiet: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let log_config = if cli.quiet {
        LogConfig::quiet()
    } else if cli.verbose {
        LogConfig::verbose()
    } else {
        LogConfig {
            level: LogLevel::parse(&cli.log_level),
            ..LogConfig::default()
        }
    };
    init_logging(&log_config).map_err(anyhow::Error::msg)?;

    let config = ServerConfig {
        labels_path: cli.labels,
        models_dir: cli.models_dir,
        force_mock: cli.force_mock,
    };

    info!("Campus Building Classifier Server v{}", campus_classifier::VERSION);
    info!("Configuration:");
    info!("  Labels path: {:?}", config.labels_path);
    info!("  Models dir:  {:?}", config.models_dir);
    info!("  Force mock:  {}", config.force_mock);

    if !config.labels_path.exists() {
        warn!(
            "Labels file not found at {:?}. The /labels endpoint will report \
            an empty list and mock predictions will use built-in placeholders.",
            config.labels_path
        );
    }

    // One-time initialization: label load plus model probe
    let context =
        ClassifierContext::initialize(&config.labels_path, &config.models_dir, config.force_mock);
    match context.device() {
        Some(device) => info!("serving real inference on {}", device),
        None => info!("serving mock inference (no model loaded)"),
    }

    let state = Arc::new(AppState::new(config, context));

    let app = Router::new()
        .route("/ping", get(routes::health::ping))
        .route("/labels", get(routes::labels::get_labels))
        .route("/predict", post(routes::predict::predict))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        );

    let addr: SocketAddr = format!("{}:{}", cli.host, cli.port).parse()?;
    info!("Starting server on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
