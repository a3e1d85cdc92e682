use clap::Parser;
use locus_adaptor_web::{build_router, SearchApiState};
use locus_core::config::{load_env, load_env_from_path};
use locus_core::{init_logging, LocusConfig, LocusError, Logger, PlaceFinder};
use locus_provider_google::{GoogleGeocoder, GooglePlaceSearch};
use locus_provider_openai::OpenAiChatModel;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser, Debug)]
#[command(name = "run-locus", about = "Natural-language nearby place search over HTTP")]
struct Cli {
    /// Log filter, e.g. "info" or "locus_core=debug"
    #[arg(long, env = "LOCUS_LOG_LEVEL")]
    log_level: Option<String>,

    /// Bind host (overrides LOCUS_HOST)
    #[arg(long)]
    host: Option<String>,

    /// Bind port (overrides LOCUS_PORT)
    #[arg(long)]
    port: Option<u16>,

    /// Environment file to load instead of ./.env
    #[arg(long)]
    env_file: Option<PathBuf>,
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_err() {
        std::future::pending::<()>().await;
    }
}

#[tokio::main]
async fn main() -> locus_core::Result<()> {
    let cli = Cli::parse();

    // The env file may set LOCUS_LOG_LEVEL, so it loads before the subscriber
    let env_loaded = match &cli.env_file {
        Some(path) => load_env_from_path(path),
        None => load_env(),
    };
    if let Some(level) = &cli.log_level {
        std::env::set_var("LOCUS_LOG_LEVEL", level);
    }
    init_logging();
    let log = Logger::new("locus-server");

    if let Err(e) = env_loaded {
        log.error(&e.to_string());
        return Err(e);
    }

    let mut config = LocusConfig::from_env();
    if let Some(host) = cli.host {
        config.server.host = host;
    }
    if let Some(port) = cli.port {
        config.server.port = port;
    }
    if let Err(e) = config.validate() {
        log.error(&e.to_string());
        return Err(e);
    }

    let finder = PlaceFinder::from_config(
        Arc::new(GoogleGeocoder::from_config(&config.geocoding)?),
        Arc::new(OpenAiChatModel::from_config(&config.chat)?),
        Arc::new(GooglePlaceSearch::from_config(&config.places)?),
        &config,
    );
    log.info(&format!(
        "Model {}, search radius {} m, stage timeout {}s",
        config.chat.model, config.places.radius_m, config.pipeline.stage_timeout_secs
    ));

    let app = build_router(SearchApiState::new(finder), &config.server.cors_origins);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| LocusError::config(format!("Failed to bind {}: {}", addr, e)))?;
    log.info(&format!("Listening on http://{}", addr));

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| LocusError::config(format!("Server error: {}", e)))?;

    log.info("Shut down");
    Ok(())
}
