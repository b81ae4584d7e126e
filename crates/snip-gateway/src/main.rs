use anyhow::Context;
use clap::Parser;
use snip_core::{Repository, Shortener};
use snip_gateway::cli::{GeneratorArg, StorageBackendArg, CLI};
use snip_gateway::{telemetry, App, AppState};
use snip_generator::{RandomGenerator, SeqGenerator};
use snip_shortener::{CodeStoreSettings, ShortenerService};
use snip_storage::{InMemoryRepository, SqliteRepository};
use std::sync::Arc;
use tracing::{error, info};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = CLI::parse();
    telemetry::init_tracing(config.log_format);

    info!(
        listen_addr = %config.listen_addr,
        storage_backend = %config.storage,
        generator = %config.generator,
        max_attempts = config.max_attempts,
        "starting gateway server"
    );

    match config.storage {
        StorageBackendArg::InMemory => run_server(&config, InMemoryRepository::new()).await,
        StorageBackendArg::Sqlite => {
            let repository = SqliteRepository::connect(&config.database_url)
                .await
                .with_context(|| format!("failed to open database {}", config.database_url))?;

            let result = run_server(&config, repository.clone()).await;
            repository.close().await;
            info!("database connections closed");
            result
        }
    }
}

async fn run_server<R: Repository>(config: &CLI, repository: R) -> anyhow::Result<()> {
    let settings = CodeStoreSettings::builder()
        .max_attempts(config.max_attempts)
        .build();

    let shortener: Arc<dyn Shortener> = match config.generator {
        GeneratorArg::Random => Arc::new(ShortenerService::with_settings(
            repository,
            RandomGenerator::new(),
            settings,
        )),
        GeneratorArg::Sequential => Arc::new(ShortenerService::with_settings(
            repository,
            SeqGenerator::new(),
            settings,
        )),
    };

    let state = AppState::new(shortener, config.public_base_url.clone());
    let router = App::router(state, &config.static_dir);

    let listener = tokio::net::TcpListener::bind(config.listen_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.listen_addr))?;
    info!(listen_addr = %listener.local_addr()?, "listening");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("http server failed")
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        error!(error = %err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}
