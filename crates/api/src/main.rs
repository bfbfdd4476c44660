// Memory Lane API server

use anyhow::{Context, Result};
use memorylane_api::{build_app, AppConfig, DiskMediaStore, StorageBackend, TimelineService};
use memorylane_core::telemetry::{init_telemetry, TelemetryConfig};
use memorylane_openai::OpenAiCompletionClient;
use std::sync::Arc;

const DEFAULT_LOG_FILTER: &str = "memorylane_api=debug,tower_http=debug";

#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env file is fine; real environment variables still apply
    dotenvy::dotenv().ok();

    let mut telemetry = TelemetryConfig::from_env();
    telemetry.service_name = "memorylane-api".to_string();
    telemetry.service_version = Some(env!("CARGO_PKG_VERSION").to_string());
    if telemetry.log_filter.is_none() {
        telemetry.log_filter = Some(DEFAULT_LOG_FILTER.to_string());
    }
    init_telemetry(telemetry);

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "memorylane-api starting");

    let config = AppConfig::from_env().context("Invalid configuration")?;

    let storage = match &config.database_url {
        Some(url) => StorageBackend::postgres(url)
            .await
            .context("Failed to connect to database")?,
        None => {
            tracing::warn!("DATABASE_URL not set, events are kept in memory and lost on restart");
            StorageBackend::in_memory()
        }
    };
    tracing::info!(dev_mode = storage.is_dev_mode(), "Storage ready");

    let media = DiskMediaStore::create(&config.upload_dir)
        .await
        .with_context(|| format!("Failed to create upload dir {}", config.upload_dir.display()))?;

    let suggester =
        OpenAiCompletionClient::from_env().context("Failed to configure OpenAI client")?;
    tracing::info!(
        model = %suggester.config().model,
        policy = %config.milestone.policy,
        threshold = config.milestone.threshold,
        "Milestone suggestions enabled"
    );

    let service = Arc::new(TimelineService::new(
        Arc::new(storage),
        Arc::new(media),
        Arc::new(suggester),
        config.milestone,
    ));

    let app = build_app(service, &config);

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .context("Failed to bind to address")?;
    tracing::info!("HTTP server listening on {}", addr);

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
