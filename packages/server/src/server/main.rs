// Main entry point for API server

use std::sync::Arc;

use anyhow::{Context, Result};
use goods_api::domains::uploads::{PostgresCredentialStore, UploaderSettings};
use goods_api::kernel::{ServerDeps, YoutubeAdapter};
use goods_api::{server::build_app, Config};
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use youtube::{ClientSecrets, OAuthClient, YoutubeClient};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,goods_api=debug,youtube=debug,sqlx=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Goods API");

    // Load configuration
    let config = Config::from_env().context("Failed to load configuration")?;
    tracing::info!("Configuration loaded");

    // Connect to database
    tracing::info!("Connecting to database...");
    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(&config.database_url)
        .await
        .context("Failed to connect to database")?;
    tracing::info!("Database connected");

    // Run migrations
    tracing::info!("Running database migrations...");
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to run migrations")?;
    tracing::info!("Migrations complete");

    // Uploads still work with stored credentials when the secrets file is absent
    let youtube_config = &config.youtube;
    let oauth = match ClientSecrets::from_file(&youtube_config.client_secrets_file).await {
        Ok(secrets) => Some(OAuthClient::new(
            secrets,
            youtube_config.scopes.clone(),
            youtube_config.redirect_uri.clone(),
        )),
        Err(e) => {
            tracing::warn!(
                path = %youtube_config.client_secrets_file.display(),
                error = %e,
                "YouTube client secrets unavailable; interactive authorization disabled"
            );
            None
        }
    };

    let youtube_client = YoutubeClient::new().context("Failed to build YouTube client")?;
    let video_platform = YoutubeAdapter::new(
        youtube_client,
        oauth,
        youtube_config.upload_chunk_size,
    );
    let deps = ServerDeps::new(
        pool.clone(),
        Arc::new(PostgresCredentialStore::new(pool)),
        Arc::new(video_platform),
        UploaderSettings::from_config(youtube_config),
    );

    let app = build_app(deps);

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("Starting server on {}", addr);
    tracing::info!("Health check: http://localhost:{}/health", config.port);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .context("Failed to bind to address")?;

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
