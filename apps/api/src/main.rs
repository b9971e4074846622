mod analysis;
mod business;
mod catalog;
mod community;
mod config;
mod db;
mod errors;
mod gamification;
mod llm_client;
mod matching;
mod models;
mod progress;
mod routes;
mod search;
mod state;

use anyhow::Result;
use aws_config::Region;
use aws_sdk_s3::config::Credentials;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::analysis::intake::ResumeArchive;
use crate::catalog::PgCatalogStore;
use crate::config::Config;
use crate::db::create_pool;
use crate::llm_client::LlmClient;
use crate::progress::repository::RedisProgressRepository;
use crate::routes::build_router;
use crate::search::debounce::SuggestionSessions;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Configuration first; startup fails on missing required env vars
    let config = Config::from_env()?;

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting certification portal API v{}", env!("CARGO_PKG_VERSION"));

    // Catalog (PostgreSQL)
    let pool = create_pool(&config.database_url).await?;
    let catalog = Arc::new(PgCatalogStore::new(pool));

    // Learner state (Redis)
    let redis = redis::Client::open(config.redis_url.clone())?;
    let learners = Arc::new(RedisProgressRepository::new(redis));
    info!("Redis client initialized");

    // Résumé archive (S3 / MinIO)
    let s3 = build_s3_client(&config).await;
    let resume_archive = ResumeArchive::new(s3, config.s3_bucket.clone());
    info!("S3 client initialized (bucket: {})", config.s3_bucket);

    let llm = LlmClient::new(config.anthropic_api_key.clone(), config.llm_max_attempts)?;
    info!(
        "LLM client initialized (model: {}, attempts: {})",
        llm_client::MODEL,
        config.llm_max_attempts
    );

    let suggestions = Arc::new(SuggestionSessions::new(Duration::from_millis(
        config.search_debounce_ms,
    )));

    let state = AppState {
        catalog,
        learners,
        resume_archive,
        llm,
        config: config.clone(),
        suggestions,
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict origins to the portal frontend host

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Constructs an S3 client configured for MinIO (local) or AWS (production).
async fn build_s3_client(config: &Config) -> aws_sdk_s3::Client {
    let credentials = Credentials::new(
        &config.aws_access_key_id,
        &config.aws_secret_access_key,
        None,
        None,
        "portal-static",
    );

    let s3_config = aws_config::defaults(aws_config::BehaviorVersion::latest())
        .region(Region::new("us-east-1"))
        .credentials_provider(credentials)
        .endpoint_url(&config.s3_endpoint)
        .load()
        .await;

    aws_sdk_s3::Client::new(&s3_config)
}
