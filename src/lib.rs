pub mod auth;
pub mod config;
mod db;
pub mod engine;
pub mod errors;
mod http;
mod middleware;
pub mod models;
pub mod slug;
pub mod state;
pub mod store;
pub mod summary;

use std::{net::SocketAddr, sync::Arc};

use axum::{Router, middleware as axum_middleware};
use bb8::Pool;
use bb8_redis::RedisConnectionManager;
use middleware::{cors_layer, create_global_rate_limiter, rate_limit_middleware};
use sqlx::postgres::PgPoolOptions;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use crate::{
    config::Config,
    errors::AppError,
    state::AppState,
    store::PgStore,
    summary::{ReviewSummaries, cache::RedisSummaryCache, openai::OpenAiSummarizer},
};

pub async fn start_server() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env()?;

    let postgres = PgPoolOptions::new()
        .max_connections(10)
        .connect(&config.database_url)
        .await
        .map_err(|e| AppError::db("Failed to connect to Postgres", e))?;

    sqlx::migrate!("./migrations")
        .run(&postgres)
        .await
        .map_err(|e| AppError::DatabaseError(format!("Failed to run migrations: {e}")))?;

    let manager = RedisConnectionManager::new(config.redis_url.clone())?;
    let redis_pool = Pool::builder().build(manager).await?;

    let summaries = ReviewSummaries::new(
        Arc::new(OpenAiSummarizer::new(
            config.openai_api_url.clone(),
            config.openai_api_key.clone(),
            config.openai_model.clone(),
        )),
        Arc::new(RedisSummaryCache::new(redis_pool)),
        config.summary_timeout,
    );

    let port = config.port;
    let cors = cors_layer(&config.allowed_origins);
    let state = AppState {
        store: PgStore::new(postgres),
        summaries,
        config: Arc::new(config),
    };

    let global_rate_limiter = create_global_rate_limiter();

    let app = Router::new()
        .merge(http::create_http_routes(state))
        .layer(axum_middleware::from_fn(move |req, next| {
            rate_limit_middleware(global_rate_limiter.clone(), req, next)
        }))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .fallback(|| async { "404 Not Found" });

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{port}"))
        .await
        .map_err(|e| AppError::EnvError(format!("Failed to bind port {port}: {e}")))?;

    tracing::info!("Gourmand server running at http://0.0.0.0:{port}");

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
    .map_err(|e| {
        tracing::error!("Server error: {}", e);
        AppError::InternalError
    })
}
