use axum::{extract::Extension, middleware, response::IntoResponse, routing::get, Json, Router};
use gemfolio::config::{
    database::{get_database, DatabaseConfig},
    storage::{get_s3_client, StorageConfig},
};
use gemfolio::services::repository::{DynRepository, SeaOrmRepository};
use gemfolio::services::storage::{DynObjectStore, S3ObjectStore};
use gemfolio::{handlers, migration, routes};
use sea_orm::{ConnectionTrait, DatabaseConnection, Statement};
use sea_orm_migration::MigratorTrait;
use serde_json::json;
use std::env;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    paths(
        health_check,
        handlers::portfolio::list_portfolios,
        handlers::vote::vote_portfolio,
        handlers::submit::submit_portfolio,
    ),
    components(
        schemas(
            gemfolio::response::ApiResponse<serde_json::Value>,
            gemfolio::error::AppError,
            handlers::portfolio::PortfolioResponse,
            handlers::vote::VoteToggleResponse,
            handlers::submit::SubmissionResponse,
        )
    ),
    tags(
        (name = "portfolios", description = "Gallery listing and submissions"),
        (name = "votes", description = "Voting operations"),
    )
)]
struct ApiDoc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "gemfolio=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Fail fast on missing configuration before touching the network.
    let (db_config, storage_config) = validate_config()?;

    tracing::info!("Starting Gemfolio v{}...", env!("CARGO_PKG_VERSION"));

    let db = get_database(&db_config).await?;
    tracing::info!("Database connected successfully");

    migration::Migrator::up(&db, None).await?;
    tracing::info!("Database migrations applied successfully");

    let s3 = get_s3_client(&storage_config).await;
    tracing::info!(
        "Object storage client initialized (bucket: {})",
        storage_config.bucket
    );

    let repo: DynRepository = Arc::new(SeaOrmRepository::new(db.clone()));
    let store: DynObjectStore = Arc::new(S3ObjectStore::new(s3, &storage_config));

    let app = create_app()
        .layer(Extension(db))
        .layer(Extension(repo))
        .layer(Extension(store));

    let host = env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
    let port = env::var("PORT").unwrap_or_else(|_| "3000".to_string());
    let addr = format!("{}:{}", host, port);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Listening on http://{}", addr);
    tracing::info!("Swagger UI available at http://{}/swagger-ui/", addr);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    tracing::info!("Server shut down gracefully");
    Ok(())
}

/// Validate all required configuration at startup (fail-fast).
fn validate_config() -> anyhow::Result<(DatabaseConfig, StorageConfig)> {
    let db_config = DatabaseConfig::from_env()?;
    let storage_config = StorageConfig::from_env()?;
    Ok((db_config, storage_config))
}

fn create_app() -> Router {
    Router::new()
        .route("/health", get(health_check))
        .merge(routes::create_routes())
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(middleware::from_fn(
            gemfolio::middleware::security::security_headers_middleware,
        ))
        .layer(TraceLayer::new_for_http())
}

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Health check successful", body = serde_json::Value)
    )
)]
async fn health_check(Extension(db): Extension<DatabaseConnection>) -> impl IntoResponse {
    let db_ok = db
        .query_one(Statement::from_string(
            sea_orm::DatabaseBackend::Postgres,
            "SELECT 1".to_string(),
        ))
        .await
        .is_ok();

    let status = if db_ok { "ok" } else { "degraded" };

    Json(json!({
        "status": status,
        "service": "Gemfolio",
        "version": env!("CARGO_PKG_VERSION"),
        "database": db_ok,
    }))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to install CTRL+C signal handler: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received, gracefully shutting down...");
}
