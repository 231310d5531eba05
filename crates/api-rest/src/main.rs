//! Standalone REST API server binary.
//!
//! ## Purpose
//! Runs the REST API server on its own.
//!
//! ## Intended use
//! Useful for development and debugging when only the REST server (with
//! OpenAPI/Swagger UI) is wanted. The workspace's main `docflex-run` binary
//! serves the same router.

use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Main entry point for the DocFlex REST API server
///
/// # Environment Variables
/// - `DOCFLEX_REST_ADDR`: Server address (default: "0.0.0.0:3000")
/// - `DOCFLEX_API_BASE`, `DOCFLEX_PAGE_SIZE`, `DOCFLEX_SEARCH_DEBOUNCE_MS`,
///   `DOCFLEX_SUGGESTION_LIMIT`: core configuration
///
/// # Errors
/// Returns an error if:
/// - the logging/tracing configuration cannot be initialised,
/// - the core configuration is invalid,
/// - the server address cannot be bound, or
/// - the HTTP server fails while running.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("api_rest=info".parse()?)
                .add_directive("docflex_core=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let addr = std::env::var("DOCFLEX_REST_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".into());
    let cfg = Arc::new(api_rest::config_from_env()?);

    tracing::info!("-- Starting DocFlex REST API on {}", addr);

    let app = api_rest::router(api_rest::AppState::new(cfg));
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
