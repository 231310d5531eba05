use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use api_rest::AppState;

/// Main entry point for the DocFlex application
///
/// Starts the REST server (default port 3000) with Swagger UI at `/swagger-ui`
/// and stops it on Ctrl-C.
///
/// # Environment Variables
/// - `DOCFLEX_REST_ADDR`: REST server address (default: "0.0.0.0:3000")
/// - `DOCFLEX_API_BASE`: backend API base path (default: "/api/v1")
/// - `DOCFLEX_PAGE_SIZE`: rows per list page (default: 10)
/// - `DOCFLEX_SEARCH_DEBOUNCE_MS`: search debounce in milliseconds (default: 500)
/// - `DOCFLEX_SUGGESTION_LIMIT`: product suggestions shown (default: 10)
///
/// # Returns
/// * `Ok(())` - If the server starts and shuts down cleanly
/// * `Err(anyhow::Error)` - If configuration, startup or serving fails
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("docflex=info".parse()?)
                .add_directive("api_rest=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let rest_addr = std::env::var("DOCFLEX_REST_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".into());
    let cfg = Arc::new(api_rest::config_from_env()?);

    tracing::info!(
        "++ Backend API base {} (page size {}, search debounce {:?})",
        cfg.api_base(),
        cfg.page_size(),
        cfg.search_debounce(),
    );
    tracing::info!("++ Starting DocFlex REST on {}", rest_addr);

    let app = api_rest::router(AppState::new(cfg));
    let listener = tokio::net::TcpListener::bind(&rest_addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            tokio::signal::ctrl_c().await.ok();
            tracing::info!("-- Shutting down DocFlex REST");
        })
        .await?;

    Ok(())
}
