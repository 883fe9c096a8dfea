//! HTTP surface: router, middleware, server startup

pub mod error;
pub mod handlers;
pub mod state;

use axum::Router;
use axum::routing::get;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub use state::AppState;

/// Create the axum Router with all routes and middleware.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/search", get(handlers::describe).post(handlers::search))
        .route("/health", get(handlers::health))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Bind and serve until the process is stopped.
pub async fn serve(addr: &str, port: u16, state: AppState) -> anyhow::Result<()> {
    let bind = format!("{addr}:{port}");
    let router = create_router(state);

    tracing::info!("starting search API on {bind}");
    println!("quest API listening on http://{bind}");

    let listener = tokio::net::TcpListener::bind(&bind).await?;
    axum::serve(listener, router).await?;
    Ok(())
}
