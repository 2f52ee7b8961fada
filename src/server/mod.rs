//! HTTP API for analyzing text and searching stored analyses.

mod handlers;
mod routes;

pub use routes::create_router;

use std::sync::Arc;

use anyhow::Context;

use crate::llm::AnalysisProvider;
use crate::repository::AnalysisStore;
use crate::services::{AnalysisService, SearchService};

/// Shared state for the web server.
#[derive(Clone)]
pub struct AppState {
    pub analysis: AnalysisService,
    pub search: SearchService,
    pub store: Arc<dyn AnalysisStore>,
}

impl AppState {
    pub fn new(provider: Arc<dyn AnalysisProvider>, store: Arc<dyn AnalysisStore>) -> Self {
        Self {
            analysis: AnalysisService::new(provider, store.clone()),
            search: SearchService::new(store.clone()),
            store,
        }
    }
}

/// Start the web server and run until Ctrl-C.
pub async fn serve(state: AppState, bind: &str) -> anyhow::Result<()> {
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(bind)
        .await
        .with_context(|| format!("Failed to bind {}", bind))?;
    tracing::info!("Listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}
