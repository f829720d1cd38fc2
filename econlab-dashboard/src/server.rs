//! HTTP server implementation using axum.
//!
//! Every request re-runs the join and the regressions against the files on
//! disk, so a fetch that lands while the server is up shows on the next reload.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Json, Response};
use axum::routing::get;
use axum::Router;
use serde::Serialize;
use tracing::{error, info, warn};

use crate::config::DashboardConfig;
use crate::page::{load_view, render_page, DashboardError, DashboardView};
use econlab_analysis::PanelSummary;

/// Shared application state for axum handlers.
#[derive(Clone)]
pub struct AppState {
    config: Arc<DashboardConfig>,
}

impl AppState {
    pub fn new(config: DashboardConfig) -> Self {
        Self {
            config: Arc::new(config),
        }
    }
}

#[derive(Serialize)]
struct PanelsResponse {
    rows: usize,
    panels: Vec<PanelSummary>,
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

/// Create the axum router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(serve_index))
        .route("/api/panels", get(get_panels))
        .route("/health", get(health))
        .with_state(state)
}

/// Load the view off the async runtime; polars and file IO block.
async fn load(state: &AppState) -> Result<DashboardView, DashboardError> {
    let data_dir = state.config.data_dir.clone();
    tokio::task::spawn_blocking(move || load_view(&data_dir))
        .await
        .map_err(|e| DashboardError::Task(e.to_string()))?
}

async fn serve_index(State(state): State<AppState>) -> Response {
    let view = load(&state).await;
    if let Err(e) = &view {
        warn!(error = %e, "dashboard data unavailable");
    }
    match render_page(&view) {
        Ok(html) => Html(html).into_response(),
        Err(e) => {
            error!(error = %e, "failed to render dashboard");
            (StatusCode::INTERNAL_SERVER_ERROR, "failed to render dashboard").into_response()
        }
    }
}

async fn get_panels(State(state): State<AppState>) -> Response {
    match load(&state).await {
        Ok(view) => Json(PanelsResponse {
            rows: view.table.len(),
            panels: view.summaries(),
        })
        .into_response(),
        Err(e) => {
            warn!(error = %e, "panel summary unavailable");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: e.to_string(),
                }),
            )
                .into_response()
        }
    }
}

async fn health() -> &'static str {
    "ok"
}

/// Run the dashboard HTTP server until the process is stopped.
pub async fn run_server(config: DashboardConfig) -> std::io::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    info!(
        port = config.port,
        data_dir = %config.data_dir.display(),
        "Starting dashboard server"
    );

    let app = create_router(AppState::new(config));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await
}
