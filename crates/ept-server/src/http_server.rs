// HTTP surface: the leaderboard JSON endpoint plus static assets.

use std::future::Future;
use std::path::PathBuf;
use std::sync::Arc;

use axum::extract::State;
use axum::http::{Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use chrono::Utc;
use ept_core::{rank_payload, NormalizeError, RankedResult, Season};
use serde_json::json;
use thiserror::Error;
use tokio::net::TcpListener;
use tracing::{error, info};

use crate::static_files;
use crate::upstream::{FetchError, StatsSource};

/// Path of the leaderboard endpoint.
pub const STATS_PATH: &str = "/api/stats";

/// Shared per-process state handed to every handler. Nothing in here is
/// mutated after startup.
#[derive(Clone)]
pub struct AppState {
    pub source: Arc<dyn StatsSource>,
    pub static_dir: Arc<PathBuf>,
}

impl AppState {
    pub fn new(source: Arc<dyn StatsSource>, static_dir: impl Into<PathBuf>) -> Self {
        Self {
            source,
            static_dir: Arc::new(static_dir.into()),
        }
    }
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// A request that produced no leaderboard. Rendered as
/// `500 {"error": "<message>"}`.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Normalize(#[from] NormalizeError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(json!({ "error": self.to_string() }));
        (StatusCode::INTERNAL_SERVER_ERROR, body).into_response()
    }
}

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

pub fn router(state: AppState) -> Router {
    Router::new()
        .route(STATS_PATH, get(leaderboard))
        .fallback(static_assets)
        .with_state(state)
}

/// Serve on an already-bound listener until `shutdown` resolves.
pub async fn run<F>(listener: TcpListener, state: AppState, shutdown: F) -> anyhow::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let local_addr = listener.local_addr()?;
    info!("HTTP server listening on {local_addr}");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown)
        .await?;

    info!("HTTP server stopped");
    Ok(())
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// Fetch the current season's totals and return the top players by EPT.
/// Every call goes to the provider; a failure is reported, never papered
/// over with an earlier result.
async fn leaderboard(State(state): State<AppState>) -> Result<Json<RankedResult>, ApiError> {
    let season = Season::current();

    let payload = state
        .source
        .fetch_league_totals(&season)
        .await
        .inspect_err(|e| error!(%season, "stats fetch failed: {e}"))?;

    let ranked = rank_payload(&payload, season, Utc::now())
        .inspect_err(|e| error!(%season, "stats payload rejected: {e}"))?;

    info!(%season, players = ranked.players.len(), "served leaderboard");
    Ok(Json(ranked))
}

async fn static_assets(State(state): State<AppState>, method: Method, uri: Uri) -> Response {
    static_files::serve(&state.static_dir, method, &uri).await
}
