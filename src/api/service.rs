use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use crate::error::GameError;
use crate::state::StateManager;
use crate::types::*;

type AppState = Arc<StateManager>;

impl IntoResponse for GameError {
    fn into_response(self) -> Response {
        let status = if self.is_client_error() {
            StatusCode::BAD_REQUEST
        } else {
            error!("Internal error: {}", self);
            StatusCode::INTERNAL_SERVER_ERROR
        };

        (status, Json(ErrorBody { detail: self.to_string() })).into_response()
    }
}

pub fn router(state_manager: Arc<StateManager>, allow_any_origin: bool) -> Router {
    let router = Router::new()
        .route("/health", get(health))
        .route("/api/player/:player_id", get(get_player))
        .route("/api/click", post(click))
        .route("/api/upgrade", post(purchase_upgrade))
        .route("/api/advance", post(advance))
        .route("/api/save", post(save))
        .route("/api/export/:player_id", get(export))
        .route("/api/import", post(import))
        .with_state(state_manager)
        .layer(TraceLayer::new_for_http());

    if allow_any_origin {
        router.layer(CorsLayer::very_permissive())
    } else {
        router
    }
}

async fn health() -> &'static str {
    "ok"
}

async fn get_player(
    State(state): State<AppState>,
    Path(player_id): Path<String>,
) -> Result<Json<PlayerView>, GameError> {
    Ok(Json(state.get_player(&player_id).await?))
}

async fn click(
    State(state): State<AppState>,
    Json(req): Json<PlayerRequest>,
) -> Result<Json<ClickResponse>, GameError> {
    Ok(Json(state.click(&req.player_id).await?))
}

async fn purchase_upgrade(
    State(state): State<AppState>,
    Json(req): Json<UpgradeRequest>,
) -> Result<Json<UpgradeResponse>, GameError> {
    Ok(Json(state.purchase_upgrade(&req.player_id, req.upgrade_level).await?))
}

async fn advance(
    State(state): State<AppState>,
    Json(req): Json<PlayerRequest>,
) -> Result<Json<AdvanceResponse>, GameError> {
    Ok(Json(state.advance(&req.player_id).await?))
}

async fn save(
    State(state): State<AppState>,
    Json(req): Json<PlayerRequest>,
) -> Result<Json<SaveResponse>, GameError> {
    Ok(Json(state.save(&req.player_id).await?))
}

async fn export(
    State(state): State<AppState>,
    Path(player_id): Path<String>,
) -> Result<Json<ExportResponse>, GameError> {
    Ok(Json(state.export(&player_id).await?))
}

async fn import(
    State(state): State<AppState>,
    Json(req): Json<ImportRequest>,
) -> Result<Json<ImportResponse>, GameError> {
    Ok(Json(state.import(&req.player_id, &req.save_data).await?))
}

pub async fn start_http_server(
    addr: SocketAddr,
    app: Router,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("🚀 HTTP server listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
}
