// Copyright 2026 CosmoDance Contributors
// SPDX-License-Identifier: Apache-2.0

//! HTTP REST API.
//!
//! Thin JSON layer over the [`Engine`] facade and the chat adapter. The
//! engine never surfaces errors, so every handler is infallible; degradation
//! shows up only in snapshot metadata and the health payload.

use crate::chat::{self, ChatBackend, ChatMessage};
use crate::engine::Engine;
use crate::snapshot::Snapshot;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;
use std::time::Instant;
use tower_http::cors::{Any, CorsLayer};
use tracing::{info, warn};

/// State shared by all handlers.
pub struct AppState {
    pub engine: Arc<Engine>,
    pub chat: Option<Arc<dyn ChatBackend>>,
    started_at: Instant,
}

impl AppState {
    pub fn new(engine: Arc<Engine>, chat: Option<Arc<dyn ChatBackend>>) -> Self {
        Self {
            engine,
            chat,
            started_at: Instant::now(),
        }
    }
}

/// Build the axum Router with all endpoints.
pub fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health))
        .route("/chat", post(handle_chat))
        .route("/api/v1/schedule", get(get_schedule))
        .route("/api/v1/prices", get(get_prices))
        .route("/api/v1/stats", get(get_stats))
        .route("/api/v1/styles", get(list_styles))
        .route("/api/v1/cache/clear", post(clear_cache))
        .layer(cors)
        .with_state(state)
}

/// Start the REST server on the given port. Runs until the process exits.
pub async fn start(port: u16, state: Arc<AppState>) -> anyhow::Result<()> {
    let app = router(state);
    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], port));
    info!("REST API listening on http://{addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

// ── Handlers ────────────────────────────────────────────────────

/// Health payload: liveness plus the live-vs-fallback provenance of both
/// cache slots — the only place degradation is made visible.
async fn health(State(state): State<Arc<AppState>>) -> Json<Value> {
    let cache = state.engine.cache_status().await;
    Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "uptime_seconds": state.started_at.elapsed().as_secs_f64(),
        "chat_configured": state.chat.is_some(),
        "cache": cache,
    }))
}

#[derive(Deserialize, Default)]
struct ScheduleParams {
    branch: Option<String>,
}

async fn get_schedule(
    Query(params): Query<ScheduleParams>,
    State(state): State<Arc<AppState>>,
) -> Json<Snapshot> {
    Json(state.engine.get_schedule(params.branch.as_deref()).await)
}

async fn get_prices(State(state): State<Arc<AppState>>) -> Json<Snapshot> {
    Json(state.engine.get_prices().await)
}

async fn get_stats(State(state): State<Arc<AppState>>) -> Json<Value> {
    let stats = state.engine.stats();
    let cache = state.engine.cache_status().await;
    Json(serde_json::json!({ "stats": stats, "cache": cache }))
}

async fn list_styles() -> Json<Value> {
    Json(serde_json::json!({ "styles": crate::knowledge::STYLES }))
}

async fn clear_cache(State(state): State<Arc<AppState>>) -> Json<Value> {
    state.engine.clear_cache().await;
    Json(serde_json::json!({ "cleared": true }))
}

#[derive(Deserialize)]
struct ChatRequest {
    message: String,
}

/// Chat endpoint. The model answers from the current client views; any
/// backend failure degrades to a canned reply, mirroring the engine's
/// never-throw contract.
async fn handle_chat(
    State(state): State<Arc<AppState>>,
    Json(body): Json<ChatRequest>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    if body.message.trim().is_empty() {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({ "error": "message must not be empty" })),
        ));
    }

    let Some(backend) = state.chat.as_ref() else {
        return Ok(Json(serde_json::json!({ "reply": chat::FALLBACK_REPLY })));
    };

    let schedule = state.engine.get_schedule(None).await;
    let prices = state.engine.get_prices().await;
    let messages = [
        ChatMessage::system(chat::system_prompt(&schedule, &prices)),
        ChatMessage::user(body.message),
    ];

    let reply = match backend.complete(&messages).await {
        Ok(text) => text,
        Err(e) => {
            warn!("chat backend failed, serving canned reply: {e:#}");
            chat::FALLBACK_REPLY.to_string()
        }
    };
    Ok(Json(serde_json::json!({ "reply": reply })))
}
