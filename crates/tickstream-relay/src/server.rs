use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket};
use axum::extract::{Path, State, WebSocketUpgrade};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use prost::Message as _;
use serde::Serialize;
use tower_http::cors::{Any, CorsLayer};

use crate::query::QueryService;
use crate::relay::Broadcast;

/// Shared state for the HTTP/WebSocket surface.
#[derive(Clone)]
pub struct AppState {
    pub query: Arc<QueryService>,
    pub broadcast: Arc<Broadcast>,
}

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    sessions: usize,
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        sessions: state.broadcast.session_count().await,
    })
}

/// Query endpoint: the trade aggregate for one TradeID, protobuf-encoded.
/// Malformed ids are rejected up front; reconstruction failures surface as
/// internal errors.
async fn get_transactions(
    State(state): State<AppState>,
    Path(trade_id): Path<String>,
) -> Response {
    let trade_id: u64 = match trade_id.parse() {
        Ok(id) => id,
        Err(_) => {
            tracing::warn!(raw = %trade_id, "rejecting non-numeric trade id");
            return (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse {
                    error: "invalid trade id".to_string(),
                }),
            )
                .into_response();
        }
    };

    match state.query.get_trade(trade_id).await {
        Ok(trade) => (
            [(header::CONTENT_TYPE, "application/x-protobuf")],
            trade.encode_to_vec(),
        )
            .into_response(),
        Err(e) => {
            tracing::error!(trade_id, error = %e, "trade reconstruction failed");
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

async fn ws(State(state): State<AppState>, upgrade: WebSocketUpgrade) -> Response {
    upgrade.on_upgrade(move |socket| client_session(state.broadcast, socket))
}

/// Pump broadcast payloads into one client connection until a write fails or
/// the peer goes away, then drop the session from the registry.
async fn client_session(broadcast: Arc<Broadcast>, mut socket: WebSocket) {
    let (id, mut rx) = broadcast.register().await;
    tracing::info!(session = id, "client connected");

    loop {
        tokio::select! {
            outbound = rx.recv() => {
                let Some(payload) = outbound else { break };
                if socket.send(Message::Binary(payload.to_vec())).await.is_err() {
                    break;
                }
            }
            inbound = socket.recv() => {
                match inbound {
                    Some(Ok(Message::Close(_))) | Some(Err(_)) | None => break,
                    // Inbound frames carry no meaning for this stream.
                    Some(Ok(_)) => {}
                }
            }
        }
    }

    broadcast.deregister(id).await;
    tracing::info!(session = id, "client disconnected");
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/transactions/:trade_id", get(get_transactions))
        .route("/ws", get(ws))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
