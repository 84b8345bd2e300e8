//! `GET /ws/admin`: one-way server push of device events. The admin token
//! travels in the query string since browsers can't set a WebSocket
//! handshake header, so this route carries its own auth check rather than
//! the `admin_auth` header middleware.

use crate::state::AppState;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use futures_util::{SinkExt, StreamExt};
use mdm_telemetry::metrics::WS_DROPPED_MESSAGES;
use serde::Deserialize;
use subtle::ConstantTimeEq;
use tokio::time::{interval, Duration};
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

const KEEPALIVE_INTERVAL_SECONDS: u64 = 25;

#[derive(Debug, Deserialize)]
pub struct AdminSocketAuth {
    pub token: String,
}

#[instrument(skip(upgrade, state, auth))]
pub async fn upgrade(
    upgrade: WebSocketUpgrade,
    State(state): State<AppState>,
    Query(auth): Query<AdminSocketAuth>,
) -> Response {
    let matches: bool = auth.token.as_bytes().ct_eq(state.config.admin_key.as_bytes()).into();
    if !matches {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    upgrade.on_upgrade(move |socket| handle_connection(socket, state))
}

async fn handle_connection(socket: WebSocket, state: AppState) {
    let (mut sink, mut stream) = socket.split();
    let mut events = state.event_bus.subscribe();
    let session_id = Uuid::new_v4();

    info!(%session_id, "admin socket opened");

    let mut reader = tokio::spawn(async move {
        while let Some(message) = stream.next().await {
            match message {
                Ok(Message::Close(_)) => break,
                Ok(_) => continue,
                Err(error) => {
                    debug!(%error, "admin socket read error");
                    break;
                }
            }
        }
    });

    let mut writer = tokio::spawn(async move {
        let mut keepalive = interval(Duration::from_secs(KEEPALIVE_INTERVAL_SECONDS));
        loop {
            tokio::select! {
                _ = keepalive.tick() => {
                    if sink.send(Message::Ping(Vec::new())).await.is_err() {
                        break;
                    }
                }
                received = events.recv() => {
                    match received {
                        Ok(event) => {
                            let payload = match serde_json::to_string(&event) {
                                Ok(payload) => payload,
                                Err(error) => {
                                    warn!(%error, "failed to serialize device event");
                                    continue;
                                }
                            };
                            if sink.send(Message::Text(payload)).await.is_err() {
                                break;
                            }
                        }
                        Err(tokio::sync::broadcast::error::RecvError::Lagged(missed)) => {
                            WS_DROPPED_MESSAGES.inc_by(missed);
                        }
                        Err(tokio::sync::broadcast::error::RecvError::Closed) => break,
                    }
                }
            }
        }
    });

    tokio::select! {
        _ = &mut writer => reader.abort(),
        _ = &mut reader => writer.abort(),
    }

    info!(%session_id, "admin socket closed");
}
