use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::response::Response;
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;

use crate::config;
use crate::detect;
use crate::payload::ErrorPayload;
use crate::session::TrackSession;

pub(crate) fn start_api_server(cancel: CancellationToken) {
    tokio::spawn(async move {
        let app = Router::new()
            .route("/health", get(health))
            .route("/ws/track", get(ws_track));

        let addr = config::config().listen_addr();
        let listener = match TcpListener::bind(addr).await {
            Ok(listener) => listener,
            Err(e) => {
                log::error!("failed to bind {}: {}", addr, e);
                cancel.cancel();
                return;
            }
        };
        log::info!("API server started on {}", addr);
        if let Err(e) = axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal(cancel))
            .await
        {
            log::error!("API server error: {}", e);
        }
    });
}

async fn shutdown_signal(cancel: CancellationToken) {
    cancel.cancelled().await;
    log::info!("shutting down API server");
}

#[derive(Serialize)]
struct Health {
    status: &'static str,
}

async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

async fn ws_track(ws: WebSocketUpgrade) -> Response {
    ws.on_upgrade(track_socket)
}

/// Connection loop: one tracker per socket, messages strictly in order,
/// exactly one reply per binary frame. Per-message faults answer inline;
/// only transport faults end the loop.
async fn track_socket(mut socket: WebSocket) {
    let config = config::config();
    let engine = match detect::build_engine(config) {
        Ok(engine) => engine,
        Err(e) => {
            log::error!("cannot start tracking session: {}", e);
            let reply = ErrorPayload {
                error: e.to_string(),
            };
            if let Ok(text) = serde_json::to_string(&reply) {
                let _ = socket.send(Message::Text(text.into())).await;
            }
            return;
        }
    };
    let mut session = TrackSession::new(engine, config.detect_timeout());
    log::info!("tracking session opened");

    while let Some(received) = socket.recv().await {
        let message = match received {
            Ok(message) => message,
            Err(e) => {
                log::debug!("socket receive error: {}", e);
                break;
            }
        };
        let raw = match message {
            Message::Binary(raw) => raw,
            Message::Close(_) => break,
            // Pings are answered by axum; text and pongs are ignored.
            _ => continue,
        };

        let reply = match session.handle_frame(&raw).await {
            Ok(payload) => serde_json::to_string(&payload),
            Err(e) => {
                log::warn!("frame handling fault: {}", e);
                serde_json::to_string(&ErrorPayload {
                    error: e.to_string(),
                })
            }
        };
        let text = match reply {
            Ok(text) => text,
            Err(e) => {
                log::error!("payload serialization failed: {}", e);
                continue;
            }
        };
        if socket.send(Message::Text(text.into())).await.is_err() {
            break;
        }
    }

    log::info!("tracking session closed");
}
