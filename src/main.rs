//! Signalling relay for ad-hoc video-call rooms
//!
//! Tracks which connections belong to which room, forwards opaque
//! negotiation payloads between specific peers, and fans out each room's
//! chat transcript. All state is in-memory; a restart wipes every room,
//! membership list, and transcript.

mod config;
mod directory;
mod handlers;
mod protocol;
mod state;

use axum::{
    extract::{
        ws::{Message, WebSocket},
        State, WebSocketUpgrade,
    },
    http::HeaderValue,
    response::{Html, IntoResponse, Json},
    routing::get,
    Router,
};
use config::Config;
use futures::{SinkExt, StreamExt};
use protocol::{ClientMessage, ServerMessage};
use state::AppState;
use std::sync::Arc;
use tokio::sync::mpsc;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(&config.log_level))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let state = Arc::new(AppState::new(config.clone()));

    let cors = if config.cors_origins.iter().any(|origin| origin == "*") {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        let origins: Vec<HeaderValue> = config
            .cors_origins
            .iter()
            .filter_map(|origin| origin.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods(Any)
            .allow_headers(Any)
    };

    let app = Router::new()
        .route("/", get(index_handler))
        .route("/health", get(health_handler))
        .route("/ws", get(ws_handler))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state.clone());

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("Signalling server started");
    tracing::info!("Address: {}", addr);
    tracing::info!("WebSocket: ws://{}/ws", addr);

    axum::serve(listener, app).await?;
    Ok(())
}

async fn index_handler() -> Html<&'static str> {
    Html("<h1>Meet Signalling Server</h1><p>WebSocket endpoint: /ws</p>")
}

async fn health_handler(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    let rooms = state.directory.lock().await.room_count();
    Json(serde_json::json!({
        "status": "ok",
        "server": "meet-signaling-rs",
        "connections": state.peers.len(),
        "rooms": rooms,
        "timestamp": std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0)
    }))
}

async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    let (mut ws_sender, mut ws_receiver) = socket.split();
    let (tx, mut rx) = mpsc::unbounded_channel::<ServerMessage>();

    let peer_id = handlers::handle_connection(state.clone(), tx.clone()).await;

    // Writer task: drains this connection's queue at its own pace, so a
    // slow client only grows its queue and never stalls other rooms.
    let send_task = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if let Ok(json) = serde_json::to_string(&msg) {
                if ws_sender.send(Message::Text(json)).await.is_err() {
                    break;
                }
            }
        }
    });

    // Events for one connection are handled in arrival order; cross-
    // connection ordering comes from the directory lock.
    while let Some(result) = ws_receiver.next().await {
        match result {
            Ok(Message::Text(text)) => match serde_json::from_str::<ClientMessage>(&text) {
                Ok(msg) => handle_client_message(&state, &peer_id, &tx, msg).await,
                Err(err) => {
                    tracing::debug!(peer_id = %peer_id, error = %err, "Ignored malformed frame");
                }
            },
            Ok(Message::Close(_)) => break,
            Err(_) => break,
            _ => {}
        }
    }

    handlers::handle_disconnect(state, &peer_id).await;
    send_task.abort();
}

async fn handle_client_message(
    state: &Arc<AppState>,
    peer_id: &str,
    sender: &mpsc::UnboundedSender<ServerMessage>,
    msg: ClientMessage,
) {
    match msg {
        ClientMessage::Heartbeat => {
            handlers::handle_heartbeat(sender);
        }
        ClientMessage::JoinCall { room_key } => {
            handlers::handle_join_call(state.clone(), peer_id, &room_key).await;
        }
        ClientMessage::Signal { to, payload } => {
            handlers::handle_signal(state.clone(), peer_id, &to, payload).await;
        }
        ClientMessage::ChatMessage {
            body,
            sender: display_sender,
        } => {
            handlers::handle_chat_message(state.clone(), peer_id, &display_sender, &body).await;
        }
    }
}
