//! WebSocket server and connection handling.

use crate::protocol::{ClientMessage, ServerMessage};
use crate::session::{LevelLibrary, Session, SessionError, StartedLevel};
use dashmap::DashMap;
use futures_util::{SinkExt, StreamExt};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc;
use tokio_tungstenite::{accept_async, tungstenite::Message};
use tracing::{error, info, warn};
use uuid::Uuid;

/// Server state shared across all connections.
pub struct ServerState {
    /// All live sessions, one per connection
    pub sessions: DashMap<Uuid, Session>,
    /// Mapping from session ID to its message sender
    pub senders: DashMap<Uuid, mpsc::UnboundedSender<ServerMessage>>,
    /// Numbered level files
    pub library: LevelLibrary,
}

impl ServerState {
    pub fn new(library: LevelLibrary) -> Self {
        Self {
            sessions: DashMap::new(),
            senders: DashMap::new(),
            library,
        }
    }

    /// Send a message to a specific session.
    pub fn send_to_session(&self, session_id: Uuid, msg: ServerMessage) {
        if let Some(sender) = self.senders.get(&session_id) {
            let _ = sender.send(msg);
        }
    }
}

/// Run the WebSocket server.
pub async fn run_server(addr: SocketAddr, state: Arc<ServerState>) -> anyhow::Result<()> {
    let listener = TcpListener::bind(addr).await?;
    info!("Jewelry server listening on {}", addr);

    while let Ok((stream, peer_addr)) = listener.accept().await {
        let state = Arc::clone(&state);
        tokio::spawn(async move {
            if let Err(e) = handle_connection(stream, peer_addr, state).await {
                error!("Connection error from {}: {}", peer_addr, e);
            }
        });
    }

    Ok(())
}

/// Handle a single WebSocket connection.
async fn handle_connection(
    stream: TcpStream,
    addr: SocketAddr,
    state: Arc<ServerState>,
) -> anyhow::Result<()> {
    let ws_stream = accept_async(stream).await?;
    info!("New WebSocket connection from {}", addr);

    let (mut ws_sender, mut ws_receiver) = ws_stream.split();

    let session_id = Uuid::new_v4();
    state.sessions.insert(session_id, Session::new(session_id));

    // Create channel for outgoing messages
    let (tx, mut rx) = mpsc::unbounded_channel::<ServerMessage>();
    state.senders.insert(session_id, tx);

    let welcome = ServerMessage::Welcome { session_id };
    let msg_text = serde_json::to_string(&welcome)?;
    ws_sender.send(Message::Text(msg_text.into())).await?;

    // Forward messages from channel to WebSocket
    let send_task = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            match serde_json::to_string(&msg) {
                Ok(text) => {
                    if ws_sender.send(Message::Text(text.into())).await.is_err() {
                        break;
                    }
                }
                Err(e) => error!("Failed to encode message: {}", e),
            }
        }
    });

    while let Some(msg) = ws_receiver.next().await {
        match msg {
            Ok(Message::Text(text)) => match serde_json::from_str::<ClientMessage>(&text) {
                Ok(client_msg) => handle_message(session_id, client_msg, &state),
                Err(e) => {
                    warn!("Invalid message from {}: {}", session_id, e);
                    state.send_to_session(
                        session_id,
                        ServerMessage::Error {
                            message: format!("Invalid message: {}", e),
                        },
                    );
                }
            },
            Ok(Message::Close(_)) => {
                info!("Client {} closing connection", session_id);
                break;
            }
            Ok(Message::Ping(_)) => {
                state.send_to_session(session_id, ServerMessage::Pong);
            }
            Err(e) => {
                error!("WebSocket error from {}: {}", session_id, e);
                break;
            }
            _ => {}
        }
    }

    // Sessions do not outlive their connection
    state.sessions.remove(&session_id);
    state.senders.remove(&session_id);
    send_task.abort();

    info!("Connection closed for {}", session_id);
    Ok(())
}

/// Handle a client message.
fn handle_message(session_id: Uuid, msg: ClientMessage, state: &Arc<ServerState>) {
    let reply = match state.sessions.get_mut(&session_id) {
        Some(mut session) => respond(&mut session, msg, &state.library),
        None => ServerMessage::Error {
            message: "Session not found".to_string(),
        },
    };
    state.send_to_session(session_id, reply);
}

/// Apply a client message to its session and build the reply
fn respond(session: &mut Session, msg: ClientMessage, library: &LevelLibrary) -> ServerMessage {
    let result = match msg {
        ClientMessage::StartLevel {
            level,
            level_number,
            seed,
        } => session
            .start_level(level, level_number, seed, library)
            .map(level_started),

        ClientMessage::Swap { from, to } => session
            .swap(from, to)
            .map(|(outcome, snapshot)| ServerMessage::MoveApplied { outcome, snapshot }),

        ClientMessage::Hint => session.hint().map(|swap| ServerMessage::Hint { swap }),

        ClientMessage::Reset => session.reset().map(level_started),

        ClientMessage::Snapshot => session
            .snapshot()
            .map(|snapshot| ServerMessage::LevelSnapshot { snapshot }),

        ClientMessage::Ping => Ok(ServerMessage::Pong),
    };

    result.unwrap_or_else(|e| rejection(session.id, e))
}

fn level_started(started: StartedLevel) -> ServerMessage {
    ServerMessage::LevelStarted {
        seed: started.seed,
        snapshot: started.snapshot,
        tiles: started.tiles,
    }
}

/// Swap failures carry their class; everything else is a plain error
fn rejection(session_id: Uuid, err: SessionError) -> ServerMessage {
    match err {
        SessionError::Level(e) => {
            if e.class() == jewel_core::ErrorClass::Internal {
                error!(session = %session_id, "level faulted: {}", e);
            }
            ServerMessage::SwapRejected {
                class: e.class(),
                reason: e.to_string(),
            }
        }
        other => {
            warn!(session = %session_id, class = ?other.class(), "request failed: {}", other);
            ServerMessage::Error {
                message: other.to_string(),
            }
        }
    }
}
