//! services/api/src/web/ws_handler.rs
//!
//! This is the main entry point and control loop for a practice WebSocket
//! connection. It tracks the recording state machine and delegates each
//! completed utterance to the practice task.

use crate::web::{
    practice_task::{practice_process, send, speak},
    protocol::{ClientMessage, ServerMessage},
    state::{AppState, PracticeState},
};
use axum::{
    extract::{
        ws::{Message, WebSocket},
        State, WebSocketUpgrade,
    },
    response::Response,
};
use futures::stream::StreamExt;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{error, info, warn};

/// What the coach says when a practice connection opens.
const GREETING: &str =
    "Hi! I'm your speaking coach. Tap the mic and say something in English whenever you're ready.";

/// The handler for upgrading HTTP requests to WebSocket connections.
pub async fn ws_handler(ws: WebSocketUpgrade, State(app_state): State<Arc<AppState>>) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, app_state))
}

async fn handle_socket(socket: WebSocket, app_state: Arc<AppState>) {
    info!("New practice connection established.");

    // The sender is wrapped in an Arc<Mutex<>> to allow for shared mutable
    // access across the control loop and spawned utterance tasks.
    let (sender, mut receiver) = socket.split();
    let ws_sender = Arc::new(Mutex::new(sender));

    // --- 1. Authentication Check ---
    let points = {
        let store = app_state.store.lock().await;
        if !store.snapshot().is_authenticated {
            error!("Practice connection rejected: no user is signed in.");
            send(
                &ws_sender,
                &ServerMessage::Error {
                    message: "Please sign in before starting a practice session.".to_string(),
                },
            )
            .await;
            return;
        }
        store.snapshot().points
    };

    send(&ws_sender, &ServerMessage::Ready { points }).await;

    let practice_state = Arc::new(Mutex::new(PracticeState::new()));

    // Spoken greeting; losing it is not fatal.
    speak(&app_state, &practice_state, &ws_sender, GREETING).await;

    // --- 2. Control Loop ---
    while let Some(Ok(message)) = receiver.next().await {
        match message {
            Message::Text(json) => match serde_json::from_str::<ClientMessage>(&json) {
                Ok(ClientMessage::RecordingStarted) => {
                    let mut practice = practice_state.lock().await;
                    practice.recording = true;
                    practice.audio_buffer.clear();
                    // Bumping the sequence here also marks any in-flight
                    // analysis for the previous utterance as stale.
                    practice.utterance_seq += 1;
                    drop(practice);
                    send(&ws_sender, &ServerMessage::CaptureStarted).await;
                }
                Ok(ClientMessage::RecordingEnded) => {
                    let (audio, seq) = {
                        let mut practice = practice_state.lock().await;
                        if !practice.recording {
                            warn!("recording_ended without a matching recording_started.");
                            continue;
                        }
                        practice.recording = false;
                        (std::mem::take(&mut practice.audio_buffer), practice.utterance_seq)
                    };
                    send(&ws_sender, &ServerMessage::CaptureEnded).await;

                    let task_app_state = app_state.clone();
                    let task_practice_state = practice_state.clone();
                    let task_sender = ws_sender.clone();
                    tokio::spawn(practice_process(
                        task_app_state,
                        task_practice_state,
                        task_sender,
                        audio,
                        seq,
                    ));
                }
                Err(e) => {
                    warn!("Ignoring unparseable client message: {e}");
                }
            },
            Message::Binary(frame) => {
                let mut practice = practice_state.lock().await;
                if practice.recording {
                    practice.audio_buffer.extend_from_slice(&frame);
                }
            }
            Message::Close(_) => break,
            _ => {}
        }
    }

    info!("Practice connection closed.");
}
