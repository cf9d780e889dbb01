//! services/api/src/web/practice_task.rs
//!
//! This module contains the asynchronous "worker" function responsible for
//! handling a single practice utterance: transcribe, evaluate, score,
//! persist, and speak the coach's reply.

use crate::web::{
    protocol::ServerMessage,
    state::{AppState, PracticeState},
};
use axum::extract::ws::{Message, WebSocket};
use coach_core::scoring::{self, Verdict};
use coach_core::session::SessionStore;
use futures::{stream::SplitSink, SinkExt};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Mutex;
use tracing::{error, info, warn};

/// The main asynchronous task for one buffered utterance.
///
/// Every failure inside this task has a silent-recovery path: capture
/// failures clear the flags and change nothing, analysis failures surface
/// as the fallback verdict, and persistence or playback failures are logged
/// without interrupting the practice loop.
pub async fn practice_process(
    app_state: Arc<AppState>,
    practice_state: Arc<Mutex<PracticeState>>,
    ws_sender: Arc<Mutex<SplitSink<WebSocket, Message>>>,
    audio: Vec<u8>,
    seq: u64,
) {
    let start_time = Instant::now();
    info!("Practice process started for utterance {seq}.");

    send(&ws_sender, &ServerMessage::Processing).await;

    // --- 1. Transcribe ---
    let transcript = match app_state.sst_adapter.transcribe_audio(&audio).await {
        Ok(text) => text.trim().to_string(),
        Err(e) => {
            warn!("Transcription failed for utterance {seq}: {e}");
            send(
                &ws_sender,
                &ServerMessage::CaptureError {
                    message: "I couldn't hear that. Please try again.".to_string(),
                },
            )
            .await;
            return;
        }
    };

    if transcript.is_empty() {
        info!("No speech detected in utterance {seq}.");
        send(
            &ws_sender,
            &ServerMessage::CaptureError {
                message: "No speech detected.".to_string(),
            },
        )
        .await;
        return;
    }

    info!("Transcribed utterance {seq}: '{transcript}'");
    send(
        &ws_sender,
        &ServerMessage::Transcript {
            text: transcript.clone(),
        },
    )
    .await;

    // --- 2. Evaluate (never fails; fallback verdict on any client error) ---
    let analysis = app_state.analysis.evaluate(&transcript).await;

    // --- 3. Score, discarding stale results, and persist ---
    let verdict = scoring::apply_analysis(&analysis, &transcript);
    let points = match apply_if_current(&app_state.store, &practice_state, &verdict, seq).await {
        Some(points) => points,
        None => {
            info!("Discarding stale analysis for utterance {seq}.");
            return;
        }
    };

    send(
        &ws_sender,
        &ServerMessage::Verdict {
            status: analysis.status,
            banner: verdict.banner.clone(),
            points,
        },
    )
    .await;

    // --- 4. Speak the reply ---
    speak(&app_state, &practice_state, &ws_sender, &verdict.reply).await;

    info!(
        "Practice process for utterance {seq} took {:?}.",
        start_time.elapsed()
    );
}

/// Applies `verdict` to the session only when `seq` is still the current
/// utterance, returning the new point total. `None` means a newer recording
/// started while the analysis was in flight and the verdict was discarded.
///
/// The practice lock is held across the apply, so the staleness check and
/// the mutation are atomic with respect to the control loop bumping the
/// sequence number.
pub async fn apply_if_current(
    store: &Mutex<SessionStore>,
    practice_state: &Mutex<PracticeState>,
    verdict: &Verdict,
    seq: u64,
) -> Option<i64> {
    let practice = practice_state.lock().await;
    if practice.utterance_seq != seq {
        return None;
    }

    let mut session = store.lock().await;
    if let Err(e) = session.apply_verdict(verdict).await {
        error!("Failed to persist session snapshot: {e}");
    }
    Some(session.snapshot().points)
}

/// Synthesizes `text` and streams it to the client. Starting a new playback
/// cancels the one in flight, so replies never overlap.
pub async fn speak(
    app_state: &Arc<AppState>,
    practice_state: &Arc<Mutex<PracticeState>>,
    ws_sender: &Arc<Mutex<SplitSink<WebSocket, Message>>>,
    text: &str,
) {
    let token = {
        let mut practice = practice_state.lock().await;
        practice.playback_token.cancel();
        practice.playback_token = tokio_util::sync::CancellationToken::new();
        practice.playback_token.clone()
    };

    let audio = match app_state.tts_adapter.generate_audio(text).await {
        Ok(audio) => audio,
        Err(e) => {
            // The verdict already reached the client; losing the spoken
            // reply is not fatal.
            warn!("Text-to-speech failed: {e}");
            return;
        }
    };

    // The sender is held for the whole started/audio/ended triple so a
    // newer reply cannot interleave its frames with this one. The token is
    // re-checked under the lock: a playback cancelled while waiting here
    // must not start at all.
    let mut sender = ws_sender.lock().await;
    if token.is_cancelled() {
        info!("Playback superseded before it started; dropping reply audio.");
        return;
    }

    let (started, ended) = match (
        serde_json::to_string(&ServerMessage::SpeakingStarted),
        serde_json::to_string(&ServerMessage::SpeakingEnded),
    ) {
        (Ok(started), Ok(ended)) => (started, ended),
        _ => {
            error!("Failed to serialize playback messages.");
            return;
        }
    };

    if sender.send(Message::Text(started.into())).await.is_err()
        || sender.send(Message::Binary(audio.into())).await.is_err()
        || sender.send(Message::Text(ended.into())).await.is_err()
    {
        error!("Failed to stream reply audio to client.");
    }
}

/// Serializes and sends one server message, logging on failure.
pub async fn send(ws_sender: &Arc<Mutex<SplitSink<WebSocket, Message>>>, msg: &ServerMessage) {
    let json = match serde_json::to_string(msg) {
        Ok(json) => json,
        Err(e) => {
            error!("Failed to serialize server message: {e}");
            return;
        }
    };
    if ws_sender
        .lock()
        .await
        .send(Message::Text(json.into()))
        .await
        .is_err()
    {
        warn!("Failed to send server message. Client may have disconnected.");
    }
}
