//! services/api/src/web/state.rs
//!
//! Defines the application's shared and connection-specific states.

use crate::config::Config;
use coach_core::analysis::AnalysisClient;
use coach_core::ports::{SpeechToTextService, TextToSpeechService};
use coach_core::session::SessionStore;
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;

//=========================================================================================
// AppState (Shared Across All Connections)
//=========================================================================================

/// The shared application state, created once at startup and passed to all handlers.
///
/// The session store sits behind one async mutex: every mutator
/// read-modifies-writes the latest snapshot atomically, whichever completion
/// callback invokes it.
pub struct AppState {
    pub store: Mutex<SessionStore>,
    pub analysis: AnalysisClient,
    pub sst_adapter: Arc<dyn SpeechToTextService>,
    pub tts_adapter: Arc<dyn TextToSpeechService>,
    pub config: Arc<Config>,
}

//=========================================================================================
// PracticeState (Specific to One WebSocket Connection)
//=========================================================================================

/// The state for a single, active practice connection.
pub struct PracticeState {
    /// True between `recording_started` and `recording_ended`; binary
    /// frames are only buffered while set.
    pub recording: bool,
    /// PCM16 audio accumulated for the current utterance.
    pub audio_buffer: Vec<u8>,
    /// Monotonic utterance counter. An analysis result whose sequence
    /// number is no longer current is stale and gets discarded.
    pub utterance_seq: u64,
    /// Cancels the reply currently being spoken; starting a new playback
    /// replaces this token, so at most one utterance plays at a time.
    pub playback_token: CancellationToken,
}

impl PracticeState {
    pub fn new() -> Self {
        Self {
            recording: false,
            audio_buffer: Vec::new(),
            utterance_seq: 0,
            playback_token: CancellationToken::new(),
        }
    }
}

impl Default for PracticeState {
    fn default() -> Self {
        Self::new()
    }
}
