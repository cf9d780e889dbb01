//! crates/coach_core/src/ports.rs
//!
//! Defines the service contracts (traits) for the application's core logic.
//! These traits form the boundary of the hexagonal architecture, allowing the
//! core to be independent of specific external implementations like the
//! analysis model, the speech APIs, or the snapshot file on disk.

use crate::domain::{SessionSnapshot, SpeechAnalysis};
use async_trait::async_trait;

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// A generic error type for all port operations.
/// This abstracts away the specific errors from external services
/// (e.g., network, filesystem).
#[derive(Debug, thiserror::Error)]
pub enum PortError {
    #[error("Item not found: {0}")]
    NotFound(String),
    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// Service Ports (Traits)
//=========================================================================================

#[async_trait]
pub trait AnalysisService: Send + Sync {
    /// Evaluates one transcript against the coaching rules and returns the
    /// model's structured verdict. Any transport failure or non-conforming
    /// payload is an error; callers decide how to recover.
    async fn analyze_transcript(&self, transcript: &str) -> PortResult<SpeechAnalysis>;
}

#[async_trait]
pub trait SpeechToTextService: Send + Sync {
    /// Transcribes a slice of audio data into text.
    async fn transcribe_audio(&self, audio_data: &[u8]) -> PortResult<String>;
}

#[async_trait]
pub trait TextToSpeechService: Send + Sync {
    /// Generates audio data from a string of text.
    async fn generate_audio(&self, text: &str) -> PortResult<Vec<u8>>;
}

#[async_trait]
pub trait SnapshotStore: Send + Sync {
    /// Loads the persisted session snapshot. `Ok(None)` means no snapshot
    /// has been stored yet; an error means the stored payload is unreadable.
    async fn load(&self) -> PortResult<Option<SessionSnapshot>>;

    /// Persists the full snapshot, overwriting whatever was stored before.
    async fn save(&self, snapshot: &SessionSnapshot) -> PortResult<()>;
}
