//! crates/coach_core/src/analysis.rs
//!
//! The analysis client: a thin wrapper over the `AnalysisService` port that
//! never raises to its caller. Any transport error or malformed payload is
//! replaced by a fixed fallback verdict so a system-side failure is never
//! scored against the user.

use crate::domain::{AnalysisStatus, SpeechAnalysis};
use crate::ports::AnalysisService;
use std::sync::Arc;
use tracing::warn;

/// Wraps an [`AnalysisService`] with the fallback contract of the practice
/// loop: `evaluate` always produces a usable verdict.
#[derive(Clone)]
pub struct AnalysisClient {
    service: Arc<dyn AnalysisService>,
}

impl AnalysisClient {
    pub fn new(service: Arc<dyn AnalysisService>) -> Self {
        Self { service }
    }

    /// The fixed verdict used whenever the external call fails. Status is
    /// `correct` on purpose: an error on our side must not cost points or
    /// record a mistake.
    pub fn fallback() -> SpeechAnalysis {
        SpeechAnalysis {
            status: AnalysisStatus::Correct,
            correction: String::new(),
            feedback: "Sorry, I missed that. Could you say it again?".to_string(),
            reply: "I had a small technical hiccup. What were you saying?".to_string(),
        }
    }

    /// Evaluates one transcript. Never returns an error.
    ///
    /// Blank transcripts skip the remote call entirely and yield the
    /// fallback verdict, so callers handle empty capture the same way they
    /// handle a transport failure.
    pub async fn evaluate(&self, transcript: &str) -> SpeechAnalysis {
        if transcript.trim().is_empty() {
            return Self::fallback();
        }
        match self.service.analyze_transcript(transcript).await {
            Ok(analysis) => analysis,
            Err(e) => {
                warn!("Analysis call failed, using fallback verdict: {e}");
                Self::fallback()
            }
        }
    }
}
