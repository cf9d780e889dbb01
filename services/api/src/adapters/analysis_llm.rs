//! services/api/src/adapters/analysis_llm.rs
//!
//! This module contains the adapter for the speech-analysis LLM.
//! It implements the `AnalysisService` port from the `core` crate.

const SYSTEM_INSTRUCTIONS: &str = r#"You are a friendly and premium English speaking coach.
Evaluate the user's transcribed utterance.

CRITICAL RULES:
1. Detect the language. If the user speaks in Bengali (even partially), status must be 'wrong_language'.
2. If the user speaks in English, check for grammar, pronunciation hints (from text context), and natural phrasing.
3. If it is perfect English, status is 'correct'.
4. If there are any mistakes, status is 'mistake'. Provide the corrected sentence and a short friendly feedback.
5. Always provide a short, conversational reply to what the user said to keep the conversation going.

Respond with ONLY a JSON object, no prose and no markdown, with exactly these fields in this order:
{
  "status": "'correct', 'mistake', or 'wrong_language'",
  "correction": "the full corrected sentence if it was a mistake, else an empty string",
  "feedback": "short feedback explaining the mistake, or encouragement",
  "reply": "a short conversational reply from the coach"
}
All four fields are required in every response."#;

use async_openai::{
    config::OpenAIConfig, error::OpenAIError, types::responses::CreateResponseArgs, Client,
};
use async_trait::async_trait;
use coach_core::domain::SpeechAnalysis;
use coach_core::ports::{AnalysisService, PortError, PortResult};
use regex::Regex;

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// An adapter that implements `AnalysisService` using an OpenAI-compatible LLM.
#[derive(Clone)]
pub struct OpenAiAnalysisAdapter {
    client: Client<OpenAIConfig>,
    model: String,
}

impl OpenAiAnalysisAdapter {
    /// Creates a new `OpenAiAnalysisAdapter`.
    pub fn new(client: Client<OpenAIConfig>, model: String) -> Self {
        Self { client, model }
    }
}

/// Parses the model's raw output into the four-field analysis contract.
/// Anything that does not conform is an error; the core client maps errors
/// to the fallback verdict.
fn parse_analysis(raw: &str) -> PortResult<SpeechAnalysis> {
    // Models occasionally wrap JSON in a markdown code fence despite the
    // instructions; strip it before parsing.
    let fence = Regex::new(r"(?s)^\s*```(?:json)?\s*(.*?)\s*```\s*$").unwrap();
    let body = match fence.captures(raw) {
        Some(caps) => caps.get(1).map(|m| m.as_str()).unwrap_or(raw),
        None => raw,
    };

    serde_json::from_str::<SpeechAnalysis>(body.trim())
        .map_err(|e| PortError::Unexpected(format!("Non-conforming analysis payload: {e}")))
}

//=========================================================================================
// `AnalysisService` Trait Implementation
//=========================================================================================

#[async_trait]
impl AnalysisService for OpenAiAnalysisAdapter {
    /// Sends one transcript to the model with the fixed coaching instruction
    /// and validates the structured verdict it returns.
    async fn analyze_transcript(&self, transcript: &str) -> PortResult<SpeechAnalysis> {
        let request = CreateResponseArgs::default()
            .model(&self.model)
            .instructions(SYSTEM_INSTRUCTIONS)
            .input(transcript.to_string())
            .max_output_tokens(300u32)
            .build()
            .map_err(|e| PortError::Unexpected(e.to_string()))?;

        let response = self
            .client
            .responses()
            .create(request)
            .await
            .map_err(|e: OpenAIError| PortError::Unexpected(e.to_string()))?;

        let raw = response.output_text().unwrap_or_default();
        parse_analysis(&raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use coach_core::domain::AnalysisStatus;

    #[test]
    fn parses_a_conforming_payload() {
        let raw = r#"{"status":"mistake","correction":"I am fine","feedback":"Use 'am' not 'is'","reply":"Got it, try again!"}"#;
        let analysis = parse_analysis(raw).unwrap();
        assert_eq!(analysis.status, AnalysisStatus::Mistake);
        assert_eq!(analysis.correction, "I am fine");
        assert_eq!(analysis.reply, "Got it, try again!");
    }

    #[test]
    fn strips_a_markdown_code_fence() {
        let raw = "```json\n{\"status\":\"correct\",\"correction\":\"\",\"feedback\":\"Nice!\",\"reply\":\"Tell me more.\"}\n```";
        let analysis = parse_analysis(raw).unwrap();
        assert_eq!(analysis.status, AnalysisStatus::Correct);
        assert_eq!(analysis.feedback, "Nice!");
    }

    #[test]
    fn missing_field_is_an_error() {
        let raw = r#"{"status":"correct","correction":"","feedback":"Nice!"}"#;
        assert!(parse_analysis(raw).is_err());
    }

    #[test]
    fn unknown_status_is_an_error() {
        let raw = r#"{"status":"excellent","correction":"","feedback":"","reply":"Hi"}"#;
        assert!(parse_analysis(raw).is_err());
    }

    #[test]
    fn plain_prose_is_an_error() {
        assert!(parse_analysis("That sounded great, keep going!").is_err());
    }
}
