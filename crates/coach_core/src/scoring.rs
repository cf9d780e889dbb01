//! crates/coach_core/src/scoring.rs
//!
//! The scoring and feedback policy: the rule set that turns one analysis
//! result into a point delta, an optional mistake-journal entry, a short
//! feedback banner for the UI, and the reply the coach speaks aloud.

use crate::domain::{AnalysisStatus, Mistake, SpeechAnalysis};

/// Points a fresh session starts with.
pub const INITIAL_POINTS: i64 = 1000;
/// Points gained for a correct utterance.
pub const POINT_GAIN: i64 = 10;
/// Points lost for a mistake or a wrong-language utterance.
pub const POINT_LOSS: i64 = 10;

/// The outcome of applying the scoring policy to one analysis result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verdict {
    /// Signed point change. Positive for correct utterances.
    pub points_delta: i64,
    /// The journal entry to append, if the utterance was penalized.
    pub mistake: Option<Mistake>,
    /// Short UI feedback text, e.g. "+10 Perfect English!".
    pub banner: String,
    /// What the coach says back. Always the model's conversational reply,
    /// regardless of status.
    pub reply: String,
}

/// Applies the scoring rules to one analysis result.
///
/// Pure with respect to its inputs except for the id/timestamp generation
/// inside [`Mistake::record`].
pub fn apply_analysis(analysis: &SpeechAnalysis, transcript: &str) -> Verdict {
    match analysis.status {
        AnalysisStatus::Correct => Verdict {
            points_delta: POINT_GAIN,
            mistake: None,
            banner: format!("+{POINT_GAIN} Perfect English!"),
            reply: analysis.reply.clone(),
        },
        status => {
            let corrected = if analysis.correction.trim().is_empty() {
                transcript.to_string()
            } else {
                analysis.correction.clone()
            };
            let reason = if analysis.feedback.trim().is_empty() {
                default_reason(status).to_string()
            } else {
                analysis.feedback.clone()
            };
            let label = match status {
                AnalysisStatus::WrongLanguage => "Try English only",
                _ => "Small mistake",
            };
            Verdict {
                points_delta: -POINT_LOSS,
                mistake: Some(Mistake::record(
                    transcript.to_string(),
                    corrected,
                    reason,
                    POINT_LOSS,
                )),
                banner: format!("-{POINT_LOSS} {label}"),
                reply: analysis.reply.clone(),
            }
        }
    }
}

fn default_reason(status: AnalysisStatus) -> &'static str {
    match status {
        AnalysisStatus::WrongLanguage => "Language detected: Bengali",
        _ => "Grammar error",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn analysis(status: AnalysisStatus, correction: &str, feedback: &str, reply: &str) -> SpeechAnalysis {
        SpeechAnalysis {
            status,
            correction: correction.to_string(),
            feedback: feedback.to_string(),
            reply: reply.to_string(),
        }
    }

    #[test]
    fn correct_utterance_gains_points_without_journal_entry() {
        let verdict = apply_analysis(
            &analysis(AnalysisStatus::Correct, "", "Nice phrasing!", "Great, tell me more."),
            "I went to the market today",
        );
        assert_eq!(verdict.points_delta, POINT_GAIN);
        assert!(verdict.mistake.is_none());
        assert_eq!(verdict.banner, "+10 Perfect English!");
        assert_eq!(verdict.reply, "Great, tell me more.");
    }

    #[test]
    fn mistake_deducts_points_and_records_entry() {
        let verdict = apply_analysis(
            &analysis(
                AnalysisStatus::Mistake,
                "I am fine",
                "Use 'am' not 'is'",
                "Got it, try again!",
            ),
            "I is fine",
        );
        assert_eq!(verdict.points_delta, -POINT_LOSS);
        assert_eq!(verdict.banner, "-10 Small mistake");
        assert_eq!(verdict.reply, "Got it, try again!");

        let mistake = verdict.mistake.expect("mistake entry");
        assert_eq!(mistake.original, "I is fine");
        assert_eq!(mistake.corrected, "I am fine");
        assert_eq!(mistake.reason, "Use 'am' not 'is'");
        assert_eq!(mistake.points_deducted, POINT_LOSS);
    }

    #[test]
    fn wrong_language_uses_english_only_banner() {
        let verdict = apply_analysis(
            &analysis(AnalysisStatus::WrongLanguage, "", "", "Let's stick to English!"),
            "ami bhalo achi",
        );
        assert_eq!(verdict.points_delta, -POINT_LOSS);
        assert_eq!(verdict.banner, "-10 Try English only");

        let mistake = verdict.mistake.expect("mistake entry");
        assert_eq!(mistake.reason, "Language detected: Bengali");
        // No correction supplied, so the original stands.
        assert_eq!(mistake.corrected, "ami bhalo achi");
    }

    #[test]
    fn blank_correction_falls_back_to_original_transcript() {
        let verdict = apply_analysis(
            &analysis(AnalysisStatus::Mistake, "   ", "Awkward phrasing", "Okay!"),
            "he go to school",
        );
        let mistake = verdict.mistake.expect("mistake entry");
        assert_eq!(mistake.corrected, "he go to school");
    }

    #[test]
    fn blank_feedback_defaults_to_grammar_error() {
        let verdict = apply_analysis(
            &analysis(AnalysisStatus::Mistake, "He goes to school", "", "Okay!"),
            "he go to school",
        );
        let mistake = verdict.mistake.expect("mistake entry");
        assert_eq!(mistake.reason, "Grammar error");
    }

    #[test]
    fn reply_is_passed_through_even_when_penalizing() {
        let verdict = apply_analysis(
            &analysis(AnalysisStatus::WrongLanguage, "", "", "What would you like to say?"),
            "kemon acho",
        );
        assert_eq!(verdict.reply, "What would you like to say?");
    }
}
