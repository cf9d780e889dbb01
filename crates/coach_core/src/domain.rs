//! crates/coach_core/src/domain.rs
//!
//! Defines the pure, core data structures for the speaking-coach session.
//! These structs are independent of any storage backend or transport; the
//! serde derives exist because the session snapshot is persisted as one
//! JSON blob and the analysis verdict crosses a JSON wire contract.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Version tag carried by every persisted snapshot. A stored snapshot with
/// any other version is treated like a corrupt payload and replaced by the
/// default snapshot on rehydration.
pub const SNAPSHOT_VERSION: u32 = 1;

/// The signed-in user. Created by the (mocked) login, destroyed on logout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub name: String,
    pub email: String,
    pub photo: Option<String>,
}

/// A single recorded language mistake. Immutable once created; appended to
/// the journal, never edited or removed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Mistake {
    /// Opaque, time-derived identifier. Unique within the same millisecond.
    pub id: String,
    /// The transcript exactly as the user said it.
    pub original: String,
    /// The corrected sentence. Never blank: falls back to `original` when
    /// the analysis supplied no correction.
    pub corrected: String,
    /// Why points were deducted.
    pub reason: String,
    pub points_deducted: i64,
    /// Creation time, epoch milliseconds.
    pub timestamp: i64,
}

impl Mistake {
    /// Records a new mistake at the current time.
    pub fn record(
        original: String,
        corrected: String,
        reason: String,
        points_deducted: i64,
    ) -> Self {
        let timestamp = Utc::now().timestamp_millis();
        Self {
            id: format!("{}-{}", timestamp, Uuid::new_v4().simple()),
            original,
            corrected,
            reason,
            points_deducted,
            timestamp,
        }
    }
}

/// The verdict categories the analysis model may return for one utterance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisStatus {
    Correct,
    Mistake,
    WrongLanguage,
}

/// The structured verdict returned by the external language model for one
/// transcript. A value object; never persisted. All four fields are
/// required by the wire contract, so none of them is optional here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpeechAnalysis {
    pub status: AnalysisStatus,
    pub correction: String,
    pub feedback: String,
    pub reply: String,
}

/// The full serializable session state, persisted as one unit after every
/// accepted mutation. Field names match the persisted JSON shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    pub version: u32,
    /// May go negative; no floor is enforced.
    pub points: i64,
    /// Insertion order is chronological order.
    pub mistakes: Vec<Mistake>,
    pub user: Option<User>,
    pub is_authenticated: bool,
}

impl Default for SessionSnapshot {
    fn default() -> Self {
        Self {
            version: SNAPSHOT_VERSION,
            points: crate::scoring::INITIAL_POINTS,
            mistakes: Vec::new(),
            user: None,
            is_authenticated: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_snapshot_shape() {
        let snap = SessionSnapshot::default();
        assert_eq!(snap.version, SNAPSHOT_VERSION);
        assert_eq!(snap.points, 1000);
        assert!(snap.mistakes.is_empty());
        assert!(snap.user.is_none());
        assert!(!snap.is_authenticated);
    }

    #[test]
    fn snapshot_serde_round_trip() {
        let mut snap = SessionSnapshot::default();
        snap.points = -5;
        snap.user = Some(User {
            name: "Jordan Lee".to_string(),
            email: "jordan.lee@example.com".to_string(),
            photo: None,
        });
        snap.is_authenticated = true;
        snap.mistakes.push(Mistake::record(
            "I is fine".to_string(),
            "I am fine".to_string(),
            "Use 'am' not 'is'".to_string(),
            10,
        ));

        let json = serde_json::to_string(&snap).unwrap();
        let restored: SessionSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, snap);
    }

    #[test]
    fn persisted_field_names_are_camel_case() {
        let mut snap = SessionSnapshot::default();
        snap.mistakes.push(Mistake::record(
            "a".to_string(),
            "b".to_string(),
            "c".to_string(),
            10,
        ));
        let json = serde_json::to_string(&snap).unwrap();
        assert!(json.contains("\"isAuthenticated\""));
        assert!(json.contains("\"pointsDeducted\""));
        assert!(json.contains("\"timestamp\""));
    }

    #[test]
    fn snapshot_without_version_is_rejected() {
        // Pre-versioning payloads must fail to parse so rehydration falls
        // back to the default snapshot.
        let legacy = r#"{"points":990,"mistakes":[],"user":null,"isAuthenticated":true}"#;
        assert!(serde_json::from_str::<SessionSnapshot>(legacy).is_err());
    }

    #[test]
    fn analysis_status_wire_names() {
        assert_eq!(
            serde_json::to_string(&AnalysisStatus::WrongLanguage).unwrap(),
            "\"wrong_language\""
        );
        let status: AnalysisStatus = serde_json::from_str("\"correct\"").unwrap();
        assert_eq!(status, AnalysisStatus::Correct);
    }

    #[test]
    fn mistake_ids_are_unique() {
        let a = Mistake::record("x".into(), "y".into(), "z".into(), 10);
        let b = Mistake::record("x".into(), "y".into(), "z".into(), 10);
        assert_ne!(a.id, b.id);
    }
}
