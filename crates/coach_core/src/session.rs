//! crates/coach_core/src/session.rs
//!
//! The session state store: owns the in-memory snapshot, applies state
//! transitions, and mirrors every accepted mutation to the snapshot store
//! as a full overwrite.

use crate::domain::{Mistake, SessionSnapshot, User};
use crate::ports::{PortResult, SnapshotStore};
use crate::scoring::Verdict;
use std::sync::Arc;
use tracing::warn;

/// Single-writer session store. Callers are expected to serialize access
/// (the service keeps it behind an async mutex), so each mutator
/// read-modifies-writes the latest snapshot atomically.
pub struct SessionStore {
    snapshot: SessionSnapshot,
    persistence: Arc<dyn SnapshotStore>,
}

impl SessionStore {
    /// Rehydrates the store from persisted state. A missing or unreadable
    /// snapshot falls back to the default; startup never fails here.
    pub async fn load_or_default(persistence: Arc<dyn SnapshotStore>) -> Self {
        let snapshot = match persistence.load().await {
            Ok(Some(snapshot)) => snapshot,
            Ok(None) => SessionSnapshot::default(),
            Err(e) => {
                warn!("Stored session snapshot is unreadable, starting fresh: {e}");
                SessionSnapshot::default()
            }
        };
        Self {
            snapshot,
            persistence,
        }
    }

    pub fn snapshot(&self) -> &SessionSnapshot {
        &self.snapshot
    }

    /// Signs the user in. Keeps `is_authenticated` in lockstep with the
    /// presence of a user.
    pub async fn login(&mut self, user: User) -> PortResult<()> {
        self.snapshot.user = Some(user);
        self.snapshot.is_authenticated = true;
        self.persist().await
    }

    /// Signs the user out. Points and the mistake journal are deliberately
    /// kept: there is exactly one implicit session in this single-user core.
    pub async fn logout(&mut self) -> PortResult<()> {
        self.snapshot.user = None;
        self.snapshot.is_authenticated = false;
        self.persist().await
    }

    /// Applies a signed point delta. No floor: points may go negative.
    pub async fn adjust_points(&mut self, delta: i64) -> PortResult<()> {
        self.snapshot.points += delta;
        self.persist().await
    }

    /// Appends one entry to the mistake journal. Entries are never edited
    /// or removed afterwards.
    pub async fn append_mistake(&mut self, mistake: Mistake) -> PortResult<()> {
        self.snapshot.mistakes.push(mistake);
        self.persist().await
    }

    /// Applies a scoring verdict: the point delta, then the journal entry
    /// when the utterance was penalized.
    pub async fn apply_verdict(&mut self, verdict: &Verdict) -> PortResult<()> {
        self.adjust_points(verdict.points_delta).await?;
        if let Some(mistake) = &verdict.mistake {
            self.append_mistake(mistake.clone()).await?;
        }
        Ok(())
    }

    /// Full overwrite of the persisted snapshot. The in-memory state is
    /// already updated when this runs; a failed write leaves the session
    /// usable and only costs durability.
    async fn persist(&self) -> PortResult<()> {
        self.persistence.save(&self.snapshot).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::SNAPSHOT_VERSION;
    use crate::ports::PortError;
    use crate::scoring::{self, INITIAL_POINTS};
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// In-memory stand-in for the snapshot file.
    #[derive(Default)]
    struct MemoryStore {
        stored: Mutex<Option<SessionSnapshot>>,
        corrupt: bool,
    }

    impl MemoryStore {
        fn corrupt() -> Self {
            Self {
                stored: Mutex::new(None),
                corrupt: true,
            }
        }
    }

    #[async_trait]
    impl SnapshotStore for MemoryStore {
        async fn load(&self) -> PortResult<Option<SessionSnapshot>> {
            if self.corrupt {
                return Err(PortError::Unexpected("corrupt snapshot".to_string()));
            }
            Ok(self.stored.lock().unwrap().clone())
        }

        async fn save(&self, snapshot: &SessionSnapshot) -> PortResult<()> {
            *self.stored.lock().unwrap() = Some(snapshot.clone());
            Ok(())
        }
    }

    fn demo_user() -> User {
        User {
            name: "Jordan Lee".to_string(),
            email: "jordan.lee@example.com".to_string(),
            photo: None,
        }
    }

    #[tokio::test]
    async fn starts_from_default_when_nothing_is_stored() {
        let store = SessionStore::load_or_default(Arc::new(MemoryStore::default())).await;
        assert_eq!(store.snapshot().points, INITIAL_POINTS);
        assert!(!store.snapshot().is_authenticated);
    }

    #[tokio::test]
    async fn starts_from_default_when_stored_snapshot_is_unreadable() {
        let store = SessionStore::load_or_default(Arc::new(MemoryStore::corrupt())).await;
        assert_eq!(*store.snapshot(), SessionSnapshot::default());
    }

    #[tokio::test]
    async fn every_mutation_is_mirrored_to_the_store() {
        let persistence = Arc::new(MemoryStore::default());
        let mut store = SessionStore::load_or_default(persistence.clone()).await;

        store.login(demo_user()).await.unwrap();
        store.adjust_points(-10).await.unwrap();
        store
            .append_mistake(Mistake::record(
                "I is fine".to_string(),
                "I am fine".to_string(),
                "Use 'am' not 'is'".to_string(),
                10,
            ))
            .await
            .unwrap();

        let persisted = persistence.stored.lock().unwrap().clone().unwrap();
        assert_eq!(persisted, *store.snapshot());
        assert_eq!(persisted.points, INITIAL_POINTS - 10);
        assert_eq!(persisted.mistakes.len(), 1);
        assert_eq!(persisted.version, SNAPSHOT_VERSION);
    }

    #[tokio::test]
    async fn rehydration_round_trips_the_snapshot() {
        let persistence = Arc::new(MemoryStore::default());
        {
            let mut store = SessionStore::load_or_default(persistence.clone()).await;
            store.login(demo_user()).await.unwrap();
            store.adjust_points(-30).await.unwrap();
            store
                .append_mistake(Mistake::record(
                    "he go".to_string(),
                    "he goes".to_string(),
                    "Grammar error".to_string(),
                    10,
                ))
                .await
                .unwrap();
        }

        let restored = SessionStore::load_or_default(persistence.clone()).await;
        assert_eq!(restored.snapshot().points, INITIAL_POINTS - 30);
        assert_eq!(restored.snapshot().mistakes.len(), 1);
        assert_eq!(restored.snapshot().mistakes[0].original, "he go");
        assert_eq!(restored.snapshot().user, Some(demo_user()));
        assert!(restored.snapshot().is_authenticated);
    }

    #[tokio::test]
    async fn login_and_logout_keep_the_auth_flag_in_sync() {
        let mut store = SessionStore::load_or_default(Arc::new(MemoryStore::default())).await;

        store.login(demo_user()).await.unwrap();
        assert!(store.snapshot().is_authenticated);
        assert!(store.snapshot().user.is_some());

        store.logout().await.unwrap();
        assert!(!store.snapshot().is_authenticated);
        assert!(store.snapshot().user.is_none());
    }

    #[tokio::test]
    async fn points_may_go_negative() {
        let mut store = SessionStore::load_or_default(Arc::new(MemoryStore::default())).await;
        store.adjust_points(-(INITIAL_POINTS + 5)).await.unwrap();
        assert_eq!(store.snapshot().points, -5);
    }

    #[tokio::test]
    async fn apply_verdict_records_both_points_and_journal_entry() {
        let mut store = SessionStore::load_or_default(Arc::new(MemoryStore::default())).await;
        let analysis = crate::domain::SpeechAnalysis {
            status: crate::domain::AnalysisStatus::Mistake,
            correction: "I am fine".to_string(),
            feedback: "Use 'am' not 'is'".to_string(),
            reply: "Got it, try again!".to_string(),
        };
        let verdict = scoring::apply_analysis(&analysis, "I is fine");

        store.apply_verdict(&verdict).await.unwrap();
        assert_eq!(store.snapshot().points, INITIAL_POINTS - 10);
        assert_eq!(store.snapshot().mistakes.len(), 1);
    }
}
