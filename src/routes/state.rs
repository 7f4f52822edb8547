use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::RwLock;
use uuid::Uuid;

use crate::services::{quiz::QuizSession, CatalogProvider, Clock, RandomSource};

/// Idle time after which an abandoned quiz is dropped
pub const DEFAULT_QUIZ_IDLE_TTL: Duration = Duration::from_secs(30 * 60);

/// Upper bound on quizzes kept in memory at once
pub const DEFAULT_MAX_QUIZZES: usize = 10_000;

/// Shared application state
///
/// The collaborators the engine needs are injected here so tests can swap in
/// a fixed catalog, a seeded random source and a fixed clock.
pub struct AppState {
    pub catalog: Arc<dyn CatalogProvider>,
    pub random: Arc<dyn RandomSource>,
    pub clock: Arc<dyn Clock>,
    /// In-progress quizzes keyed by session id
    pub quizzes: QuizStore,
}

impl AppState {
    pub fn new(
        catalog: Arc<dyn CatalogProvider>,
        random: Arc<dyn RandomSource>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            catalog,
            random,
            clock,
            quizzes: QuizStore::new(DEFAULT_QUIZ_IDLE_TTL, DEFAULT_MAX_QUIZZES),
        }
    }

    pub fn with_quiz_store(mut self, quizzes: QuizStore) -> Self {
        self.quizzes = quizzes;
        self
    }
}

struct QuizEntry {
    session: QuizSession,
    touched: Instant,
}

/// In-memory quiz sessions with idle expiry and a size cap.
///
/// Expired sessions are swept whenever a new quiz starts and are treated as
/// unknown when looked up. When the store is full the least recently touched
/// session makes room for the new one.
pub struct QuizStore {
    sessions: RwLock<HashMap<Uuid, QuizEntry>>,
    idle_ttl: Duration,
    capacity: usize,
}

impl QuizStore {
    pub fn new(idle_ttl: Duration, capacity: usize) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            idle_ttl,
            capacity: capacity.max(1),
        }
    }

    /// Stores a new session and returns its id
    pub async fn insert(&self, session: QuizSession) -> Uuid {
        self.insert_at(session, Instant::now()).await
    }

    /// Runs `f` on a live session, refreshing its idle timer
    pub async fn with_session<T>(
        &self,
        id: Uuid,
        f: impl FnOnce(&mut QuizSession) -> T,
    ) -> Option<T> {
        self.with_session_at(id, Instant::now(), f).await
    }

    /// Snapshot of a live session
    pub async fn get(&self, id: Uuid) -> Option<QuizSession> {
        self.with_session(id, |session| session.clone()).await
    }

    /// Removes a session, `false` if it was unknown
    pub async fn remove(&self, id: Uuid) -> bool {
        self.sessions.write().await.remove(&id).is_some()
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    async fn insert_at(&self, session: QuizSession, now: Instant) -> Uuid {
        let mut sessions = self.sessions.write().await;

        let before = sessions.len();
        sessions.retain(|_, entry| !self.is_expired(entry, now));
        let expired = before - sessions.len();
        if expired > 0 {
            tracing::debug!(expired, "Evicted idle quizzes");
        }

        if sessions.len() >= self.capacity {
            let oldest = sessions
                .iter()
                .min_by_key(|(_, entry)| entry.touched)
                .map(|(id, _)| *id);
            if let Some(oldest) = oldest {
                sessions.remove(&oldest);
                tracing::warn!(
                    quiz_id = %oldest,
                    capacity = self.capacity,
                    "Quiz store full, evicted oldest quiz"
                );
            }
        }

        let id = Uuid::new_v4();
        sessions.insert(id, QuizEntry { session, touched: now });
        id
    }

    async fn with_session_at<T>(
        &self,
        id: Uuid,
        now: Instant,
        f: impl FnOnce(&mut QuizSession) -> T,
    ) -> Option<T> {
        let mut sessions = self.sessions.write().await;

        let entry = sessions.get_mut(&id)?;
        if self.is_expired(entry, now) {
            sessions.remove(&id);
            return None;
        }

        entry.touched = now;
        Some(f(&mut entry.session))
    }

    fn is_expired(&self, entry: &QuizEntry, now: Instant) -> bool {
        now.saturating_duration_since(entry.touched) > self.idle_ttl
    }
}
