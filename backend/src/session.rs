//! Per-user in-memory session state
//!
//! Holds what the client would otherwise keep between screens: today's
//! planner, the favorite set and the history feed. Each piece is loaded from
//! the database on first use and then updated in place.
//!
//! Mutation only happens inside the closures passed to [`SessionStore`], which
//! are synchronous, so the lock is never held across an await.
//!
//! Everything here can be reloaded from the database except an unconfirmed
//! draft, so sessions left idle past the configured timeout are swept.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use foodbuddy_shared::{DailyPlanner, FavoriteSet, HistoryItem};
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, info};
use uuid::Uuid;

#[derive(Debug, Default, Clone)]
pub struct UserSession {
    pub planner: Option<DailyPlanner>,
    pub favorites: Option<FavoriteSet>,
    pub history: Option<Vec<HistoryItem>>,
}

#[derive(Debug)]
struct Entry {
    session: UserSession,
    last_activity: Instant,
}

impl Default for Entry {
    fn default() -> Self {
        Self {
            session: UserSession::default(),
            last_activity: Instant::now(),
        }
    }
}

#[derive(Clone, Default)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<Uuid, Entry>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `f` against the user's session, creating an empty one if needed.
    /// Counts as activity for idle eviction.
    pub async fn with_session<R>(&self, user_id: Uuid, f: impl FnOnce(&mut UserSession) -> R) -> R {
        let mut sessions = self.sessions.write().await;
        let entry = sessions.entry(user_id).or_default();
        entry.last_activity = Instant::now();
        f(&mut entry.session)
    }

    /// Read-only access; `None` when the user has no session yet
    pub async fn inspect<R>(&self, user_id: Uuid, f: impl FnOnce(Option<&UserSession>) -> R) -> R {
        let sessions = self.sessions.read().await;
        f(sessions.get(&user_id).map(|entry| &entry.session))
    }

    /// Drop all state for a user (sign-out, account deletion)
    pub async fn remove(&self, user_id: Uuid) -> bool {
        let removed = self.sessions.write().await.remove(&user_id).is_some();
        if removed {
            debug!(%user_id, "Session state dropped");
        }
        removed
    }

    /// Drop sessions untouched for at least `idle`. Returns how many went.
    pub async fn evict_idle(&self, idle: Duration) -> usize {
        let now = Instant::now();
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, entry| now.duration_since(entry.last_activity) < idle);
        let evicted = before - sessions.len();
        if evicted > 0 {
            info!(evicted, remaining = sessions.len(), "Idle sessions evicted");
        }
        evicted
    }

    /// Sweep idle sessions every `every` until the runtime shuts down
    pub fn spawn_sweeper(&self, idle: Duration, every: Duration) -> JoinHandle<()> {
        let store = self.clone();
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(every);
            loop {
                interval.tick().await;
                debug!(idle_secs = idle.as_secs(), "Running idle session sweep");
                store.evict_idle(idle).await;
            }
        })
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}
