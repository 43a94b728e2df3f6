//! In-memory, per-browser-session chat state.
//!
//! Each session sits behind its own `tokio::sync::Mutex`, held for the whole
//! of a submission, so one session processes one request at a time while
//! distinct sessions proceed independently. Values are `Arc`-cloned out of
//! the map so no `DashMap` `Ref` is held across an `.await`.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use dashmap::DashMap;
use tokio::sync::{Mutex, OwnedMutexGuard};
use tracing::debug;
use uuid::Uuid;

use vasculargpt_types::chat::ChatSession;

/// Shared handle to one session's state.
pub type SharedSession = Arc<Mutex<ChatSession>>;

/// Concurrent registry of live sessions keyed by session ID.
#[derive(Clone)]
pub struct SessionStore {
    sessions: Arc<DashMap<Uuid, SharedSession>>,
    ttl: Duration,
}

impl SessionStore {
    /// Create an empty store; sessions idle longer than `ttl` are evictable.
    pub fn new(ttl: Duration) -> Self {
        Self {
            sessions: Arc::new(DashMap::new()),
            ttl,
        }
    }

    /// Register a fresh, empty session and return its ID.
    pub fn create(&self) -> Uuid {
        let id = Uuid::now_v7();
        self.sessions
            .insert(id, Arc::new(Mutex::new(ChatSession::new(id))));
        debug!(session_id = %id, "Created session");
        id
    }

    /// Look up a session, initializing it empty the first time `id` is seen.
    pub fn get_or_init(&self, id: Uuid) -> SharedSession {
        self.sessions
            .entry(id)
            .or_insert_with(|| {
                debug!(session_id = %id, "Initialized session on first use");
                Arc::new(Mutex::new(ChatSession::new(id)))
            })
            .value()
            .clone()
    }

    /// Lock a session for use, initializing it on first use.
    ///
    /// The returned guard is always for the session currently registered
    /// under `id`: if a sweep evicted the entry between lookup and lock,
    /// the lookup is retried. Locking counts as activity.
    pub async fn acquire(&self, id: Uuid) -> OwnedMutexGuard<ChatSession> {
        loop {
            let session = self.get_or_init(id);
            let mut guard = Arc::clone(&session).lock_owned().await;

            let registered = self
                .sessions
                .get(&id)
                .is_some_and(|entry| Arc::ptr_eq(entry.value(), &session));
            if registered {
                guard.last_active_at = Utc::now();
                return guard;
            }
            debug!(session_id = %id, "Session evicted while waiting for lock; retrying");
        }
    }

    /// Look up a session without creating it.
    pub fn get(&self, id: &Uuid) -> Option<SharedSession> {
        self.sessions.get(id).map(|entry| entry.value().clone())
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// Drop sessions whose last activity is older than the TTL.
    ///
    /// Sessions currently processing a submission (mutex held) are kept.
    /// Returns the number of sessions removed.
    pub fn evict_idle(&self) -> usize {
        let Some(cutoff) = chrono::Duration::from_std(self.ttl)
            .ok()
            .and_then(|ttl| Utc::now().checked_sub_signed(ttl))
        else {
            return 0;
        };
        let before = self.sessions.len();

        self.sessions.retain(|_, session| match session.try_lock() {
            Ok(guard) => guard.last_active_at >= cutoff,
            Err(_) => true,
        });

        let removed = before.saturating_sub(self.sessions.len());
        if removed > 0 {
            debug!(removed, "Evicted idle sessions");
        }
        removed
    }

    /// Run [`SessionStore::evict_idle`] every `every` on the Tokio runtime.
    pub fn spawn_eviction(&self, every: Duration) -> tokio::task::JoinHandle<()> {
        let store = self.clone();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(every);
            ticker.tick().await;
            loop {
                ticker.tick().await;
                store.evict_idle();
            }
        })
    }
}
