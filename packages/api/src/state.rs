// ABOUTME: Shared application state for the HTTP layer
// ABOUTME: Per-user conversation sessions plus the completion and auth providers

use std::{collections::HashMap, sync::Arc};

use chrono::{DateTime, Duration, Utc};
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info};

use intake_ai::CompletionClient;
use intake_auth::{AuthProvider, DEFAULT_COOKIE_NAME};
use intake_core::ConversationSession;

/// A session behind its busy flag. Holding the lock means a turn is in flight.
pub type SessionHandle = Arc<Mutex<ConversationSession>>;

struct SessionEntry {
    handle: SessionHandle,
    last_seen: DateTime<Utc>,
}

/// In-memory conversation sessions keyed by user id
#[derive(Clone, Default)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<String, SessionEntry>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Session for `user_id`, opened with the greeting on first use
    pub async fn get_or_create(&self, user_id: &str) -> SessionHandle {
        let mut sessions = self.sessions.write().await;
        let entry = sessions.entry(user_id.to_string()).or_insert_with(|| {
            debug!(user_id = %user_id, "Opening new conversation session");
            SessionEntry {
                handle: Arc::new(Mutex::new(ConversationSession::new())),
                last_seen: Utc::now(),
            }
        });
        entry.last_seen = Utc::now();
        entry.handle.clone()
    }

    /// Whether `handle` is still the session stored for `user_id`.
    /// False once the session was reset or evicted.
    pub async fn is_current(&self, user_id: &str, handle: &SessionHandle) -> bool {
        self.sessions
            .read()
            .await
            .get(user_id)
            .is_some_and(|entry| Arc::ptr_eq(&entry.handle, handle))
    }

    /// Drop sessions not touched within `max_idle`. Sessions with a turn in
    /// flight are kept. Returns the evicted user ids.
    pub async fn evict_idle(&self, max_idle: Duration) -> Vec<String> {
        let cutoff = Utc::now() - max_idle;
        let mut evicted = Vec::new();

        let mut sessions = self.sessions.write().await;
        sessions.retain(|user_id, entry| {
            let idle = entry.last_seen <= cutoff && entry.handle.try_lock().is_ok();
            if idle {
                evicted.push(user_id.clone());
            }
            !idle
        });
        drop(sessions);

        if !evicted.is_empty() {
            info!(count = evicted.len(), "Evicted idle conversation sessions");
        }
        evicted
    }

    /// Drop the session for `user_id`. Returns whether one existed.
    pub async fn reset(&self, user_id: &str) -> bool {
        self.sessions.write().await.remove(user_id).is_some()
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }
}

/// Session cookie settings
#[derive(Debug, Clone)]
pub struct CookieSettings {
    pub name: String,
    pub secure: bool,
}

impl Default for CookieSettings {
    fn default() -> Self {
        Self {
            name: DEFAULT_COOKIE_NAME.to_string(),
            secure: false,
        }
    }
}

#[derive(Clone)]
pub struct AppState {
    pub sessions: SessionStore,
    pub completion: Arc<dyn CompletionClient>,
    pub auth: Arc<dyn AuthProvider>,
    pub cookie: CookieSettings,
}

impl AppState {
    pub fn new(
        completion: Arc<dyn CompletionClient>,
        auth: Arc<dyn AuthProvider>,
        cookie: CookieSettings,
    ) -> Self {
        Self {
            sessions: SessionStore::new(),
            completion,
            auth,
            cookie,
        }
    }
}
