//! services/api/src/web/state.rs
//!
//! Defines the application's shared and session-specific states.

use crate::config::Config;
use biofortune_core::{
    ai_fallback::AiFallback,
    main_screen::MainScreen,
    ports::{ImageLoader, TextGenerationService},
    precheck::Precheck,
};
use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use tokio::task::JoinHandle;
use tracing::info;
use uuid::Uuid;

//=========================================================================================
// AppState (Shared Across All Connections)
//=========================================================================================

/// The shared application state, created once at startup and passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    pub main_screen: MainScreen,
    pub sessions: Arc<SessionStore>,
}

impl AppState {
    /// Wires the state from its adapters. `generator` is `None` when no
    /// credential was configured, which disables AI suggestions.
    pub fn new(
        config: &Config,
        generator: Option<Arc<dyn TextGenerationService>>,
        images: Arc<dyn ImageLoader>,
    ) -> Self {
        Self {
            main_screen: MainScreen::new(AiFallback::new(generator), images),
            sessions: Arc::new(SessionStore::new(config.session_idle_timeout)),
        }
    }
}

//=========================================================================================
// SessionState (Specific to One Browser Session)
//=========================================================================================

/// The state for a single user session. Lives until the session is ended,
/// sits idle past the store's timeout, or the process exits.
#[derive(Debug)]
pub struct SessionState {
    pub session_id: Uuid,
    pub precheck: Precheck,
}

impl SessionState {
    pub fn new(session_id: Uuid) -> Self {
        Self {
            session_id,
            precheck: Precheck::new(),
        }
    }
}

/// A shared handle to one session, handed to handlers by the session middleware.
pub type SessionHandle = Arc<Mutex<SessionState>>;

struct SessionEntry {
    handle: SessionHandle,
    last_seen: DateTime<Utc>,
}

/// In-memory registry of live sessions.
///
/// A session that goes unused for longer than the idle timeout is dropped,
/// either lazily on lookup or by the periodic sweep.
pub struct SessionStore {
    sessions: RwLock<HashMap<Uuid, SessionEntry>>,
    idle_timeout: Duration,
}

impl SessionStore {
    pub fn new(idle_timeout: Duration) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            idle_timeout,
        }
    }

    /// Starts a new session and returns its id. Expired sessions are pruned first.
    pub async fn create(&self) -> Uuid {
        let now = Utc::now();
        self.prune_expired(now).await;

        let session_id = Uuid::new_v4();
        let entry = SessionEntry {
            handle: Arc::new(Mutex::new(SessionState::new(session_id))),
            last_seen: now,
        };
        self.sessions.write().await.insert(session_id, entry);
        info!("Session {} started.", session_id);
        session_id
    }

    /// Looks up a live session and marks it as used.
    pub async fn get(&self, session_id: Uuid) -> Option<SessionHandle> {
        self.get_at(session_id, Utc::now()).await
    }

    async fn get_at(&self, session_id: Uuid, now: DateTime<Utc>) -> Option<SessionHandle> {
        let mut sessions = self.sessions.write().await;
        let expired = now - sessions.get(&session_id)?.last_seen > self.idle_timeout;
        if expired {
            sessions.remove(&session_id);
            info!("Session {} expired.", session_id);
            return None;
        }
        let entry = sessions.get_mut(&session_id)?;
        entry.last_seen = now;
        Some(entry.handle.clone())
    }

    /// Ends a session, discarding its state. Returns whether it existed.
    pub async fn end(&self, session_id: Uuid) -> bool {
        let removed = self.sessions.write().await.remove(&session_id).is_some();
        if removed {
            info!("Session {} ended.", session_id);
        }
        removed
    }

    /// Drops every session idle for longer than the timeout. Returns how many were dropped.
    pub async fn prune_expired(&self, now: DateTime<Utc>) -> usize {
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, entry| now - entry.last_seen <= self.idle_timeout);
        before - sessions.len()
    }

    /// Spawns the background sweep that prunes idle sessions every `period`.
    pub fn spawn_sweeper(self: &Arc<Self>, period: std::time::Duration) -> JoinHandle<()> {
        let store = Arc::clone(self);
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            loop {
                interval.tick().await;
                let pruned = store.prune_expired(Utc::now()).await;
                if pruned > 0 {
                    info!("Pruned {} idle session(s).", pruned);
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> SessionStore {
        SessionStore::new(Duration::minutes(30))
    }

    #[tokio::test]
    async fn sessions_are_created_fetched_and_ended() {
        let store = store();
        let id = store.create().await;

        let handle = store.get(id).await.expect("session should exist");
        assert_eq!(handle.lock().await.session_id, id);
        assert!(!handle.lock().await.precheck.is_entered());

        assert!(store.end(id).await);
        assert!(store.get(id).await.is_none());
        assert!(!store.end(id).await);
    }

    #[tokio::test]
    async fn sessions_are_independent() {
        let store = store();
        let a = store.create().await;
        let b = store.create().await;

        store.get(a).await.unwrap().lock().await.precheck.skip();

        assert!(store.get(a).await.unwrap().lock().await.precheck.is_entered());
        assert!(!store.get(b).await.unwrap().lock().await.precheck.is_entered());
    }

    #[tokio::test]
    async fn idle_sessions_are_pruned() {
        let store = store();
        let idle = store.create().await;
        let start = Utc::now();

        assert_eq!(store.prune_expired(start + Duration::minutes(10)).await, 0);
        assert_eq!(store.prune_expired(start + Duration::minutes(31)).await, 1);
        assert!(store.get(idle).await.is_none());
    }

    #[tokio::test]
    async fn use_keeps_a_session_alive() {
        let store = store();
        let id = store.create().await;
        let start = Utc::now();

        assert!(store.get_at(id, start + Duration::minutes(20)).await.is_some());
        assert_eq!(store.prune_expired(start + Duration::minutes(40)).await, 0);
        assert!(store.get_at(id, start + Duration::minutes(49)).await.is_some());
        assert!(store.get_at(id, start + Duration::minutes(80)).await.is_none());
    }

    #[tokio::test]
    async fn creating_a_session_drops_expired_ones() {
        let store = SessionStore::new(Duration::zero());
        let stale = store.create().await;
        tokio::time::sleep(std::time::Duration::from_millis(20)).await;

        let fresh = store.create().await;

        assert_eq!(store.prune_expired(Utc::now() - Duration::minutes(1)).await, 0);
        assert!(store.sessions.read().await.contains_key(&fresh));
        assert!(!store.sessions.read().await.contains_key(&stale));
    }
}
