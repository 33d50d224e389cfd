//! In-memory registry of live sessions.
//!
//! Sessions are keyed by a random UUID handed to the client. The store is
//! shared across request handlers; each session is only ever touched by its
//! own client, so a single mutex over the map is enough.
//!
//! A session that goes unused for longer than the store's idle TTL is
//! dropped: lazily when it is next looked up, and in bulk whenever a new
//! session is created.

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use thiserror::Error;
use uuid::Uuid;

use crate::Session;

/// Idle time after which a session is discarded, unless configured.
pub const DEFAULT_IDLE_TTL: Duration = Duration::from_secs(60 * 60);

/// Errors from session lookups.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    /// No live session has this id.
    #[error("Session not found: {0}")]
    NotFound(Uuid),
}

#[derive(Debug)]
struct Entry {
    session: Session,
    last_access: Instant,
}

/// Live sessions by id.
#[derive(Debug)]
pub struct SessionStore {
    sessions: Mutex<BTreeMap<Uuid, Entry>>,
    idle_ttl: Duration,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::with_idle_ttl(DEFAULT_IDLE_TTL)
    }
}

impl SessionStore {
    /// Creates an empty store with [`DEFAULT_IDLE_TTL`].
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty store that drops sessions idle for longer than
    /// `idle_ttl`.
    #[must_use]
    pub const fn with_idle_ttl(idle_ttl: Duration) -> Self {
        Self {
            sessions: Mutex::new(BTreeMap::new()),
            idle_ttl,
        }
    }

    /// Idle time after which sessions are dropped.
    #[must_use]
    pub const fn idle_ttl(&self) -> Duration {
        self.idle_ttl
    }

    fn lock(&self) -> MutexGuard<'_, BTreeMap<Uuid, Entry>> {
        // A panic mid-update can only leave one session half-modified;
        // the map itself stays usable.
        self.sessions.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn is_expired(&self, entry: &Entry, now: Instant) -> bool {
        now.saturating_duration_since(entry.last_access) > self.idle_ttl
    }

    /// Starts a new empty session and returns its id. Expired sessions are
    /// swept first.
    pub fn create(&self) -> Uuid {
        let id = Uuid::new_v4();
        let now = Instant::now();
        let mut sessions = self.lock();

        let before = sessions.len();
        sessions.retain(|_, entry| !self.is_expired(entry, now));
        let evicted = before - sessions.len();
        if evicted > 0 {
            log::info!("Evicted {evicted} idle session(s)");
        }

        sessions.insert(
            id,
            Entry {
                session: Session::new(),
                last_access: now,
            },
        );
        drop(sessions);

        log::info!("Started session {id}");
        id
    }

    /// Ends a session, discarding its state. Returns whether it existed.
    pub fn remove(&self, id: Uuid) -> bool {
        let removed = self.lock().remove(&id).is_some();
        if removed {
            log::info!("Ended session {id}");
        }
        removed
    }

    /// Runs `f` with exclusive access to one session and marks it as used.
    ///
    /// Keep `f` short and synchronous; the whole store is locked while it
    /// runs.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::NotFound`] if the id is unknown or the
    /// session has been idle past the TTL.
    pub fn with_session<R>(
        &self,
        id: Uuid,
        f: impl FnOnce(&mut Session) -> R,
    ) -> Result<R, SessionError> {
        let now = Instant::now();
        let mut sessions = self.lock();

        let expired = match sessions.get(&id) {
            Some(entry) => self.is_expired(entry, now),
            None => return Err(SessionError::NotFound(id)),
        };
        if expired {
            sessions.remove(&id);
            log::debug!("Session {id} expired");
            return Err(SessionError::NotFound(id));
        }

        let entry = sessions.get_mut(&id).ok_or(SessionError::NotFound(id))?;
        entry.last_access = now;
        Ok(f(&mut entry.session))
    }

    /// Number of sessions held, including any not yet swept.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Whether no sessions are held.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use carbon_tracker_footprint_models::TransportMode;

    #[test]
    fn sessions_are_isolated() {
        let store = SessionStore::new();
        let a = store.create();
        let b = store.create();

        store
            .with_session(a, |s| s.ledger.add(TransportMode::Car, 10.0, 1))
            .unwrap();

        assert_eq!(store.with_session(a, |s| s.ledger.len()).unwrap(), 1);
        assert_eq!(store.with_session(b, |s| s.ledger.len()).unwrap(), 0);
    }

    #[test]
    fn unknown_session_is_not_found() {
        let store = SessionStore::new();
        let id = Uuid::new_v4();
        assert_eq!(
            store.with_session(id, |_| ()),
            Err(SessionError::NotFound(id))
        );
    }

    #[test]
    fn remove_discards_state() {
        let store = SessionStore::new();
        let id = store.create();
        assert_eq!(store.len(), 1);
        assert!(store.remove(id));
        assert!(!store.remove(id));
        assert!(store.is_empty());
        assert!(store.with_session(id, |_| ()).is_err());
    }

    #[test]
    fn idle_session_expires() {
        let store = SessionStore::with_idle_ttl(Duration::from_millis(20));
        let id = store.create();
        assert!(store.with_session(id, |_| ()).is_ok());

        std::thread::sleep(Duration::from_millis(60));

        assert_eq!(
            store.with_session(id, |_| ()),
            Err(SessionError::NotFound(id))
        );
        assert!(store.is_empty());
    }

    #[test]
    fn create_sweeps_idle_sessions() {
        let store = SessionStore::with_idle_ttl(Duration::from_millis(20));
        for _ in 0..100 {
            store.create();
        }
        assert_eq!(store.len(), 100);

        std::thread::sleep(Duration::from_millis(60));

        let fresh = store.create();
        assert_eq!(store.len(), 1);
        assert!(store.with_session(fresh, |_| ()).is_ok());
    }

    #[test]
    fn access_keeps_session_alive() {
        let store = SessionStore::with_idle_ttl(Duration::from_secs(60));
        let id = store.create();
        for _ in 0..3 {
            store.create();
        }
        assert!(store.with_session(id, |_| ()).is_ok());
        assert_eq!(store.len(), 4);
    }
}
