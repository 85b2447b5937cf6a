//! Session registry: one isolated [`SearchSession`] per client.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use gridstep_paths::SearchSession;

/// Identifies one client session for its whole lifetime.
pub type SessionId = u64;

/// Shared handle to one session. The mutex serializes requests on it.
pub type SessionHandle = Arc<Mutex<SearchSession>>;

/// All live sessions. Distinct sessions share nothing but this map, so
/// requests for different sessions only contend while looking one up.
#[derive(Debug)]
pub struct SessionRegistry {
    sessions: Mutex<HashMap<SessionId, SessionHandle>>,
    next_id: AtomicU64,
    max_grid_size: i32,
}

impl SessionRegistry {
    /// A registry whose sessions accept grids up to `max_grid_size`.
    pub fn new(max_grid_size: i32) -> Self {
        Self {
            sessions: Mutex::new(HashMap::new()),
            next_id: AtomicU64::new(1),
            max_grid_size,
        }
    }

    fn sessions(&self) -> MutexGuard<'_, HashMap<SessionId, SessionHandle>> {
        self.sessions.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Create an idle session and return its id.
    pub fn open(&self) -> SessionId {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let session = Arc::new(Mutex::new(SearchSession::with_max_size(self.max_grid_size)));
        self.sessions().insert(id, session);
        log::debug!("session {} opened", id);
        id
    }

    pub fn get(&self, id: SessionId) -> Option<SessionHandle> {
        self.sessions().get(&id).cloned()
    }

    /// Drop a session. Returns whether it existed.
    pub fn close(&self, id: SessionId) -> bool {
        let removed = self.sessions().remove(&id).is_some();
        if removed {
            log::debug!("session {} closed", id);
        }
        removed
    }

    /// Number of live sessions.
    pub fn len(&self) -> usize {
        self.sessions().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
