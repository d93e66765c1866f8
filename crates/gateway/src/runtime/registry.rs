//! Session registry: the bounded map from session key to live session.
//!
//! Lookup, the capacity check, eviction, and insertion all happen under one
//! short `parking_lot` lock that is never held across an `.await`; model
//! calls only ever hold the per-session lock.  Handles already given out
//! stay valid after eviction, they just stop being reachable by key.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use parking_lot::Mutex;

use aun_domain::config::{EvictionPolicy, SessionsConfig};
use aun_domain::trace::TraceEvent;

use super::session::{ConversationSession, SessionServices};

struct RegistryEntry {
    session: Arc<ConversationSession>,
    last_used: Instant,
}

pub struct SessionRegistry {
    sessions: Mutex<HashMap<String, RegistryEntry>>,
    max_sessions: usize,
    eviction: EvictionPolicy,
    services: Arc<SessionServices>,
}

impl SessionRegistry {
    pub fn new(services: Arc<SessionServices>, max_sessions: usize, eviction: EvictionPolicy) -> Self {
        Self {
            sessions: Mutex::new(HashMap::new()),
            max_sessions,
            eviction,
            services,
        }
    }

    pub fn from_config(cfg: &SessionsConfig, services: Arc<SessionServices>) -> Self {
        Self::new(services, cfg.max_sessions, cfg.eviction)
    }

    /// Return the session for `key`, creating it if needed.
    ///
    /// A new key arriving while the registry is at capacity triggers the
    /// configured eviction first, so the live count never exceeds
    /// `max_sessions`.
    pub fn get_or_create(&self, key: &str) -> Arc<ConversationSession> {
        let mut sessions = self.sessions.lock();

        if let Some(entry) = sessions.get_mut(key) {
            entry.last_used = Instant::now();
            return Arc::clone(&entry.session);
        }

        if sessions.len() >= self.max_sessions {
            let evicted = evict(&mut sessions, self.eviction);
            tracing::warn!(
                policy = self.eviction.as_str(),
                evicted,
                max_sessions = self.max_sessions,
                "session registry at capacity"
            );
            TraceEvent::SessionsEvicted {
                policy: self.eviction.as_str().to_owned(),
                evicted,
                trigger_key: key.to_owned(),
            }
            .emit();
        }

        let session = Arc::new(ConversationSession::new(key, Arc::clone(&self.services)));
        sessions.insert(
            key.to_owned(),
            RegistryEntry {
                session: Arc::clone(&session),
                last_used: Instant::now(),
            },
        );

        TraceEvent::SessionCreated {
            session_key: key.to_owned(),
            live_sessions: sessions.len(),
        }
        .emit();

        session
    }

    pub fn contains(&self, key: &str) -> bool {
        self.sessions.lock().contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.sessions.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.lock().is_empty()
    }

    pub fn max_sessions(&self) -> usize {
        self.max_sessions
    }
}

/// Remove sessions per `policy`; returns how many were dropped.
fn evict(sessions: &mut HashMap<String, RegistryEntry>, policy: EvictionPolicy) -> usize {
    match policy {
        EvictionPolicy::ClearAll => {
            let n = sessions.len();
            sessions.clear();
            n
        }
        EvictionPolicy::LeastRecent => {
            let oldest = sessions
                .iter()
                .min_by_key(|(_, entry)| entry.last_used)
                .map(|(key, _)| key.clone());
            match oldest {
                Some(key) => {
                    sessions.remove(&key);
                    1
                }
                None => 0,
            }
        }
    }
}
