//! Tracking of served expressions, so that the same expression is not served twice.

use crate::config::GuardConfig;
use log::debug;
use std::{
    collections::{HashMap, HashSet, VecDeque},
    num::NonZeroUsize,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};
use unity_compute::symbolic::Fingerprint;

/// Whether a fingerprint was seen before.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Novelty {
    /// The fingerprint was not seen before, and has now been recorded.
    Fresh,

    /// The fingerprint was already recorded.
    Duplicate,
}

/// Which requests share a [`UniquenessGuard`].
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum GuardScope {
    /// One guard shared by every request.
    #[default]
    Process,

    /// One guard per session.
    Session,
}

#[derive(Debug, Default)]
struct Seen {
    fingerprints: HashSet<Fingerprint>,

    /// Insertion order, oldest first.
    order: VecDeque<Fingerprint>,
}

/// A set of fingerprints of served expressions, optionally bounded, in which case the oldest
/// fingerprint is evicted first.
#[derive(Debug, Default)]
pub struct UniquenessGuard {
    seen: Mutex<Seen>,
    capacity: Option<NonZeroUsize>,
}

impl UniquenessGuard {
    /// Creates an unbounded guard.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a guard remembering at most `capacity` fingerprints, or unbounded if [`None`].
    pub fn with_capacity(capacity: Option<NonZeroUsize>) -> Self {
        Self {
            seen: Mutex::default(),
            capacity,
        }
    }

    /// Locks the set. A panic while holding the lock cannot leave the set inconsistent, so a
    /// poisoned lock is simply recovered.
    fn lock(&self) -> MutexGuard<'_, Seen> {
        self.seen.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Records the fingerprint if it was not seen before, as a single atomic operation.
    pub fn check_and_record(&self, fingerprint: Fingerprint) -> Novelty {
        let mut seen = self.lock();
        if !seen.fingerprints.insert(fingerprint) {
            return Novelty::Duplicate;
        }

        seen.order.push_back(fingerprint);
        if let Some(capacity) = self.capacity {
            while seen.order.len() > capacity.get() {
                if let Some(oldest) = seen.order.pop_front() {
                    debug!("evicting fingerprint {}", oldest);
                    seen.fingerprints.remove(&oldest);
                }
            }
        }

        Novelty::Fresh
    }

    /// Returns true if the fingerprint is currently recorded.
    pub fn contains(&self, fingerprint: Fingerprint) -> bool {
        self.lock().fingerprints.contains(&fingerprint)
    }

    /// Number of recorded fingerprints.
    pub fn len(&self) -> usize {
        self.lock().order.len()
    }

    /// Returns true if nothing was recorded yet.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The capacity of the guard, if bounded.
    pub fn capacity(&self) -> Option<NonZeroUsize> {
        self.capacity
    }
}

#[derive(Debug)]
struct Session {
    guard: Arc<UniquenessGuard>,

    /// Value of [`Sessions::clock`] when the session last asked for its guard.
    last_used: u64,
}

#[derive(Debug, Default)]
struct Sessions {
    guards: HashMap<String, Session>,
    clock: u64,
}

/// Hands out the [`UniquenessGuard`] a request should use, according to a [`GuardScope`].
///
/// With [`GuardScope::Session`], a guard is created the first time a session asks for one. If
/// [`GuardConfig::max_sessions`] is set, the least recently used session is forgotten once there
/// are more sessions than that; [`GuardRegistry::remove_session`] forgets a session explicitly.
#[derive(Debug)]
pub struct GuardRegistry {
    config: GuardConfig,
    process: Arc<UniquenessGuard>,
    sessions: Mutex<Sessions>,
}

impl GuardRegistry {
    /// Creates a registry with no recorded fingerprints.
    pub fn new(config: GuardConfig) -> Self {
        Self {
            config,
            process: Arc::new(UniquenessGuard::with_capacity(config.capacity)),
            sessions: Mutex::default(),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Sessions> {
        self.sessions.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// The scope of the guards handed out.
    pub fn scope(&self) -> GuardScope {
        self.config.scope
    }

    /// Returns the guard for the given session. With [`GuardScope::Process`], or without a
    /// session, this is the process-wide guard.
    pub fn guard_for(&self, session: Option<&str>) -> Arc<UniquenessGuard> {
        let (GuardScope::Session, Some(session)) = (self.config.scope, session) else {
            return Arc::clone(&self.process);
        };

        let mut sessions = self.lock();
        sessions.clock += 1;
        let now = sessions.clock;
        let capacity = self.config.capacity;
        let entry = sessions.guards
            .entry(session.to_string())
            .or_insert_with(|| Session {
                guard: Arc::new(UniquenessGuard::with_capacity(capacity)),
                last_used: now,
            });
        entry.last_used = now;
        let guard = Arc::clone(&entry.guard);

        if let Some(max) = self.config.max_sessions {
            while sessions.guards.len() > max.get() {
                let oldest = sessions.guards
                    .iter()
                    .min_by_key(|(_, entry)| entry.last_used)
                    .map(|(name, _)| name.clone());
                let Some(oldest) = oldest else { break };
                debug!("forgetting least recently used session `{}`", oldest);
                sessions.guards.remove(&oldest);
            }
        }

        guard
    }

    /// Forgets a session and the fingerprints served to it. Returns true if the session existed.
    ///
    /// Pipelines still holding the session's guard keep using it, but the next call to
    /// [`GuardRegistry::guard_for`] with this session starts from an empty guard.
    pub fn remove_session(&self, session: &str) -> bool {
        self.lock().guards.remove(session).is_some()
    }

    /// Number of sessions with a guard.
    pub fn session_count(&self) -> usize {
        self.lock().guards.len()
    }
}
