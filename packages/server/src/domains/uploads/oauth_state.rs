//! Pending OAuth `state` values.
//!
//! A state is issued when the consent URL is built and consumed exactly once
//! by the callback. Entries older than [`STATE_TTL`] are rejected and purged.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use uuid::Uuid;

pub const STATE_TTL: Duration = Duration::from_secs(600);

pub struct OAuthStateStore {
    pending: Mutex<HashMap<String, Instant>>,
    ttl: Duration,
}

impl OAuthStateStore {
    pub fn new() -> Self {
        Self::with_ttl(STATE_TTL)
    }

    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            pending: Mutex::new(HashMap::new()),
            ttl,
        }
    }

    /// Issue a new random state
    pub fn issue(&self) -> String {
        let state = Uuid::new_v4().simple().to_string();
        let now = Instant::now();
        let mut pending = self.pending.lock().unwrap_or_else(|e| e.into_inner());
        pending.retain(|_, issued| now.duration_since(*issued) < self.ttl);
        pending.insert(state.clone(), now);
        state
    }

    /// Consume `state`; true only for a known, unexpired, unused value
    pub fn consume(&self, state: &str) -> bool {
        let mut pending = self.pending.lock().unwrap_or_else(|e| e.into_inner());
        match pending.remove(state) {
            Some(issued) => issued.elapsed() < self.ttl,
            None => false,
        }
    }
}

impl Default for OAuthStateStore {
    fn default() -> Self {
        Self::new()
    }
}
