use std::time::Duration;

use moka::sync::Cache;
use uuid::Uuid;

use super::domain::{SessionToken, UserId};
use crate::config::MAX_TTL_SECS;

/// Bearer-token sessions with idle expiry.
#[derive(Clone)]
pub struct SessionStore {
    sessions: Cache<String, UserId>,
}

impl SessionStore {
    pub fn new(idle_ttl: Duration) -> Self {
        Self {
            sessions: Cache::builder()
                .time_to_idle(idle_ttl.min(Duration::from_secs(MAX_TTL_SECS)))
                .build(),
        }
    }

    pub fn open(&self, user: UserId) -> SessionToken {
        let token = Uuid::new_v4().simple().to_string();
        self.sessions.insert(token.clone(), user);
        SessionToken(token)
    }

    /// Reading a session counts as activity and pushes its expiry out.
    pub fn resolve(&self, token: &str) -> Option<UserId> {
        self.sessions.get(token)
    }

    pub fn close(&self, token: &str) {
        self.sessions.invalidate(token);
    }
}
