use std::time::Duration;

use moka::sync::Cache;

use super::domain::ConversationId;
use crate::accounts::UserId;
use crate::config::MAX_TTL_SECS;

/// Short-lived per-(user, conversation) unread counts.
#[derive(Clone)]
pub struct UnreadCache {
    counts: Cache<(UserId, ConversationId), usize>,
}

impl UnreadCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            counts: Cache::builder()
                .time_to_live(ttl.min(Duration::from_secs(MAX_TTL_SECS)))
                .build(),
        }
    }

    pub fn get(&self, user: UserId, conversation: ConversationId) -> Option<usize> {
        self.counts.get(&(user, conversation))
    }

    pub fn set(&self, user: UserId, conversation: ConversationId, count: usize) {
        self.counts.insert((user, conversation), count);
    }

    /// Bump a cached count; on a miss, seed it from `recount`.
    pub fn increment_or<E>(
        &self,
        user: UserId,
        conversation: ConversationId,
        recount: impl FnOnce() -> Result<usize, E>,
    ) -> Result<usize, E> {
        let count = match self.get(user, conversation) {
            Some(cached) => cached.saturating_add(1),
            None => recount()?,
        };
        self.set(user, conversation, count);
        Ok(count)
    }

    pub fn reset(&self, user: UserId, conversation: ConversationId) {
        self.set(user, conversation, 0);
    }

    pub fn forget(&self, user: UserId, conversation: ConversationId) {
        self.counts.invalidate(&(user, conversation));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn increments_cached_counts_and_recounts_on_miss() {
        let cache = UnreadCache::new(Duration::from_secs(60));
        let user = UserId(1);
        let conversation = ConversationId(5);

        let seeded: Result<usize, ()> = cache.increment_or(user, conversation, || Ok(3));
        assert_eq!(seeded, Ok(3));

        let bumped: Result<usize, ()> =
            cache.increment_or(user, conversation, || panic!("cached count should be used"));
        assert_eq!(bumped, Ok(4));

        cache.reset(user, conversation);
        assert_eq!(cache.get(user, conversation), Some(0));

        cache.forget(user, conversation);
        assert_eq!(cache.get(user, conversation), None);
    }
}
