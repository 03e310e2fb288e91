use std::fmt::Display;

use dashmap::DashMap;
use tokio::sync::broadcast;
use tracing::debug;

use super::event::Event;

pub fn chat_group(conversation: impl Display) -> String {
    format!("chat_{conversation}")
}

pub fn user_group(user: impl Display) -> String {
    format!("user_{user}")
}

/// Named broadcast groups. Sending to a group nobody listens to is a no-op.
pub struct ChannelLayer {
    groups: DashMap<String, broadcast::Sender<Event>>,
    capacity: usize,
}

impl ChannelLayer {
    pub fn new(capacity: usize) -> Self {
        Self {
            groups: DashMap::new(),
            capacity: capacity.max(1),
        }
    }

    pub fn subscribe(&self, group: &str) -> broadcast::Receiver<Event> {
        self.groups
            .entry(group.to_string())
            .or_insert_with(|| broadcast::channel(self.capacity).0)
            .subscribe()
    }

    /// Deliver an event to the group's current subscribers, returning how many got it.
    pub fn send(&self, group: &str, event: Event) -> usize {
        let delivered = match self.groups.get(group) {
            Some(sender) => sender.send(event).unwrap_or(0),
            None => 0,
        };
        if delivered == 0 {
            self.groups
                .remove_if(group, |_, sender| sender.receiver_count() == 0);
            debug!(group, "no subscribers for group");
        }
        delivered
    }

    pub fn group_count(&self) -> usize {
        self.groups.len()
    }
}

impl Default for ChannelLayer {
    fn default() -> Self {
        Self::new(64)
    }
}
