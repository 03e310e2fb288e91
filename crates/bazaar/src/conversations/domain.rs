use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::accounts::{UserId, UserSummary};
use crate::listings::{ListingRef, ListingSummary};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConversationId(pub u64);

impl fmt::Display for ConversationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageId(pub u64);

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A thread between an interested buyer and a listing's owner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conversation {
    pub id: ConversationId,
    pub listing: ListingRef,
    pub buyer: UserId,
    pub owner: UserId,
    pub created_at: DateTime<Utc>,
    pub modified_at: DateTime<Utc>,
}

impl Conversation {
    pub fn members(&self) -> [UserId; 2] {
        [self.buyer, self.owner]
    }

    pub fn is_member(&self, user: UserId) -> bool {
        self.buyer == user || self.owner == user
    }

    pub fn counterpart(&self, user: UserId) -> UserId {
        if self.buyer == user {
            self.owner
        } else {
            self.buyer
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewConversation {
    pub listing: ListingRef,
    pub buyer: UserId,
    pub owner: UserId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationMessage {
    pub id: MessageId,
    pub conversation_id: ConversationId,
    pub content: String,
    pub created_by: UserId,
    pub created_at: DateTime<Utc>,
    pub is_read: bool,
}

/// Payload opening a conversation about a listing.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct StartConversation {
    pub listing: ListingRef,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct MessageDraft {
    pub content: String,
}

/// Inbox row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConversationSummary {
    pub id: ConversationId,
    pub listing: ListingRef,
    pub listing_title: Option<String>,
    pub counterpart: UserSummary,
    pub last_message: Option<ConversationMessage>,
    pub unread_count: usize,
    pub modified_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConversationDetail {
    pub conversation: Conversation,
    pub listing: Option<ListingSummary>,
    pub counterpart: UserSummary,
    pub messages: Vec<ConversationMessage>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnreadSummary {
    pub total_unread: usize,
    pub by_conversation: Vec<UnreadEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnreadEntry {
    pub conversation_id: ConversationId,
    pub count: usize,
}
