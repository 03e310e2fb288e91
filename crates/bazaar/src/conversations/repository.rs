use std::collections::BTreeMap;
use std::sync::Mutex;

use chrono::Utc;

use super::domain::{
    Conversation, ConversationId, ConversationMessage, MessageId, NewConversation,
};
use crate::accounts::UserId;
use crate::listings::ListingRef;
use crate::store::{lock, RepositoryError, Sequence};

/// Storage abstraction for conversations and their messages.
pub trait ConversationRepository: Send + Sync {
    /// The buyer's conversation about the listing, created when missing. The flag is `true`
    /// when this call created it.
    fn find_or_create(
        &self,
        conversation: NewConversation,
    ) -> Result<(Conversation, bool), RepositoryError>;
    fn fetch(&self, id: ConversationId) -> Result<Option<Conversation>, RepositoryError>;
    /// Existing conversation about `listing` that `member` takes part in.
    fn find(
        &self,
        listing: ListingRef,
        member: UserId,
    ) -> Result<Option<Conversation>, RepositoryError>;
    fn for_member(&self, member: UserId) -> Result<Vec<Conversation>, RepositoryError>;
    /// Store a message and bump the conversation's `modified_at`.
    fn append(
        &self,
        id: ConversationId,
        author: UserId,
        content: String,
    ) -> Result<ConversationMessage, RepositoryError>;
    /// Messages oldest first.
    fn messages(&self, id: ConversationId) -> Result<Vec<ConversationMessage>, RepositoryError>;
    /// Mark messages not written by `reader` as read; returns how many changed.
    fn mark_read(&self, id: ConversationId, reader: UserId) -> Result<usize, RepositoryError>;
    fn unread_count(&self, id: ConversationId, reader: UserId) -> Result<usize, RepositoryError>;
    /// Delete conversations about a listing together with their messages.
    fn purge_listing(&self, listing: ListingRef) -> Result<Vec<Conversation>, RepositoryError>;
    fn count(&self) -> Result<usize, RepositoryError>;
}

#[derive(Default)]
pub struct InMemoryConversationRepository {
    conversations: Mutex<BTreeMap<ConversationId, Conversation>>,
    messages: Mutex<BTreeMap<ConversationId, Vec<ConversationMessage>>>,
    conversation_ids: Sequence,
    message_ids: Sequence,
}

impl ConversationRepository for InMemoryConversationRepository {
    fn find_or_create(
        &self,
        conversation: NewConversation,
    ) -> Result<(Conversation, bool), RepositoryError> {
        let mut conversations = lock(&self.conversations, "conversations")?;
        if let Some(existing) = conversations.values().find(|existing| {
            existing.listing == conversation.listing && existing.is_member(conversation.buyer)
        }) {
            return Ok((existing.clone(), false));
        }

        let now = Utc::now();
        let record = Conversation {
            id: ConversationId(self.conversation_ids.next()),
            listing: conversation.listing,
            buyer: conversation.buyer,
            owner: conversation.owner,
            created_at: now,
            modified_at: now,
        };
        conversations.insert(record.id, record.clone());
        Ok((record, true))
    }

    fn fetch(&self, id: ConversationId) -> Result<Option<Conversation>, RepositoryError> {
        Ok(lock(&self.conversations, "conversations")?.get(&id).cloned())
    }

    fn find(
        &self,
        listing: ListingRef,
        member: UserId,
    ) -> Result<Option<Conversation>, RepositoryError> {
        Ok(lock(&self.conversations, "conversations")?
            .values()
            .find(|conversation| conversation.listing == listing && conversation.is_member(member))
            .cloned())
    }

    fn for_member(&self, member: UserId) -> Result<Vec<Conversation>, RepositoryError> {
        Ok(lock(&self.conversations, "conversations")?
            .values()
            .filter(|conversation| conversation.is_member(member))
            .cloned()
            .collect())
    }

    fn append(
        &self,
        id: ConversationId,
        author: UserId,
        content: String,
    ) -> Result<ConversationMessage, RepositoryError> {
        let mut conversations = lock(&self.conversations, "conversations")?;
        let conversation = conversations.get_mut(&id).ok_or(RepositoryError::NotFound)?;
        let now = Utc::now();
        conversation.modified_at = now;

        let message = ConversationMessage {
            id: MessageId(self.message_ids.next()),
            conversation_id: id,
            content,
            created_by: author,
            created_at: now,
            is_read: false,
        };
        lock(&self.messages, "messages")?
            .entry(id)
            .or_default()
            .push(message.clone());
        Ok(message)
    }

    fn messages(&self, id: ConversationId) -> Result<Vec<ConversationMessage>, RepositoryError> {
        Ok(lock(&self.messages, "messages")?
            .get(&id)
            .cloned()
            .unwrap_or_default())
    }

    fn mark_read(&self, id: ConversationId, reader: UserId) -> Result<usize, RepositoryError> {
        let mut messages = lock(&self.messages, "messages")?;
        let mut changed = 0;
        if let Some(thread) = messages.get_mut(&id) {
            for message in thread
                .iter_mut()
                .filter(|message| message.created_by != reader && !message.is_read)
            {
                message.is_read = true;
                changed += 1;
            }
        }
        Ok(changed)
    }

    fn unread_count(&self, id: ConversationId, reader: UserId) -> Result<usize, RepositoryError> {
        Ok(lock(&self.messages, "messages")?
            .get(&id)
            .map(|thread| {
                thread
                    .iter()
                    .filter(|message| message.created_by != reader && !message.is_read)
                    .count()
            })
            .unwrap_or(0))
    }

    fn purge_listing(&self, listing: ListingRef) -> Result<Vec<Conversation>, RepositoryError> {
        let mut conversations = lock(&self.conversations, "conversations")?;
        let doomed: Vec<ConversationId> = conversations
            .values()
            .filter(|conversation| conversation.listing == listing)
            .map(|conversation| conversation.id)
            .collect();

        let mut messages = lock(&self.messages, "messages")?;
        let mut removed = Vec::with_capacity(doomed.len());
        for id in doomed {
            messages.remove(&id);
            removed.extend(conversations.remove(&id));
        }
        Ok(removed)
    }

    fn count(&self) -> Result<usize, RepositoryError> {
        Ok(lock(&self.conversations, "conversations")?.len())
    }
}
