use std::sync::Arc;

use tracing::{debug, info};

use super::domain::{
    Conversation, ConversationDetail, ConversationId, ConversationMessage, ConversationSummary,
    NewConversation, UnreadEntry, UnreadSummary,
};
use super::repository::ConversationRepository;
use super::unread::UnreadCache;
use super::ConversationError;
use crate::accounts::{User, UserId, UserRepository, UserSummary};
use crate::listings::{ListingRef, ListingRepository};
use crate::realtime::{chat_group, user_group, ChannelLayer, Event};
use crate::store::RepositoryError;

/// Buyer/owner messaging with cached unread counts and realtime fan-out.
pub struct ConversationService {
    conversations: Arc<dyn ConversationRepository>,
    listings: Arc<dyn ListingRepository>,
    users: Arc<dyn UserRepository>,
    channels: Arc<ChannelLayer>,
    unread: UnreadCache,
}

impl ConversationService {
    pub fn new(
        conversations: Arc<dyn ConversationRepository>,
        listings: Arc<dyn ListingRepository>,
        users: Arc<dyn UserRepository>,
        channels: Arc<ChannelLayer>,
        unread: UnreadCache,
    ) -> Self {
        Self {
            conversations,
            listings,
            users,
            channels,
            unread,
        }
    }

    /// Open a conversation about a listing, or return the one the user already has.
    pub fn start(
        &self,
        user: &User,
        listing: ListingRef,
        content: &str,
    ) -> Result<(Conversation, bool), ConversationError> {
        let record = self
            .listings
            .fetch(listing)?
            .ok_or(ConversationError::ListingNotFound)?;
        if record.owner == user.id {
            return Err(ConversationError::CannotMessageSelf);
        }
        if let Some(existing) = self.conversations.find(listing, user.id)? {
            debug!(conversation = %existing.id, "reusing existing conversation");
            return Ok((existing, false));
        }

        let content = clean_content(content)?;
        let (conversation, created) = self.conversations.find_or_create(NewConversation {
            listing,
            buyer: user.id,
            owner: record.owner,
        })?;
        if !created {
            debug!(conversation = %conversation.id, "conversation started concurrently");
            return Ok((conversation, false));
        }
        info!(conversation = %conversation.id, %listing, buyer = %user.id, "conversation started");
        self.post(user, conversation.id, &content)?;

        let conversation = self.member_conversation(user, conversation.id)?;
        Ok((conversation, true))
    }

    /// Store a message, refresh the recipients' unread counts and fan both out.
    pub fn post(
        &self,
        user: &User,
        id: ConversationId,
        content: &str,
    ) -> Result<ConversationMessage, ConversationError> {
        let conversation = self.member_conversation(user, id)?;
        let content = clean_content(content)?;
        let message = self
            .conversations
            .append(id, user.id, content)
            .map_err(not_found)?;

        for member in conversation
            .members()
            .into_iter()
            .filter(|member| *member != user.id)
        {
            let count = self.unread.increment_or(member, id, || {
                self.conversations.unread_count(id, member)
            })?;
            self.channels.send(
                &user_group(member),
                Event::UnreadUpdate {
                    conversation_id: id,
                    count,
                },
            );
        }

        let delivered = self.channels.send(
            &chat_group(id),
            Event::Chat {
                message: message.content.clone(),
                sender: user.username.clone(),
                timestamp: message.created_at,
                message_id: message.id,
            },
        );
        debug!(conversation = %id, message = %message.id, delivered, "message posted");
        Ok(message)
    }

    /// Conversation with its messages; opening it marks the counterpart's messages read.
    pub fn detail(
        &self,
        user: &User,
        id: ConversationId,
    ) -> Result<ConversationDetail, ConversationError> {
        let conversation = self.member_conversation(user, id)?;
        self.conversations.mark_read(id, user.id)?;
        self.unread.reset(user.id, id);

        let listing = self
            .listings
            .fetch(conversation.listing)?
            .map(|listing| listing.summary());
        Ok(ConversationDetail {
            counterpart: self.summary_of(conversation.counterpart(user.id)),
            messages: self.conversations.messages(id)?,
            listing,
            conversation,
        })
    }

    /// Member conversations, most recently active first.
    pub fn inbox(&self, user: &User) -> Result<Vec<ConversationSummary>, ConversationError> {
        let mut conversations = self.conversations.for_member(user.id)?;
        conversations.sort_by(|a, b| {
            b.modified_at
                .cmp(&a.modified_at)
                .then_with(|| b.id.cmp(&a.id))
        });

        let mut inbox = Vec::with_capacity(conversations.len());
        for conversation in conversations {
            let unread_count = match self.unread.get(user.id, conversation.id) {
                Some(count) => count,
                None => {
                    let count = self.conversations.unread_count(conversation.id, user.id)?;
                    self.unread.set(user.id, conversation.id, count);
                    count
                }
            };
            let listing_title = self
                .listings
                .fetch(conversation.listing)?
                .map(|listing| listing.title);
            let last_message = self.conversations.messages(conversation.id)?.pop();

            inbox.push(ConversationSummary {
                id: conversation.id,
                listing: conversation.listing,
                listing_title,
                counterpart: self.summary_of(conversation.counterpart(user.id)),
                last_message,
                unread_count,
                modified_at: conversation.modified_at,
            });
        }
        Ok(inbox)
    }

    /// Unread totals counted straight from storage.
    pub fn unread_summary(&self, user: &User) -> Result<UnreadSummary, ConversationError> {
        let mut by_conversation = Vec::new();
        for conversation in self.conversations.for_member(user.id)? {
            let count = self.conversations.unread_count(conversation.id, user.id)?;
            if count > 0 {
                by_conversation.push(UnreadEntry {
                    conversation_id: conversation.id,
                    count,
                });
            }
        }
        by_conversation.sort_by_key(|entry| entry.conversation_id);
        Ok(UnreadSummary {
            total_unread: by_conversation.iter().map(|entry| entry.count).sum(),
            by_conversation,
        })
    }

    pub fn mark_read(&self, user: &User, id: ConversationId) -> Result<usize, ConversationError> {
        self.member_conversation(user, id)?;
        let changed = self.conversations.mark_read(id, user.id)?;
        self.unread.reset(user.id, id);
        Ok(changed)
    }

    pub fn mark_all_read(&self, user: &User) -> Result<usize, ConversationError> {
        let mut changed = 0;
        for conversation in self.conversations.for_member(user.id)? {
            changed += self.conversations.mark_read(conversation.id, user.id)?;
            self.unread.reset(user.id, conversation.id);
        }
        info!(user_id = %user.id, changed, "marked all conversations read");
        Ok(changed)
    }

    pub fn get(&self, id: ConversationId) -> Result<Conversation, ConversationError> {
        self.conversations
            .fetch(id)?
            .ok_or(ConversationError::NotFound)
    }

    /// `NotFound` takes precedence over `NotMember`.
    pub fn member_conversation(
        &self,
        user: &User,
        id: ConversationId,
    ) -> Result<Conversation, ConversationError> {
        let conversation = self.get(id)?;
        if conversation.is_member(user.id) {
            Ok(conversation)
        } else {
            Err(ConversationError::NotMember)
        }
    }

    pub fn purge_listing(&self, listing: ListingRef) -> Result<usize, ConversationError> {
        let removed = self.conversations.purge_listing(listing)?;
        for conversation in &removed {
            for member in conversation.members() {
                self.unread.forget(member, conversation.id);
            }
        }
        if !removed.is_empty() {
            info!(%listing, conversations = removed.len(), "conversations removed with listing");
        }
        Ok(removed.len())
    }

    pub fn count(&self) -> Result<usize, ConversationError> {
        Ok(self.conversations.count()?)
    }

    fn summary_of(&self, id: UserId) -> UserSummary {
        match self.users.fetch(id) {
            Ok(Some(user)) => user.summary(),
            _ => UserSummary {
                id,
                username: format!("user-{id}"),
            },
        }
    }
}

fn clean_content(content: &str) -> Result<String, ConversationError> {
    let content = content.trim();
    if content.is_empty() {
        Err(ConversationError::EmptyMessage)
    } else {
        Ok(content.to_string())
    }
}

fn not_found(err: RepositoryError) -> ConversationError {
    match err {
        RepositoryError::NotFound => ConversationError::NotFound,
        other => ConversationError::Repository(other),
    }
}
