//! Per-listing conversations between buyers and owners.

pub mod domain;
pub mod repository;
pub mod router;
pub mod service;
mod unread;

#[cfg(test)]
mod tests;

pub use domain::{
    Conversation, ConversationDetail, ConversationId, ConversationMessage, ConversationSummary,
    MessageDraft, MessageId, StartConversation, UnreadEntry, UnreadSummary,
};
pub use repository::{ConversationRepository, InMemoryConversationRepository};
pub use router::conversation_router;
pub use service::ConversationService;
pub use unread::UnreadCache;

use crate::store::RepositoryError;

#[derive(Debug, thiserror::Error)]
pub enum ConversationError {
    #[error("listing not found")]
    ListingNotFound,
    #[error("conversation not found")]
    NotFound,
    #[error("you are not a member of this conversation")]
    NotMember,
    #[error("You cannot message yourself about your own listing.")]
    CannotMessageSelf,
    #[error("message content is required")]
    EmptyMessage,
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
