use std::sync::Mutex;

use super::{ContactId, ContactMessage, QuickMessage};
use crate::store::{lock, RepositoryError, Sequence};

pub trait ContactRepository: Send + Sync {
    fn insert(&self, message: ContactMessage) -> Result<ContactMessage, RepositoryError>;
    fn all(&self) -> Result<Vec<ContactMessage>, RepositoryError>;
    fn mark_read(&self, id: ContactId) -> Result<ContactMessage, RepositoryError>;
    fn remove(&self, id: ContactId) -> Result<ContactMessage, RepositoryError>;
    fn insert_quick(&self, message: QuickMessage) -> Result<QuickMessage, RepositoryError>;
    fn all_quick(&self) -> Result<Vec<QuickMessage>, RepositoryError>;
}

#[derive(Default)]
pub struct InMemoryContactRepository {
    messages: Mutex<Vec<ContactMessage>>,
    quick: Mutex<Vec<QuickMessage>>,
    message_ids: Sequence,
    quick_ids: Sequence,
}

impl ContactRepository for InMemoryContactRepository {
    fn insert(&self, mut message: ContactMessage) -> Result<ContactMessage, RepositoryError> {
        message.id = ContactId(self.message_ids.next());
        lock(&self.messages, "contact_messages")?.push(message.clone());
        Ok(message)
    }

    fn all(&self) -> Result<Vec<ContactMessage>, RepositoryError> {
        Ok(lock(&self.messages, "contact_messages")?.clone())
    }

    fn mark_read(&self, id: ContactId) -> Result<ContactMessage, RepositoryError> {
        let mut messages = lock(&self.messages, "contact_messages")?;
        let message = messages
            .iter_mut()
            .find(|message| message.id == id)
            .ok_or(RepositoryError::NotFound)?;
        message.is_read = true;
        Ok(message.clone())
    }

    fn remove(&self, id: ContactId) -> Result<ContactMessage, RepositoryError> {
        let mut messages = lock(&self.messages, "contact_messages")?;
        let index = messages
            .iter()
            .position(|message| message.id == id)
            .ok_or(RepositoryError::NotFound)?;
        Ok(messages.remove(index))
    }

    fn insert_quick(&self, mut message: QuickMessage) -> Result<QuickMessage, RepositoryError> {
        message.id = ContactId(self.quick_ids.next());
        lock(&self.quick, "quick_messages")?.push(message.clone());
        Ok(message)
    }

    fn all_quick(&self) -> Result<Vec<QuickMessage>, RepositoryError> {
        Ok(lock(&self.quick, "quick_messages")?.clone())
    }
}
