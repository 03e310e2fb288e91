use std::sync::{Arc, OnceLock};

use chrono::Utc;
use regex::Regex;
use tracing::info;

use super::repository::ContactRepository;
use super::{
    ContactDraft, ContactError, ContactId, ContactMessage, QuickMessage, QuickMessageDraft,
    CONTACT_PAGE_SIZE, NAME_MAX_LEN, PHONE_MAX_LEN, SUBJECT_MAX_LEN,
};
use crate::pagination::Page;
use crate::store::RepositoryError;

fn email_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("email pattern compiles"))
}

pub struct ContactService {
    messages: Arc<dyn ContactRepository>,
}

impl ContactService {
    pub fn new(messages: Arc<dyn ContactRepository>) -> Self {
        Self { messages }
    }

    pub fn submit(&self, draft: ContactDraft) -> Result<ContactMessage, ContactError> {
        let name = required("name", &draft.name, NAME_MAX_LEN)?;
        let subject = required("subject", &draft.subject, SUBJECT_MAX_LEN)?;
        let message = required("message", &draft.message, usize::MAX)?;
        let email = draft.email.trim().to_string();
        if !email_pattern().is_match(&email) {
            return Err(ContactError::Invalid("enter a valid email address".to_string()));
        }

        let stored = self.messages.insert(ContactMessage {
            id: ContactId(0),
            name,
            email,
            subject,
            message,
            created_at: Utc::now(),
            is_read: false,
        })?;
        info!(message_id = %stored.id, "contact message received");
        Ok(stored)
    }

    /// Newest first, ten per page.
    pub fn list(&self, page: usize) -> Result<Page<ContactMessage>, ContactError> {
        let mut messages = self.messages.all()?;
        messages.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| b.id.cmp(&a.id)));
        Ok(Page::paginate(messages, page, CONTACT_PAGE_SIZE))
    }

    pub fn view(&self, id: ContactId) -> Result<ContactMessage, ContactError> {
        self.messages.mark_read(id).map_err(not_found)
    }

    pub fn delete(&self, id: ContactId) -> Result<(), ContactError> {
        self.messages.remove(id).map_err(not_found)?;
        info!(message_id = %id, "contact message deleted");
        Ok(())
    }

    pub fn submit_quick(&self, draft: QuickMessageDraft) -> Result<QuickMessage, ContactError> {
        let phone = required("phone", &draft.phone, PHONE_MAX_LEN)?;
        let message = required("message", &draft.message, usize::MAX)?;
        Ok(self.messages.insert_quick(QuickMessage {
            id: ContactId(0),
            phone,
            message,
            created_at: Utc::now(),
        })?)
    }

    pub fn list_quick(&self) -> Result<Vec<QuickMessage>, ContactError> {
        let mut messages = self.messages.all_quick()?;
        messages.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| b.id.cmp(&a.id)));
        Ok(messages)
    }
}

fn required(field: &str, value: &str, max_len: usize) -> Result<String, ContactError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ContactError::Invalid(format!("{field} is required")));
    }
    if value.chars().count() > max_len {
        return Err(ContactError::Invalid(format!(
            "{field} must be at most {max_len} characters"
        )));
    }
    Ok(value.to_string())
}

fn not_found(err: RepositoryError) -> ContactError {
    match err {
        RepositoryError::NotFound => ContactError::NotFound,
        other => ContactError::Repository(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contact::InMemoryContactRepository;

    fn service() -> ContactService {
        ContactService::new(Arc::new(InMemoryContactRepository::default()))
    }

    fn draft() -> ContactDraft {
        ContactDraft {
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            subject: "Delivery".to_string(),
            message: "Do you deliver to Kisumu?".to_string(),
        }
    }

    #[test]
    fn submit_validates_fields() {
        let service = service();
        let mut bad_email = draft();
        bad_email.email = "ada-at-example".to_string();
        assert!(matches!(service.submit(bad_email), Err(ContactError::Invalid(_))));

        let mut long_subject = draft();
        long_subject.subject = "x".repeat(SUBJECT_MAX_LEN + 1);
        assert!(matches!(service.submit(long_subject), Err(ContactError::Invalid(_))));

        let stored = service.submit(draft()).expect("valid submission");
        assert!(!stored.is_read);
    }

    #[test]
    fn list_pages_newest_first_and_view_marks_read() {
        let service = service();
        for _ in 0..12 {
            service.submit(draft()).expect("submit");
        }

        let first = service.list(1).expect("page");
        assert_eq!(first.items.len(), CONTACT_PAGE_SIZE);
        assert_eq!(first.total, 12);
        assert_eq!(first.items[0].id, ContactId(12));

        let viewed = service.view(ContactId(3)).expect("view");
        assert!(viewed.is_read);

        service.delete(ContactId(3)).expect("delete");
        assert!(matches!(service.view(ContactId(3)), Err(ContactError::NotFound)));
    }

    #[test]
    fn quick_messages_limit_phone_length() {
        let service = service();
        let too_long = QuickMessageDraft {
            phone: "+2547000000000000".to_string(),
            message: "call me".to_string(),
        };
        assert!(matches!(service.submit_quick(too_long), Err(ContactError::Invalid(_))));

        service
            .submit_quick(QuickMessageDraft {
                phone: "+254700000000".to_string(),
                message: "call me".to_string(),
            })
            .expect("quick message");
        assert_eq!(service.list_quick().expect("list").len(), 1);
    }
}
