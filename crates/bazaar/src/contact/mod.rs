//! Contact form submissions and the landing page's quick messages.

pub mod repository;
pub mod router;
pub mod service;

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub use repository::{ContactRepository, InMemoryContactRepository};
pub use router::contact_router;
pub use service::ContactService;

use crate::store::RepositoryError;

pub const NAME_MAX_LEN: usize = 100;
pub const SUBJECT_MAX_LEN: usize = 200;
pub const PHONE_MAX_LEN: usize = 15;
pub const CONTACT_PAGE_SIZE: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContactId(pub u64);

impl fmt::Display for ContactId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactMessage {
    pub id: ContactId,
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
    pub created_at: DateTime<Utc>,
    pub is_read: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ContactDraft {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuickMessage {
    pub id: ContactId,
    pub phone: String,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct QuickMessageDraft {
    pub phone: String,
    pub message: String,
}

#[derive(Debug, thiserror::Error)]
pub enum ContactError {
    #[error("invalid submission: {0}")]
    Invalid(String),
    #[error("message not found")]
    NotFound,
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
