//! Accounts, profiles and bearer-token sessions.

pub mod domain;
pub mod extract;
pub mod repository;
pub mod router;
pub mod service;
pub mod sessions;

#[cfg(test)]
mod tests;

pub use domain::{
    Credentials, Profile, ProfileUpdate, Registration, SellerProfile, SessionToken, User, UserId,
    UserSummary,
};
pub use extract::{CurrentUser, StaffUser, Visitor};
pub use repository::{InMemoryUserRepository, UserRepository};
pub use router::account_router;
pub use service::AccountService;
pub use sessions::SessionStore;

use crate::store::RepositoryError;

/// Error raised by the account service.
#[derive(Debug, thiserror::Error)]
pub enum AccountError {
    #[error("invalid username: {0}")]
    InvalidUsername(String),
    #[error("This username is already taken.")]
    UsernameTaken,
    #[error("the admin username belongs to a non-staff account")]
    SuperuserNameTaken,
    #[error("Phone number must be in format: '+999999999'")]
    InvalidPhone,
    #[error("This phone number is already registered.")]
    PhoneTaken,
    #[error("Invalid username or phone number")]
    InvalidCredentials,
    #[error("authentication required")]
    Unauthenticated,
    #[error("staff access required")]
    StaffOnly,
    #[error("invalid profile: {0}")]
    InvalidProfile(String),
    #[error("user not found")]
    UserNotFound,
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
