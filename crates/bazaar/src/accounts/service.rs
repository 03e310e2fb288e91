use std::sync::Arc;

use tracing::info;

use super::domain::{
    validate_phone, validate_username, Credentials, NewUser, Profile, ProfileUpdate,
    Registration, SellerProfile, SessionToken, User, UserId, UserSummary,
};
use super::repository::UserRepository;
use super::sessions::SessionStore;
use super::AccountError;
use crate::store::RepositoryError;

/// Registration, login and profile management.
pub struct AccountService {
    users: Arc<dyn UserRepository>,
    sessions: SessionStore,
}

impl AccountService {
    pub fn new(users: Arc<dyn UserRepository>, sessions: SessionStore) -> Self {
        Self { users, sessions }
    }

    /// Create an account and sign it in straight away.
    pub fn register(
        &self,
        registration: Registration,
    ) -> Result<(User, SessionToken), AccountError> {
        let user = self.create_user(&registration.username, &registration.phone_number, false)?;
        info!(user_id = %user.id, username = %user.username, "account registered");
        let token = self.sessions.open(user.id);
        Ok((user, token))
    }

    pub fn login(&self, credentials: Credentials) -> Result<(User, SessionToken), AccountError> {
        let user = self
            .users
            .find_by_username(credentials.username.trim())?
            .filter(|user| user.phone_number == credentials.phone_number.trim())
            .filter(|user| user.is_active)
            .ok_or(AccountError::InvalidCredentials)?;

        let token = self.sessions.open(user.id);
        info!(user_id = %user.id, "session opened");
        Ok((user, token))
    }

    pub fn logout(&self, token: &str) {
        self.sessions.close(token);
    }

    /// Resolve a bearer token to an active account.
    pub fn authenticate(&self, token: &str) -> Result<User, AccountError> {
        let user_id = self
            .sessions
            .resolve(token)
            .ok_or(AccountError::Unauthenticated)?;
        match self.users.fetch(user_id)? {
            Some(user) if user.is_active => Ok(user),
            _ => {
                self.sessions.close(token);
                Err(AccountError::Unauthenticated)
            }
        }
    }

    pub fn user(&self, id: UserId) -> Result<User, AccountError> {
        self.users.fetch(id)?.ok_or(AccountError::UserNotFound)
    }

    pub fn profile(&self, user: &User) -> Result<Profile, AccountError> {
        Ok(self
            .users
            .profile(user.id)?
            .unwrap_or_else(|| Profile::empty(user.id)))
    }

    pub fn update_profile(
        &self,
        user: &User,
        update: ProfileUpdate,
    ) -> Result<Profile, AccountError> {
        let profile = update.apply(self.profile(user)?)?;
        self.users.save_profile(profile.clone())?;
        Ok(profile)
    }

    pub fn seller_profile(&self, id: UserId) -> Result<SellerProfile, AccountError> {
        let user = self.user(id)?;
        let profile = self.profile(&user)?;
        Ok(SellerProfile {
            id: user.id,
            username: user.username,
            joined_at: user.joined_at,
            profile,
        })
    }

    pub fn list_users(&self) -> Result<Vec<UserSummary>, AccountError> {
        Ok(self.users.all()?.iter().map(User::summary).collect())
    }

    /// Username for display, falling back to the id when the account is gone.
    pub fn display_name(&self, id: UserId) -> String {
        match self.users.fetch(id) {
            Ok(Some(user)) => user.username,
            _ => format!("user-{id}"),
        }
    }

    /// Ensure a staff account exists; returns whether it had to be created. Fails when the
    /// username already belongs to a regular member.
    pub fn ensure_superuser(
        &self,
        username: &str,
        phone_number: &str,
    ) -> Result<(User, bool), AccountError> {
        if let Some(existing) = self.users.find_by_username(username.trim())? {
            if !existing.is_staff {
                return Err(AccountError::SuperuserNameTaken);
            }
            return Ok((existing, false));
        }
        let user = self.create_user(username, phone_number, true)?;
        info!(user_id = %user.id, username = %user.username, "superuser created");
        Ok((user, true))
    }

    /// (total, active) account counts.
    pub fn counts(&self) -> Result<(usize, usize), AccountError> {
        let users = self.users.all()?;
        let active = users.iter().filter(|user| user.is_active).count();
        Ok((users.len(), active))
    }

    fn create_user(
        &self,
        username: &str,
        phone_number: &str,
        is_staff: bool,
    ) -> Result<User, AccountError> {
        let username = validate_username(username)?;
        let phone_number = validate_phone(phone_number)?;

        if self.users.find_by_username(&username)?.is_some() {
            return Err(AccountError::UsernameTaken);
        }
        if self.users.find_by_phone(&phone_number)?.is_some() {
            return Err(AccountError::PhoneTaken);
        }

        match self.users.create(NewUser {
            username: username.clone(),
            phone_number,
            is_staff,
        }) {
            Ok(user) => Ok(user),
            // Lost a race with a concurrent registration; report whichever field clashed.
            Err(RepositoryError::Conflict) => match self.users.find_by_username(&username)? {
                Some(_) => Err(AccountError::UsernameTaken),
                None => Err(AccountError::PhoneTaken),
            },
            Err(other) => Err(AccountError::Repository(other)),
        }
    }
}
