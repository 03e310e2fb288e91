use std::collections::BTreeMap;
use std::sync::Mutex;

use chrono::Utc;

use super::domain::{NewUser, Profile, User, UserId};
use crate::store::{lock, RepositoryError, Sequence};

/// Storage abstraction for accounts and their profiles.
pub trait UserRepository: Send + Sync {
    /// Persist a new user together with an empty profile.
    fn create(&self, user: NewUser) -> Result<User, RepositoryError>;
    fn fetch(&self, id: UserId) -> Result<Option<User>, RepositoryError>;
    /// Case-insensitive username lookup.
    fn find_by_username(&self, username: &str) -> Result<Option<User>, RepositoryError>;
    fn find_by_phone(&self, phone_number: &str) -> Result<Option<User>, RepositoryError>;
    fn all(&self) -> Result<Vec<User>, RepositoryError>;
    fn profile(&self, id: UserId) -> Result<Option<Profile>, RepositoryError>;
    fn save_profile(&self, profile: Profile) -> Result<(), RepositoryError>;
}

#[derive(Default)]
pub struct InMemoryUserRepository {
    users: Mutex<BTreeMap<UserId, User>>,
    profiles: Mutex<BTreeMap<UserId, Profile>>,
    sequence: Sequence,
}

impl UserRepository for InMemoryUserRepository {
    fn create(&self, user: NewUser) -> Result<User, RepositoryError> {
        let mut users = lock(&self.users, "users")?;
        let clash = users.values().any(|existing| {
            existing.username.eq_ignore_ascii_case(&user.username)
                || existing.phone_number == user.phone_number
        });
        if clash {
            return Err(RepositoryError::Conflict);
        }

        let id = UserId(self.sequence.next());
        let record = User {
            id,
            username: user.username,
            phone_number: user.phone_number,
            is_staff: user.is_staff,
            is_active: true,
            joined_at: Utc::now(),
        };
        users.insert(id, record.clone());
        lock(&self.profiles, "profiles")?.insert(id, Profile::empty(id));
        Ok(record)
    }

    fn fetch(&self, id: UserId) -> Result<Option<User>, RepositoryError> {
        Ok(lock(&self.users, "users")?.get(&id).cloned())
    }

    fn find_by_username(&self, username: &str) -> Result<Option<User>, RepositoryError> {
        Ok(lock(&self.users, "users")?
            .values()
            .find(|user| user.username.eq_ignore_ascii_case(username))
            .cloned())
    }

    fn find_by_phone(&self, phone_number: &str) -> Result<Option<User>, RepositoryError> {
        Ok(lock(&self.users, "users")?
            .values()
            .find(|user| user.phone_number == phone_number)
            .cloned())
    }

    fn all(&self) -> Result<Vec<User>, RepositoryError> {
        Ok(lock(&self.users, "users")?.values().cloned().collect())
    }

    fn profile(&self, id: UserId) -> Result<Option<Profile>, RepositoryError> {
        Ok(lock(&self.profiles, "profiles")?.get(&id).cloned())
    }

    fn save_profile(&self, profile: Profile) -> Result<(), RepositoryError> {
        let mut profiles = lock(&self.profiles, "profiles")?;
        match profiles.get_mut(&profile.user_id) {
            Some(slot) => {
                *slot = profile;
                Ok(())
            }
            None => Err(RepositoryError::NotFound),
        }
    }
}
