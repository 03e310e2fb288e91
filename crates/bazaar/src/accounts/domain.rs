use std::fmt;
use std::sync::OnceLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::AccountError;

pub const USERNAME_MAX_LEN: usize = 30;
pub const BIO_MAX_LEN: usize = 500;
pub const LOCATION_MAX_LEN: usize = 100;
pub const DEFAULT_PROFILE_PICTURE: &str = "profile_pics/default.jpg";
const PICTURE_EXTENSIONS: [&str; 3] = ["jpg", "jpeg", "png"];

/// Identifier wrapper for marketplace accounts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub u64);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Account record. Users sign in with username plus phone number; there is no password.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub phone_number: String,
    pub is_staff: bool,
    pub is_active: bool,
    pub joined_at: DateTime<Utc>,
}

impl User {
    pub fn summary(&self) -> UserSummary {
        UserSummary {
            id: self.id,
            username: self.username.clone(),
        }
    }
}

/// Public profile attached one-to-one to every user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub user_id: UserId,
    pub profile_picture: String,
    pub bio: String,
    pub location: String,
}

impl Profile {
    pub fn empty(user_id: UserId) -> Self {
        Self {
            user_id,
            profile_picture: DEFAULT_PROFILE_PICTURE.to_string(),
            bio: String::new(),
            location: String::new(),
        }
    }
}

/// Fields needed to persist a new account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub username: String,
    pub phone_number: String,
    pub is_staff: bool,
}

/// Registration payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Registration {
    pub username: String,
    pub phone_number: String,
}

/// Login payload; both fields must belong to the same active account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub username: String,
    pub phone_number: String,
}

/// Partial profile edit; absent fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileUpdate {
    #[serde(default)]
    pub profile_picture: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserSummary {
    pub id: UserId,
    pub username: String,
}

/// What other visitors see about a seller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SellerProfile {
    pub id: UserId,
    pub username: String,
    pub joined_at: DateTime<Utc>,
    pub profile: Profile,
}

/// Opaque bearer token handed out on login.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionToken(pub String);

impl SessionToken {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

fn phone_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^\+?1?\d{9,15}$").expect("phone pattern compiles"))
}

pub(crate) fn validate_username(raw: &str) -> Result<String, AccountError> {
    let username = raw.trim();
    if username.is_empty() {
        return Err(AccountError::InvalidUsername("username is required".to_string()));
    }
    if username.chars().count() > USERNAME_MAX_LEN {
        return Err(AccountError::InvalidUsername(format!(
            "username must be at most {USERNAME_MAX_LEN} characters"
        )));
    }
    Ok(username.to_string())
}

pub(crate) fn validate_phone(raw: &str) -> Result<String, AccountError> {
    let phone = raw.trim();
    if phone_pattern().is_match(phone) {
        Ok(phone.to_string())
    } else {
        Err(AccountError::InvalidPhone)
    }
}

impl ProfileUpdate {
    pub(crate) fn apply(self, mut profile: Profile) -> Result<Profile, AccountError> {
        if let Some(bio) = self.bio {
            if bio.chars().count() > BIO_MAX_LEN {
                return Err(AccountError::InvalidProfile(format!(
                    "bio must be at most {BIO_MAX_LEN} characters"
                )));
            }
            profile.bio = bio;
        }

        if let Some(location) = self.location {
            if location.chars().count() > LOCATION_MAX_LEN {
                return Err(AccountError::InvalidProfile(format!(
                    "location must be at most {LOCATION_MAX_LEN} characters"
                )));
            }
            profile.location = location.trim().to_string();
        }

        if let Some(picture) = self.profile_picture {
            let extension = picture
                .rsplit_once('.')
                .map(|(_, ext)| ext.to_ascii_lowercase())
                .unwrap_or_default();
            if !PICTURE_EXTENSIONS.contains(&extension.as_str()) {
                return Err(AccountError::InvalidProfile(
                    "profile picture must be a jpg, jpeg or png file".to_string(),
                ));
            }
            profile.profile_picture = picture;
        }

        Ok(profile)
    }
}
