use std::fmt;

use axum::http::HeaderMap;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::accounts::UserId;
use crate::listings::{ListingRef, ListingSummary, Price};

/// Header carrying an anonymous shopper's cart key.
pub const CART_SESSION_HEADER: &str = "x-cart-session";

const SESSION_KEY_MAX_LEN: usize = 64;

/// Opaque key identifying a guest cart.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CartSessionKey(String);

impl CartSessionKey {
    pub fn generate() -> Self {
        Self(Uuid::new_v4().simple().to_string())
    }

    /// Accepts 1-64 ASCII alphanumerics or dashes.
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        let valid = !raw.is_empty()
            && raw.len() <= SESSION_KEY_MAX_LEN
            && raw.chars().all(|c| c.is_ascii_alphanumeric() || c == '-');
        valid.then(|| Self(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CartSessionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Cart session key sent by the client, if any.
pub fn session_from_headers(headers: &HeaderMap) -> Option<CartSessionKey> {
    headers
        .get(CART_SESSION_HEADER)
        .and_then(|value| value.to_str().ok())
        .and_then(CartSessionKey::parse)
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CartOwner {
    User(UserId),
    Session(CartSessionKey),
}

impl fmt::Display for CartOwner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CartOwner::User(id) => write!(f, "user:{id}"),
            CartOwner::Session(key) => write!(f, "session:{key}"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CartItemId(pub u64);

impl fmt::Display for CartItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One line of a cart; a listing appears at most once per cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
    pub id: CartItemId,
    pub listing: ListingRef,
    pub quantity: u32,
    pub added_at: DateTime<Utc>,
}

/// Cart line resolved against its listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CartLine {
    pub id: CartItemId,
    pub listing: ListingSummary,
    pub quantity: u32,
    pub unit_price: Price,
    pub line_total: Price,
    pub added_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CartDetail {
    pub items: Vec<CartLine>,
    pub item_count: usize,
    pub total: Price,
    pub display_total: String,
}

impl CartDetail {
    pub fn empty() -> Self {
        Self {
            items: Vec::new(),
            item_count: 0,
            total: Price::default(),
            display_total: Price::default().to_string(),
        }
    }
}
