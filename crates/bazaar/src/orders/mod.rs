//! Direct purchase orders against a listing.

pub mod repository;
pub mod router;
pub mod service;

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub use repository::{InMemoryOrderRepository, OrderRepository};
pub use router::order_router;
pub use service::OrderService;

use crate::accounts::UserId;
use crate::listings::{ListingRef, Price};
use crate::store::RepositoryError;

pub const PAYMENT_METHOD_MAX_LEN: usize = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderId(pub u64);

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    #[default]
    Pending,
    Paid,
    Shipped,
    Delivered,
    Cancelled,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub buyer: UserId,
    pub listing: ListingRef,
    pub listing_title: String,
    pub quantity: u32,
    pub unit_price: Price,
    pub total_price: Price,
    pub shipping_address: String,
    pub payment_method: String,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct OrderDraft {
    pub listing: ListingRef,
    #[serde(default = "one")]
    pub quantity: u32,
    pub shipping_address: String,
    pub payment_method: String,
}

fn one() -> u32 {
    1
}

#[derive(Debug, thiserror::Error)]
pub enum OrderError {
    #[error("listing not found")]
    ListingNotFound,
    #[error("you cannot order your own listing")]
    OwnListing,
    #[error("only {available} left in stock")]
    InsufficientStock { available: u32 },
    #[error("invalid order: {0}")]
    Invalid(String),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
