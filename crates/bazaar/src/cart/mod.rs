//! Shopping carts keyed by account or anonymous cart session.

pub mod domain;
pub mod repository;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use domain::{
    session_from_headers, CartDetail, CartItem, CartItemId, CartLine, CartOwner, CartSessionKey,
    CART_SESSION_HEADER,
};
pub use repository::{CartRepository, InMemoryCartRepository};
pub use router::cart_router;
pub use service::CartService;

use crate::store::RepositoryError;

#[derive(Debug, thiserror::Error)]
pub enum CartError {
    #[error("listing not found")]
    ListingNotFound,
    #[error("cart item not found")]
    ItemNotFound,
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
