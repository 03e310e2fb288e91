//! Multi-category marketplace: listings, carts, per-listing conversations and the realtime
//! notification layer that fans chat traffic out to connected websockets.

pub mod accounts;
pub mod cart;
pub mod config;
pub mod contact;
pub mod conversations;
pub mod error;
pub mod farms;
pub mod home;
pub mod listings;
pub mod orders;
pub mod pagination;
pub mod realtime;
pub mod slug;
pub mod state;
pub mod store;
pub mod telemetry;

#[cfg(test)]
pub(crate) mod testing;

pub use state::Marketplace;
