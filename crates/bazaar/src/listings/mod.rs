//! Listings across the five marketplace sections: vehicles, houses, electronics, clothing and
//! poultry.

pub(crate) mod catalog;
pub mod domain;
pub mod repository;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use domain::{
    Category, CategoryDraft, ClothingDetails, Condition, ElectronicsDetails, FuelType, Gender,
    HouseDetails, Listing, ListingDetails, ListingDraft, ListingId, ListingImage, ListingKind,
    ListingQuery, ListingRef, ListingSummary, Price, VehicleDetails, VehicleType,
};
pub use repository::{InMemoryListingRepository, ListingRepository};
pub use router::listing_router;
pub use service::ListingService;

use crate::store::RepositoryError;

/// Error raised by the listing service.
#[derive(Debug, thiserror::Error)]
pub enum ListingError {
    #[error("unknown marketplace section '{0}'")]
    UnknownKind(String),
    #[error("listing not found")]
    NotFound,
    #[error("invalid listing: {0}")]
    InvalidDraft(String),
    #[error("details describe a {found} listing, expected {expected}")]
    KindMismatch {
        expected: ListingKind,
        found: ListingKind,
    },
    #[error("unknown category '{0}'")]
    UnknownCategory(String),
    #[error("only the owner can change this listing")]
    NotOwner,
    #[error("not enough stock")]
    OutOfStock,
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
