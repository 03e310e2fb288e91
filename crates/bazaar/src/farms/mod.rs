//! Poultry extras: egg sellers with direct orders, the chicken seller directory, veterinary
//! consultants and training enrollment.

pub mod domain;
pub mod repository;
pub mod router;
pub mod service;

pub use domain::{
    Booking, BookingDraft, ChickenDirectory, ChickenSeller, ChickenSellerCard, ChickenSellerDraft,
    ChickenSellerFilter, ChickenSellerId, Consultant, ConsultantDraft, ConsultantView, EggOrder,
    EggOrderDraft, EggSeller, EggSellerDraft, EggSellerFilter, EggSellerId, EnrollmentDraft,
    RequestStatus, SocialLinks, TrainingEnrollment,
};
pub use repository::{FarmRepository, InMemoryFarmRepository};
pub use router::farm_router;
pub use service::FarmService;

use crate::store::RepositoryError;

#[derive(Debug, thiserror::Error)]
pub enum FarmError {
    #[error("egg seller not found")]
    SellerNotFound,
    #[error("this seller is not taking orders")]
    SellerInactive,
    #[error("chicken seller not found")]
    ChickenSellerNotFound,
    #[error("you already have an active seller profile")]
    AlreadyRegistered,
    #[error("only the profile owner or staff can change this seller")]
    NotOwner,
    #[error("minimum order is {minimum} dozen")]
    BelowMinimumOrder { minimum: u32 },
    #[error("consultant not found")]
    ConsultantNotFound,
    #[error("this consultant is not available")]
    ConsultantUnavailable,
    #[error("the selected service is not offered by this consultant")]
    ServiceMismatch,
    #[error("preferred date cannot be in the past")]
    DateInPast,
    #[error("invalid request: {0}")]
    Invalid(String),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
