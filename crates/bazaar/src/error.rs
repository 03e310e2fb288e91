use crate::accounts::AccountError;
use crate::cart::CartError;
use crate::config::ConfigError;
use crate::contact::ContactError;
use crate::conversations::ConversationError;
use crate::farms::FarmError;
use crate::listings::ListingError;
use crate::orders::OrderError;
use crate::store::RepositoryError;
use crate::telemetry::TelemetryError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use std::fmt;
use tracing::error;

#[derive(Debug)]
pub enum AppError {
    Config(ConfigError),
    Telemetry(TelemetryError),
    Io(std::io::Error),
    Server(axum::Error),
    Repository(RepositoryError),
    Accounts(AccountError),
    Listings(ListingError),
    Cart(CartError),
    Conversations(ConversationError),
    Contact(ContactError),
    Farms(FarmError),
    Orders(OrderError),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Config(_) | AppError::Telemetry(_) | AppError::Io(_) | AppError::Server(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            AppError::Repository(err) => repository_status(err),
            AppError::Accounts(err) => match err {
                AccountError::InvalidUsername(_)
                | AccountError::InvalidPhone
                | AccountError::InvalidProfile(_) => StatusCode::UNPROCESSABLE_ENTITY,
                AccountError::UsernameTaken
                | AccountError::PhoneTaken
                | AccountError::SuperuserNameTaken => StatusCode::CONFLICT,
                AccountError::InvalidCredentials | AccountError::Unauthenticated => {
                    StatusCode::UNAUTHORIZED
                }
                AccountError::StaffOnly => StatusCode::FORBIDDEN,
                AccountError::UserNotFound => StatusCode::NOT_FOUND,
                AccountError::Repository(err) => repository_status(err),
            },
            AppError::Listings(err) => match err {
                ListingError::UnknownKind(_) | ListingError::NotFound => StatusCode::NOT_FOUND,
                ListingError::InvalidDraft(_)
                | ListingError::KindMismatch { .. }
                | ListingError::UnknownCategory(_) => StatusCode::UNPROCESSABLE_ENTITY,
                ListingError::NotOwner => StatusCode::FORBIDDEN,
                ListingError::OutOfStock => StatusCode::CONFLICT,
                ListingError::Repository(err) => repository_status(err),
            },
            AppError::Cart(err) => match err {
                CartError::ListingNotFound | CartError::ItemNotFound => StatusCode::NOT_FOUND,
                CartError::Repository(err) => repository_status(err),
            },
            AppError::Conversations(err) => match err {
                ConversationError::ListingNotFound | ConversationError::NotFound => {
                    StatusCode::NOT_FOUND
                }
                ConversationError::NotMember => StatusCode::FORBIDDEN,
                ConversationError::CannotMessageSelf | ConversationError::EmptyMessage => {
                    StatusCode::UNPROCESSABLE_ENTITY
                }
                ConversationError::Repository(err) => repository_status(err),
            },
            AppError::Contact(err) => match err {
                ContactError::Invalid(_) => StatusCode::UNPROCESSABLE_ENTITY,
                ContactError::NotFound => StatusCode::NOT_FOUND,
                ContactError::Repository(err) => repository_status(err),
            },
            AppError::Farms(err) => match err {
                FarmError::SellerNotFound
                | FarmError::ChickenSellerNotFound
                | FarmError::ConsultantNotFound => StatusCode::NOT_FOUND,
                FarmError::SellerInactive
                | FarmError::ConsultantUnavailable
                | FarmError::AlreadyRegistered => StatusCode::CONFLICT,
                FarmError::NotOwner => StatusCode::FORBIDDEN,
                FarmError::BelowMinimumOrder { .. }
                | FarmError::ServiceMismatch
                | FarmError::DateInPast
                | FarmError::Invalid(_) => StatusCode::UNPROCESSABLE_ENTITY,
                FarmError::Repository(err) => repository_status(err),
            },
            AppError::Orders(err) => match err {
                OrderError::ListingNotFound => StatusCode::NOT_FOUND,
                OrderError::OwnListing => StatusCode::FORBIDDEN,
                OrderError::InsufficientStock { .. } => StatusCode::CONFLICT,
                OrderError::Invalid(_) => StatusCode::UNPROCESSABLE_ENTITY,
                OrderError::Repository(err) => repository_status(err),
            },
        }
    }
}

fn repository_status(err: &RepositoryError) -> StatusCode {
    match err {
        RepositoryError::Conflict => StatusCode::CONFLICT,
        RepositoryError::NotFound => StatusCode::NOT_FOUND,
        RepositoryError::Unavailable(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(err) => write!(f, "configuration error: {}", err),
            AppError::Telemetry(err) => write!(f, "telemetry error: {}", err),
            AppError::Io(err) => write!(f, "io error: {}", err),
            AppError::Server(err) => write!(f, "server error: {}", err),
            AppError::Repository(err) => write!(f, "{}", err),
            AppError::Accounts(err) => write!(f, "{}", err),
            AppError::Listings(err) => write!(f, "{}", err),
            AppError::Cart(err) => write!(f, "{}", err),
            AppError::Conversations(err) => write!(f, "{}", err),
            AppError::Contact(err) => write!(f, "{}", err),
            AppError::Farms(err) => write!(f, "{}", err),
            AppError::Orders(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Config(err) => Some(err),
            AppError::Telemetry(err) => Some(err),
            AppError::Io(err) => Some(err),
            AppError::Server(err) => Some(err),
            AppError::Repository(err) => Some(err),
            AppError::Accounts(err) => Some(err),
            AppError::Listings(err) => Some(err),
            AppError::Cart(err) => Some(err),
            AppError::Conversations(err) => Some(err),
            AppError::Contact(err) => Some(err),
            AppError::Farms(err) => Some(err),
            AppError::Orders(err) => Some(err),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(error = %self, "request failed");
        }

        let body = Json(json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}

macro_rules! from_error {
    ($($source:ty => $variant:ident),+ $(,)?) => {
        $(
            impl From<$source> for AppError {
                fn from(value: $source) -> Self {
                    Self::$variant(value)
                }
            }
        )+
    };
}

from_error! {
    ConfigError => Config,
    TelemetryError => Telemetry,
    std::io::Error => Io,
    axum::Error => Server,
    RepositoryError => Repository,
    AccountError => Accounts,
    ListingError => Listings,
    CartError => Cart,
    ConversationError => Conversations,
    ContactError => Contact,
    FarmError => Farms,
    OrderError => Orders,
}
