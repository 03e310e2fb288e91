//! Request extractors that resolve the caller from bearer tokens and cart-session headers.

use axum::extract::{FromRef, FromRequestParts};
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use axum::http::HeaderMap;

use super::domain::User;
use super::AccountError;
use crate::cart::{session_from_headers, CartOwner, CartSessionKey};
use crate::error::AppError;
use crate::state::Marketplace;

/// Bearer token from the `Authorization` header, if present.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

/// A signed-in account; rejects with 401 otherwise.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

impl<S> FromRequestParts<S> for CurrentUser
where
    Marketplace: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let market = Marketplace::from_ref(state);
        let token = bearer_token(&parts.headers).ok_or(AccountError::Unauthenticated)?;
        let user = market.accounts.authenticate(token)?;
        Ok(Self(user))
    }
}

/// A signed-in staff account; rejects with 401 or 403.
#[derive(Debug, Clone)]
pub struct StaffUser(pub User);

impl<S> FromRequestParts<S> for StaffUser
where
    Marketplace: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let CurrentUser(user) = CurrentUser::from_request_parts(parts, state).await?;
        if user.is_staff {
            Ok(Self(user))
        } else {
            Err(AccountError::StaffOnly.into())
        }
    }
}

/// Either a signed-in account or an anonymous shopper identified by cart session.
#[derive(Debug, Clone)]
pub enum Visitor {
    Member(User),
    Guest(Option<CartSessionKey>),
}

impl Visitor {
    pub fn user(&self) -> Option<&User> {
        match self {
            Visitor::Member(user) => Some(user),
            Visitor::Guest(_) => None,
        }
    }

    /// Cart owner for this visitor; `None` for a guest without a session yet.
    pub fn cart_owner(&self) -> Option<CartOwner> {
        match self {
            Visitor::Member(user) => Some(CartOwner::User(user.id)),
            Visitor::Guest(session) => session.clone().map(CartOwner::Session),
        }
    }
}

impl<S> FromRequestParts<S> for Visitor
where
    Marketplace: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        if let Some(token) = bearer_token(&parts.headers) {
            let market = Marketplace::from_ref(state);
            return Ok(Visitor::Member(market.accounts.authenticate(token)?));
        }

        Ok(Visitor::Guest(session_from_headers(&parts.headers)))
    }
}
