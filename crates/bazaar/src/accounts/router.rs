use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post, put};
use axum::{Json, Router};
use serde::Serialize;

use super::domain::{
    Credentials, Profile, ProfileUpdate, Registration, SellerProfile, SessionToken, User, UserId,
    UserSummary,
};
use super::extract::{bearer_token, CurrentUser};
use crate::cart::session_from_headers;
use crate::error::AppError;
use crate::listings::ListingSummary;
use crate::state::Marketplace;

/// Router builder exposing registration, login and profile endpoints.
pub fn account_router() -> Router<Marketplace> {
    Router::new()
        .route("/api/v1/accounts/register", post(register_handler))
        .route("/api/v1/accounts/login", post(login_handler))
        .route("/api/v1/accounts/logout", post(logout_handler))
        .route("/api/v1/accounts/me", get(me_handler))
        .route("/api/v1/accounts/me/profile", put(update_profile_handler))
        .route("/api/v1/accounts/users", get(users_handler))
        .route("/api/v1/accounts/users/{user_id}", get(seller_handler))
}

#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub user: User,
    pub token: SessionToken,
}

#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub user: User,
    pub profile: Profile,
}

#[derive(Debug, Serialize)]
pub struct SellerResponse {
    #[serde(flatten)]
    pub seller: SellerProfile,
    pub listings: Vec<ListingSummary>,
}

pub(crate) async fn register_handler(
    State(market): State<Marketplace>,
    headers: HeaderMap,
    Json(registration): Json<Registration>,
) -> Result<impl IntoResponse, AppError> {
    let (user, token) = market.accounts.register(registration)?;
    if let Some(session) = session_from_headers(&headers) {
        market.cart.merge(&session, user.id)?;
    }
    Ok((StatusCode::CREATED, Json(SessionResponse { user, token })))
}

pub(crate) async fn login_handler(
    State(market): State<Marketplace>,
    headers: HeaderMap,
    Json(credentials): Json<Credentials>,
) -> Result<Json<SessionResponse>, AppError> {
    let (user, token) = market.accounts.login(credentials)?;
    if let Some(session) = session_from_headers(&headers) {
        market.cart.merge(&session, user.id)?;
    }
    Ok(Json(SessionResponse { user, token }))
}

pub(crate) async fn logout_handler(
    State(market): State<Marketplace>,
    headers: HeaderMap,
) -> StatusCode {
    if let Some(token) = bearer_token(&headers) {
        market.accounts.logout(token);
    }
    StatusCode::NO_CONTENT
}

pub(crate) async fn me_handler(
    State(market): State<Marketplace>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<MeResponse>, AppError> {
    let profile = market.accounts.profile(&user)?;
    Ok(Json(MeResponse { user, profile }))
}

pub(crate) async fn update_profile_handler(
    State(market): State<Marketplace>,
    CurrentUser(user): CurrentUser,
    Json(update): Json<ProfileUpdate>,
) -> Result<Json<Profile>, AppError> {
    Ok(Json(market.accounts.update_profile(&user, update)?))
}

pub(crate) async fn users_handler(
    State(market): State<Marketplace>,
    CurrentUser(_user): CurrentUser,
) -> Result<Json<Vec<UserSummary>>, AppError> {
    Ok(Json(market.accounts.list_users()?))
}

pub(crate) async fn seller_handler(
    State(market): State<Marketplace>,
    Path(user_id): Path<u64>,
) -> Result<Json<SellerResponse>, AppError> {
    let seller = market.accounts.seller_profile(UserId(user_id))?;
    let listings = market.listings.by_owner(seller.id)?;
    Ok(Json(SellerResponse { seller, listings }))
}
