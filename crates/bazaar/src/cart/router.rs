use axum::extract::{Path, State};
use axum::http::{HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, patch, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};

use super::domain::{CartDetail, CartItem, CartItemId, CartOwner, CartSessionKey, CART_SESSION_HEADER};
use super::CartError;
use crate::accounts::Visitor;
use crate::error::AppError;
use crate::listings::{ListingId, ListingKind, ListingRef};
use crate::state::Marketplace;

/// Router builder exposing cart inspection and line management.
pub fn cart_router() -> Router<Marketplace> {
    Router::new()
        .route("/api/v1/cart", get(detail_handler))
        .route("/api/v1/cart/count", get(count_handler))
        .route("/api/v1/cart/items", post(add_handler))
        .route(
            "/api/v1/cart/items/{item_id}",
            patch(quantity_handler).delete(remove_handler),
        )
}

#[derive(Debug, Clone, Deserialize)]
pub struct AddToCart {
    pub kind: ListingKind,
    pub id: ListingId,
}

#[derive(Debug, Clone, Deserialize)]
pub struct QuantityUpdate {
    pub quantity: u32,
}

#[derive(Debug, Serialize)]
pub struct CartLineResponse {
    pub status: &'static str,
    pub item: Option<CartItem>,
    pub item_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session: Option<CartSessionKey>,
}

#[derive(Debug, Serialize)]
pub struct CartCount {
    pub count: usize,
}

pub(crate) async fn detail_handler(
    State(market): State<Marketplace>,
    visitor: Visitor,
) -> Result<Json<CartDetail>, AppError> {
    let detail = match visitor.cart_owner() {
        Some(owner) => market.cart.detail(&owner)?,
        None => CartDetail::empty(),
    };
    Ok(Json(detail))
}

pub(crate) async fn count_handler(
    State(market): State<Marketplace>,
    visitor: Visitor,
) -> Result<Json<CartCount>, AppError> {
    let count = match visitor.cart_owner() {
        Some(owner) => market.cart.item_count(&owner)?,
        None => 0,
    };
    Ok(Json(CartCount { count }))
}

pub(crate) async fn add_handler(
    State(market): State<Marketplace>,
    visitor: Visitor,
    Json(request): Json<AddToCart>,
) -> Result<Response, AppError> {
    let (owner, issued) = match visitor.cart_owner() {
        Some(owner) => (owner, None),
        None => {
            let key = CartSessionKey::generate();
            (CartOwner::Session(key.clone()), Some(key))
        }
    };

    let listing = ListingRef {
        kind: request.kind,
        id: request.id,
    };
    let item = market.cart.add(&owner, listing)?;
    let item_count = market.cart.item_count(&owner)?;

    let body = CartLineResponse {
        status: "success",
        item: Some(item),
        item_count,
        session: issued.clone(),
    };
    let mut response = (StatusCode::CREATED, Json(body)).into_response();
    if let Some(key) = issued {
        if let Ok(value) = HeaderValue::from_str(key.as_str()) {
            response.headers_mut().insert(CART_SESSION_HEADER, value);
        }
    }
    Ok(response)
}

pub(crate) async fn quantity_handler(
    State(market): State<Marketplace>,
    visitor: Visitor,
    Path(item_id): Path<u64>,
    Json(update): Json<QuantityUpdate>,
) -> Result<Json<CartLineResponse>, AppError> {
    let owner = visitor.cart_owner().ok_or(CartError::ItemNotFound)?;
    let item = market
        .cart
        .set_quantity(&owner, CartItemId(item_id), update.quantity)?;
    Ok(Json(CartLineResponse {
        status: "success",
        item,
        item_count: market.cart.item_count(&owner)?,
        session: None,
    }))
}

pub(crate) async fn remove_handler(
    State(market): State<Marketplace>,
    visitor: Visitor,
    Path(item_id): Path<u64>,
) -> Result<StatusCode, AppError> {
    let owner = visitor.cart_owner().ok_or(CartError::ItemNotFound)?;
    market.cart.remove(&owner, CartItemId(item_id))?;
    Ok(StatusCode::NO_CONTENT)
}
