use std::collections::HashSet;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Serialize;
use serde_json::json;

use super::domain::{
    CategoryDraft, Listing, ListingDraft, ListingId, ListingImage, ListingKind, ListingQuery,
    ListingSummary, Price,
};
use super::ListingError;
use crate::accounts::{CurrentUser, StaffUser, Visitor};
use crate::error::AppError;
use crate::pagination::Page;
use crate::state::Marketplace;

/// Router builder exposing section browsing, listing CRUD and engagement counters.
pub fn listing_router() -> Router<Marketplace> {
    Router::new()
        .route(
            "/api/v1/listings/{kind}",
            get(list_handler).post(create_handler),
        )
        .route(
            "/api/v1/listings/{kind}/categories",
            get(categories_handler).post(add_category_handler),
        )
        .route(
            "/api/v1/listings/{kind}/{slug}",
            get(detail_handler)
                .put(update_handler)
                .delete(delete_handler),
        )
        .route("/api/v1/listings/{kind}/{slug}/like", post(like_handler))
        .route("/api/v1/listings/{kind}/{slug}/share", post(share_handler))
        .route("/api/v1/listings/{kind}/{slug}/images", post(image_handler))
}

/// Full listing plus the derived fields detail pages need.
#[derive(Debug, Serialize)]
pub struct ListingView {
    #[serde(flatten)]
    pub listing: Listing,
    pub display_price: String,
    pub current_price: Price,
    pub is_on_sale: bool,
    pub is_carted: bool,
    pub related: Vec<ListingSummary>,
}

pub(crate) fn parse_kind(segment: &str) -> Result<ListingKind, ListingError> {
    ListingKind::from_segment(segment).ok_or_else(|| ListingError::UnknownKind(segment.to_string()))
}

fn carted_ids(
    market: &Marketplace,
    visitor: &Visitor,
    kind: ListingKind,
) -> Result<HashSet<ListingId>, AppError> {
    match visitor.cart_owner() {
        Some(owner) => Ok(market.cart.carted(&owner, kind)?),
        None => Ok(HashSet::new()),
    }
}

pub(crate) async fn list_handler(
    State(market): State<Marketplace>,
    visitor: Visitor,
    Path(kind): Path<String>,
    Query(query): Query<ListingQuery>,
) -> Result<Json<Page<ListingSummary>>, AppError> {
    let kind = parse_kind(&kind)?;
    let carted = carted_ids(&market, &visitor, kind)?;
    let page = market.listings.list(kind, &query)?.map(|listing| {
        let mut summary = listing.summary();
        summary.is_carted = carted.contains(&listing.id);
        summary
    });
    Ok(Json(page))
}

pub(crate) async fn create_handler(
    State(market): State<Marketplace>,
    CurrentUser(user): CurrentUser,
    Path(kind): Path<String>,
    Json(draft): Json<ListingDraft>,
) -> Result<impl IntoResponse, AppError> {
    let kind = parse_kind(&kind)?;
    let listing = market.listings.create(&user, kind, draft)?;
    Ok((StatusCode::CREATED, Json(listing)))
}

pub(crate) async fn detail_handler(
    State(market): State<Marketplace>,
    visitor: Visitor,
    Path((kind, slug)): Path<(String, String)>,
) -> Result<Json<ListingView>, AppError> {
    let kind = parse_kind(&kind)?;
    let listing = market.listings.get(kind, &slug)?;
    let carted = carted_ids(&market, &visitor, kind)?;
    let related = market.listings.related(&listing)?;

    Ok(Json(ListingView {
        display_price: listing.current_price().to_string(),
        current_price: listing.current_price(),
        is_on_sale: listing.is_on_sale(),
        is_carted: carted.contains(&listing.id),
        related,
        listing,
    }))
}

pub(crate) async fn update_handler(
    State(market): State<Marketplace>,
    CurrentUser(user): CurrentUser,
    Path((kind, slug)): Path<(String, String)>,
    Json(draft): Json<ListingDraft>,
) -> Result<Json<Listing>, AppError> {
    let kind = parse_kind(&kind)?;
    Ok(Json(market.listings.update(&user, kind, &slug, draft)?))
}

pub(crate) async fn delete_handler(
    State(market): State<Marketplace>,
    CurrentUser(user): CurrentUser,
    Path((kind, slug)): Path<(String, String)>,
) -> Result<StatusCode, AppError> {
    let kind = parse_kind(&kind)?;
    market.remove_listing(&user, kind, &slug)?;
    Ok(StatusCode::NO_CONTENT)
}

pub(crate) async fn like_handler(
    State(market): State<Marketplace>,
    Path((kind, slug)): Path<(String, String)>,
) -> Result<Json<serde_json::Value>, AppError> {
    let kind = parse_kind(&kind)?;
    let like_count = market.listings.like(kind, &slug)?;
    Ok(Json(json!({ "status": "success", "slug": slug, "like_count": like_count })))
}

pub(crate) async fn share_handler(
    State(market): State<Marketplace>,
    Path((kind, slug)): Path<(String, String)>,
) -> Result<Json<serde_json::Value>, AppError> {
    let kind = parse_kind(&kind)?;
    let share_count = market.listings.share(kind, &slug)?;
    Ok(Json(json!({ "status": "success", "slug": slug, "share_count": share_count })))
}

pub(crate) async fn image_handler(
    State(market): State<Marketplace>,
    CurrentUser(user): CurrentUser,
    Path((kind, slug)): Path<(String, String)>,
    Json(image): Json<ListingImage>,
) -> Result<Json<Listing>, AppError> {
    let kind = parse_kind(&kind)?;
    Ok(Json(market.listings.add_image(&user, kind, &slug, image)?))
}

pub(crate) async fn categories_handler(
    State(market): State<Marketplace>,
    Path(kind): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let kind = parse_kind(&kind)?;
    Ok(Json(market.listings.categories(kind)?))
}

pub(crate) async fn add_category_handler(
    State(market): State<Marketplace>,
    StaffUser(_staff): StaffUser,
    Path(kind): Path<String>,
    Json(draft): Json<CategoryDraft>,
) -> Result<impl IntoResponse, AppError> {
    let kind = parse_kind(&kind)?;
    let category = market.listings.add_category(kind, draft)?;
    Ok((StatusCode::CREATED, Json(category)))
}
