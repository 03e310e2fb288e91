use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};

use super::{ContactDraft, ContactId, ContactMessage, QuickMessage, QuickMessageDraft};
use crate::accounts::StaffUser;
use crate::error::AppError;
use crate::pagination::{Page, PageParams};
use crate::state::Marketplace;

pub fn contact_router() -> Router<Marketplace> {
    Router::new()
        .route("/api/v1/contact", post(submit_handler))
        .route("/api/v1/contact/messages", get(list_handler))
        .route(
            "/api/v1/contact/messages/{message_id}",
            get(view_handler).delete(delete_handler),
        )
        .route(
            "/api/v1/messages",
            post(quick_submit_handler).get(quick_list_handler),
        )
}

pub(crate) async fn submit_handler(
    State(market): State<Marketplace>,
    Json(draft): Json<ContactDraft>,
) -> Result<impl IntoResponse, AppError> {
    let message = market.contact.submit(draft)?;
    Ok((StatusCode::CREATED, Json(message)))
}

pub(crate) async fn list_handler(
    State(market): State<Marketplace>,
    StaffUser(_staff): StaffUser,
    Query(params): Query<PageParams>,
) -> Result<Json<Page<ContactMessage>>, AppError> {
    Ok(Json(market.contact.list(params.number())?))
}

pub(crate) async fn view_handler(
    State(market): State<Marketplace>,
    StaffUser(_staff): StaffUser,
    Path(message_id): Path<u64>,
) -> Result<Json<ContactMessage>, AppError> {
    Ok(Json(market.contact.view(ContactId(message_id))?))
}

pub(crate) async fn delete_handler(
    State(market): State<Marketplace>,
    StaffUser(_staff): StaffUser,
    Path(message_id): Path<u64>,
) -> Result<StatusCode, AppError> {
    market.contact.delete(ContactId(message_id))?;
    Ok(StatusCode::NO_CONTENT)
}

pub(crate) async fn quick_submit_handler(
    State(market): State<Marketplace>,
    Json(draft): Json<QuickMessageDraft>,
) -> Result<impl IntoResponse, AppError> {
    let message = market.contact.submit_quick(draft)?;
    Ok((StatusCode::CREATED, Json(message)))
}

pub(crate) async fn quick_list_handler(
    State(market): State<Marketplace>,
    StaffUser(_staff): StaffUser,
) -> Result<Json<Vec<QuickMessage>>, AppError> {
    Ok(Json(market.contact.list_quick()?))
}
