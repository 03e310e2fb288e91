use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Serialize;

use super::domain::{
    Conversation, ConversationDetail, ConversationId, ConversationSummary, MessageDraft,
    StartConversation, UnreadSummary,
};
use crate::accounts::CurrentUser;
use crate::error::AppError;
use crate::state::Marketplace;

/// Router builder exposing the inbox and conversation endpoints.
pub fn conversation_router() -> Router<Marketplace> {
    Router::new()
        .route(
            "/api/v1/conversations",
            get(inbox_handler).post(start_handler),
        )
        .route("/api/v1/conversations/unread", get(unread_handler))
        .route(
            "/api/v1/conversations/mark-all-read",
            post(mark_all_read_handler),
        )
        .route("/api/v1/conversations/{conversation_id}", get(detail_handler))
        .route(
            "/api/v1/conversations/{conversation_id}/messages",
            post(post_handler),
        )
        .route(
            "/api/v1/conversations/{conversation_id}/read",
            post(mark_read_handler),
        )
}

#[derive(Debug, Serialize)]
pub struct StartedConversation {
    pub conversation: Conversation,
    pub created: bool,
}

#[derive(Debug, Serialize)]
pub struct MarkedRead {
    pub status: &'static str,
    pub marked: usize,
}

pub(crate) async fn inbox_handler(
    State(market): State<Marketplace>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<Vec<ConversationSummary>>, AppError> {
    Ok(Json(market.conversations.inbox(&user)?))
}

pub(crate) async fn start_handler(
    State(market): State<Marketplace>,
    CurrentUser(user): CurrentUser,
    Json(request): Json<StartConversation>,
) -> Result<impl IntoResponse, AppError> {
    let (conversation, created) =
        market
            .conversations
            .start(&user, request.listing, &request.content)?;
    let status = if created {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    Ok((status, Json(StartedConversation { conversation, created })))
}

pub(crate) async fn detail_handler(
    State(market): State<Marketplace>,
    CurrentUser(user): CurrentUser,
    Path(conversation_id): Path<u64>,
) -> Result<Json<ConversationDetail>, AppError> {
    Ok(Json(
        market
            .conversations
            .detail(&user, ConversationId(conversation_id))?,
    ))
}

pub(crate) async fn post_handler(
    State(market): State<Marketplace>,
    CurrentUser(user): CurrentUser,
    Path(conversation_id): Path<u64>,
    Json(draft): Json<MessageDraft>,
) -> Result<impl IntoResponse, AppError> {
    let message = market
        .conversations
        .post(&user, ConversationId(conversation_id), &draft.content)?;
    Ok((StatusCode::CREATED, Json(message)))
}

pub(crate) async fn unread_handler(
    State(market): State<Marketplace>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<UnreadSummary>, AppError> {
    Ok(Json(market.conversations.unread_summary(&user)?))
}

pub(crate) async fn mark_read_handler(
    State(market): State<Marketplace>,
    CurrentUser(user): CurrentUser,
    Path(conversation_id): Path<u64>,
) -> Result<Json<MarkedRead>, AppError> {
    let marked = market
        .conversations
        .mark_read(&user, ConversationId(conversation_id))?;
    Ok(Json(MarkedRead {
        status: "success",
        marked,
    }))
}

pub(crate) async fn mark_all_read_handler(
    State(market): State<Marketplace>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<MarkedRead>, AppError> {
    let marked = market.conversations.mark_all_read(&user)?;
    Ok(Json(MarkedRead {
        status: "success",
        marked,
    }))
}
