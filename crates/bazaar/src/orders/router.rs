use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};

use super::{Order, OrderDraft};
use crate::accounts::CurrentUser;
use crate::error::AppError;
use crate::state::Marketplace;

pub fn order_router() -> Router<Marketplace> {
    Router::new().route("/api/v1/orders", get(mine_handler).post(place_handler))
}

pub(crate) async fn place_handler(
    State(market): State<Marketplace>,
    CurrentUser(user): CurrentUser,
    Json(draft): Json<OrderDraft>,
) -> Result<impl IntoResponse, AppError> {
    let order = market.orders.place(&user, draft)?;
    Ok((StatusCode::CREATED, Json(order)))
}

pub(crate) async fn mine_handler(
    State(market): State<Marketplace>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<Vec<Order>>, AppError> {
    Ok(Json(market.orders.mine(&user)?))
}
