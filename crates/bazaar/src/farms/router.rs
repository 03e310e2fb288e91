use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::Utc;

use super::domain::{
    BookingDraft, ChickenDirectory, ChickenSeller, ChickenSellerDraft, ChickenSellerFilter,
    ChickenSellerId, ConsultantDraft, ConsultantId, ConsultantView, EggOrder, EggOrderDraft,
    EggSeller, EggSellerDraft, EggSellerFilter, EggSellerId, EnrollmentDraft, TrainingEnrollment,
};
use crate::accounts::{CurrentUser, StaffUser};
use crate::error::AppError;
use crate::state::Marketplace;

pub fn farm_router() -> Router<Marketplace> {
    Router::new()
        .route(
            "/api/v1/farms/egg-sellers",
            get(search_handler).post(create_seller_handler),
        )
        .route(
            "/api/v1/farms/egg-sellers/{seller_id}",
            get(seller_handler)
                .put(update_seller_handler)
                .delete(delete_seller_handler),
        )
        .route(
            "/api/v1/farms/egg-sellers/{seller_id}/orders",
            get(orders_handler).post(place_order_handler),
        )
        .route(
            "/api/v1/farms/chicken-sellers",
            get(chicken_directory_handler).post(register_chicken_seller_handler),
        )
        .route(
            "/api/v1/farms/chicken-sellers/{seller_id}",
            get(chicken_seller_handler)
                .put(update_chicken_seller_handler)
                .delete(deactivate_chicken_seller_handler),
        )
        .route(
            "/api/v1/farms/trainings",
            get(trainees_handler).post(enroll_handler),
        )
        .route(
            "/api/v1/farms/consultants",
            get(consultants_handler).post(add_consultant_handler),
        )
        .route(
            "/api/v1/farms/consultants/{consultant_id}/bookings",
            post(book_handler),
        )
}

pub(crate) async fn search_handler(
    State(market): State<Marketplace>,
    Query(filter): Query<EggSellerFilter>,
) -> Result<Json<Vec<EggSeller>>, AppError> {
    Ok(Json(market.farms.search(&filter)?))
}

pub(crate) async fn create_seller_handler(
    State(market): State<Marketplace>,
    StaffUser(_staff): StaffUser,
    Json(draft): Json<EggSellerDraft>,
) -> Result<impl IntoResponse, AppError> {
    let seller = market.farms.create_seller(draft)?;
    Ok((StatusCode::CREATED, Json(seller)))
}

pub(crate) async fn seller_handler(
    State(market): State<Marketplace>,
    Path(seller_id): Path<u64>,
) -> Result<Json<EggSeller>, AppError> {
    Ok(Json(market.farms.seller(EggSellerId(seller_id))?))
}

pub(crate) async fn update_seller_handler(
    State(market): State<Marketplace>,
    StaffUser(_staff): StaffUser,
    Path(seller_id): Path<u64>,
    Json(draft): Json<EggSellerDraft>,
) -> Result<Json<EggSeller>, AppError> {
    Ok(Json(
        market.farms.update_seller(EggSellerId(seller_id), draft)?,
    ))
}

pub(crate) async fn delete_seller_handler(
    State(market): State<Marketplace>,
    StaffUser(_staff): StaffUser,
    Path(seller_id): Path<u64>,
) -> Result<StatusCode, AppError> {
    market.farms.delete_seller(EggSellerId(seller_id))?;
    Ok(StatusCode::NO_CONTENT)
}

pub(crate) async fn place_order_handler(
    State(market): State<Marketplace>,
    Path(seller_id): Path<u64>,
    Json(draft): Json<EggOrderDraft>,
) -> Result<impl IntoResponse, AppError> {
    let order = market.farms.place_order(EggSellerId(seller_id), draft)?;
    Ok((StatusCode::CREATED, Json(order)))
}

pub(crate) async fn orders_handler(
    State(market): State<Marketplace>,
    StaffUser(_staff): StaffUser,
    Path(seller_id): Path<u64>,
) -> Result<Json<Vec<EggOrder>>, AppError> {
    Ok(Json(market.farms.orders_for(EggSellerId(seller_id))?))
}

pub(crate) async fn consultants_handler(
    State(market): State<Marketplace>,
) -> Result<Json<Vec<ConsultantView>>, AppError> {
    Ok(Json(market.farms.available_consultants()?))
}

pub(crate) async fn add_consultant_handler(
    State(market): State<Marketplace>,
    StaffUser(_staff): StaffUser,
    Json(draft): Json<ConsultantDraft>,
) -> Result<impl IntoResponse, AppError> {
    let consultant = market.farms.add_consultant(draft)?;
    Ok((StatusCode::CREATED, Json(consultant)))
}

pub(crate) async fn book_handler(
    State(market): State<Marketplace>,
    Path(consultant_id): Path<u64>,
    Json(draft): Json<BookingDraft>,
) -> Result<impl IntoResponse, AppError> {
    let today = Utc::now().date_naive();
    let booking = market
        .farms
        .book(ConsultantId(consultant_id), draft, today)?;
    Ok((StatusCode::CREATED, Json(booking)))
}

pub(crate) async fn chicken_directory_handler(
    State(market): State<Marketplace>,
    Query(filter): Query<ChickenSellerFilter>,
) -> Result<Json<ChickenDirectory>, AppError> {
    Ok(Json(market.farms.chicken_directory(&filter)?))
}

pub(crate) async fn register_chicken_seller_handler(
    State(market): State<Marketplace>,
    CurrentUser(user): CurrentUser,
    Json(draft): Json<ChickenSellerDraft>,
) -> Result<impl IntoResponse, AppError> {
    let seller = market.farms.register_chicken_seller(&user, draft)?;
    Ok((StatusCode::CREATED, Json(seller)))
}

pub(crate) async fn chicken_seller_handler(
    State(market): State<Marketplace>,
    Path(seller_id): Path<u64>,
) -> Result<Json<ChickenSeller>, AppError> {
    Ok(Json(
        market.farms.chicken_seller(ChickenSellerId(seller_id))?,
    ))
}

pub(crate) async fn update_chicken_seller_handler(
    State(market): State<Marketplace>,
    CurrentUser(user): CurrentUser,
    Path(seller_id): Path<u64>,
    Json(draft): Json<ChickenSellerDraft>,
) -> Result<Json<ChickenSeller>, AppError> {
    Ok(Json(market.farms.update_chicken_seller(
        &user,
        ChickenSellerId(seller_id),
        draft,
    )?))
}

pub(crate) async fn deactivate_chicken_seller_handler(
    State(market): State<Marketplace>,
    CurrentUser(user): CurrentUser,
    Path(seller_id): Path<u64>,
) -> Result<StatusCode, AppError> {
    market
        .farms
        .deactivate_chicken_seller(&user, ChickenSellerId(seller_id))?;
    Ok(StatusCode::NO_CONTENT)
}

pub(crate) async fn enroll_handler(
    State(market): State<Marketplace>,
    Json(draft): Json<EnrollmentDraft>,
) -> Result<impl IntoResponse, AppError> {
    let enrollment = market.farms.enroll(draft)?;
    Ok((StatusCode::CREATED, Json(enrollment)))
}

pub(crate) async fn trainees_handler(
    State(market): State<Marketplace>,
    StaffUser(_staff): StaffUser,
) -> Result<Json<Vec<TrainingEnrollment>>, AppError> {
    Ok(Json(market.farms.trainees()?))
}
