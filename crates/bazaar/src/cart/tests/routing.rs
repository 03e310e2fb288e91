use axum::http::{Method, StatusCode};
use serde_json::json;
use tower::ServiceExt;

use super::common::*;
use crate::cart::{CartOwner, CartSessionKey, CART_SESSION_HEADER};

#[tokio::test]
async fn guest_add_issues_a_cart_session() {
    let market = market();
    let (_, phone, _) = stocked_listings(&market);

    let response = market
        .router()
        .oneshot(request(
            Method::POST,
            "/api/v1/cart/items",
            None,
            Some(json!({ "kind": "electronics", "id": phone.id })),
        ))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::CREATED);
    let header = response
        .headers()
        .get(CART_SESSION_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string)
        .expect("session header");
    let payload = read_json_body(response).await;
    assert_eq!(payload["status"], "success");
    assert_eq!(payload["item_count"], 1);
    assert_eq!(payload["session"], header.as_str());

    let session = CartSessionKey::parse(&header).expect("valid key");
    let detail = market
        .router()
        .oneshot(guest_request(Method::GET, "/api/v1/cart", &session, None))
        .await
        .expect("route executes");
    let detail = read_json_body(detail).await;
    assert_eq!(detail["item_count"], 1);
    assert_eq!(detail["display_total"], "$125.00");
}

#[tokio::test]
async fn anonymous_visitor_without_session_sees_empty_cart() {
    let market = market();
    let response = market
        .router()
        .oneshot(request(Method::GET, "/api/v1/cart/count", None, None))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(read_json_body(response).await["count"], 0);
}

#[tokio::test]
async fn quantity_and_removal_routes() {
    let market = market();
    let (_, _, shirt) = stocked_listings(&market);
    let session = CartSessionKey::generate();
    let line = market
        .cart
        .add(&CartOwner::Session(session.clone()), shirt.reference())
        .expect("add");

    let updated = market
        .router()
        .oneshot(guest_request(
            Method::PATCH,
            &format!("/api/v1/cart/items/{}", line.id),
            &session,
            Some(json!({ "quantity": 4 })),
        ))
        .await
        .expect("route executes");
    assert_eq!(updated.status(), StatusCode::OK);
    assert_eq!(read_json_body(updated).await["item"]["quantity"], 4);

    let removed = market
        .router()
        .oneshot(guest_request(
            Method::DELETE,
            &format!("/api/v1/cart/items/{}", line.id),
            &session,
            None,
        ))
        .await
        .expect("route executes");
    assert_eq!(removed.status(), StatusCode::NO_CONTENT);

    let missing = market
        .router()
        .oneshot(guest_request(
            Method::DELETE,
            &format!("/api/v1/cart/items/{}", line.id),
            &session,
            None,
        ))
        .await
        .expect("route executes");
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn login_merges_guest_cart() {
    let market = market();
    let (_, phone, _) = stocked_listings(&market);
    let (buyer, _) = member(&market, "returning", "+254766000444");
    let session = CartSessionKey::generate();
    market
        .cart
        .add(&CartOwner::Session(session.clone()), phone.reference())
        .expect("guest add");

    let response = market
        .router()
        .oneshot(guest_request(
            Method::POST,
            "/api/v1/accounts/login",
            &session,
            Some(json!({ "username": "returning", "phone_number": "+254766000444" })),
        ))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        market
            .cart
            .item_count(&CartOwner::User(buyer.id))
            .expect("count"),
        1
    );
    assert_eq!(
        market
            .cart
            .item_count(&CartOwner::Session(session))
            .expect("guest count"),
        0
    );
}
