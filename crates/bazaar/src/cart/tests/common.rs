pub(super) use crate::testing::{
    clothing_draft, electronics_draft, market, member, read_json_body, request,
};

use axum::body::Body;
use axum::http::{HeaderValue, Method, Request};
use serde_json::Value;

use crate::accounts::User;
use crate::cart::{CartSessionKey, CART_SESSION_HEADER};
use crate::listings::{Listing, ListingKind};
use crate::state::Marketplace;

pub(super) fn stocked_listings(market: &Marketplace) -> (User, Listing, Listing) {
    let (owner, _) = member(market, "vendor", "+254766000111");
    let phone = market
        .listings
        .create(&owner, ListingKind::Electronics, electronics_draft("Oppo A5", 12_500, 10))
        .expect("phone");
    let shirt = market
        .listings
        .create(
            &owner,
            ListingKind::Clothing,
            clothing_draft("Kitenge Shirt", 3_000, Some(2_400), 10),
        )
        .expect("shirt");
    (owner, phone, shirt)
}

pub(super) fn guest_request(
    method: Method,
    uri: &str,
    session: &CartSessionKey,
    body: Option<Value>,
) -> Request<Body> {
    let mut built = request(method, uri, None, body);
    built.headers_mut().insert(
        CART_SESSION_HEADER,
        HeaderValue::from_str(session.as_str()).expect("session header"),
    );
    built
}
