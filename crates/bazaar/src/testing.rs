//! Fixtures shared by the per-module test suites.

use axum::body::Body;
use axum::http::{header, Method, Request};
use axum::response::Response;
use serde_json::Value;

use crate::accounts::{Registration, SessionToken, User};
use crate::config::MarketConfig;
use crate::listings::{
    ClothingDetails, Condition, ElectronicsDetails, FuelType, HouseDetails, ListingDetails,
    ListingDraft, Price, VehicleDetails, VehicleType,
};
use crate::state::Marketplace;

pub(crate) fn market() -> Marketplace {
    Marketplace::in_memory(&MarketConfig::default())
}

pub(crate) fn member(market: &Marketplace, username: &str, phone: &str) -> (User, SessionToken) {
    market
        .accounts
        .register(Registration {
            username: username.to_string(),
            phone_number: phone.to_string(),
        })
        .expect("registration succeeds")
}

pub(crate) fn staff(market: &Marketplace) -> (User, SessionToken) {
    let (user, _) = market
        .accounts
        .ensure_superuser("admin", "+15550009999")
        .expect("superuser");
    let (user, token) = market
        .accounts
        .login(crate::accounts::Credentials {
            username: user.username,
            phone_number: user.phone_number,
        })
        .expect("staff login");
    (user, token)
}

pub(crate) fn electronics_draft(title: &str, cents: u64, stock: u32) -> ListingDraft {
    ListingDraft {
        title: title.to_string(),
        description: format!("{title} in great shape"),
        price: Price(cents),
        category: Some("phones".to_string()),
        is_featured: None,
        images: Vec::new(),
        details: ListingDetails::Electronics(ElectronicsDetails {
            condition: Condition::Used,
            stock,
        }),
    }
}

pub(crate) fn vehicle_draft(make: &str, model: &str, year: u16) -> ListingDraft {
    ListingDraft {
        title: String::new(),
        description: "One careful owner".to_string(),
        price: Price(1_250_000),
        category: Some("car".to_string()),
        is_featured: None,
        images: Vec::new(),
        details: ListingDetails::Vehicle(VehicleDetails {
            vehicle_type: VehicleType::Car,
            make: make.to_string(),
            model: model.to_string(),
            year,
            mileage_km: 82_000,
            fuel_type: FuelType::Petrol,
            engine_size: "1.8L".to_string(),
            color: "Silver".to_string(),
        }),
    }
}

pub(crate) fn house_draft(title: &str, city: &str) -> ListingDraft {
    ListingDraft {
        title: title.to_string(),
        description: "Bright rooms near the market".to_string(),
        price: Price(9_500_000),
        category: Some("apartment".to_string()),
        is_featured: None,
        images: Vec::new(),
        details: ListingDetails::House(HouseDetails {
            address: "4 Garden Lane".to_string(),
            city: city.to_string(),
            state: "Nairobi".to_string(),
            bedrooms: 2,
            bathrooms: 1,
            area_sqm: 85,
        }),
    }
}

pub(crate) fn clothing_draft(
    title: &str,
    cents: u64,
    discount: Option<u64>,
    stock: u32,
) -> ListingDraft {
    ListingDraft {
        title: title.to_string(),
        description: "Cotton, machine washable".to_string(),
        price: Price(cents),
        category: Some("men-shirts".to_string()),
        is_featured: None,
        images: Vec::new(),
        details: ListingDetails::Clothing(ClothingDetails {
            brand: "Kitenge Co".to_string(),
            discount_price: discount.map(Price),
            stock_quantity: stock,
        }),
    }
}

pub(crate) fn request(
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let body = match body {
        Some(value) => {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
            Body::from(serde_json::to_vec(&value).expect("serialize body"))
        }
        None => Body::empty(),
    };
    builder.body(body).expect("valid request")
}

pub(crate) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
