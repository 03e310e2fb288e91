use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use bazaar::cart::CART_SESSION_HEADER;
use bazaar::config::MarketConfig;
use bazaar::realtime::{user_group, Event};
use bazaar::Marketplace;
use serde_json::{json, Value};
use tower::ServiceExt;

struct Client {
    router: Router,
}

impl Client {
    fn new(market: &Marketplace) -> Self {
        Self {
            router: market.router(),
        }
    }

    async fn send(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        session: Option<&str>,
        body: Option<Value>,
    ) -> Response {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        if let Some(session) = session {
            builder = builder.header(CART_SESSION_HEADER, session);
        }
        let body = match body {
            Some(value) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(value.to_string())
            }
            None => Body::empty(),
        };
        self.router
            .clone()
            .oneshot(builder.body(body).expect("valid request"))
            .await
            .expect("route executes")
    }
}

async fn json_body(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), 256 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&bytes).expect("json body")
}

async fn register(client: &Client, username: &str, phone: &str, session: Option<&str>) -> Value {
    let response = client
        .send(
            Method::POST,
            "/api/v1/accounts/register",
            None,
            session,
            Some(json!({ "username": username, "phone_number": phone })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::CREATED, "register {username}");
    json_body(response).await
}

#[tokio::test]
async fn guest_shopper_becomes_buyer_and_talks_to_seller() {
    let market = Marketplace::in_memory(&MarketConfig::default());
    let client = Client::new(&market);

    let seller = register(&client, "duka_la_simu", "+254710000001", None).await;
    let seller_token = seller["token"].as_str().expect("seller token").to_string();
    let seller_id = seller["user"]["id"].as_u64().expect("seller id");

    let created = client
        .send(
            Method::POST,
            "/api/v1/listings/electronics",
            Some(&seller_token),
            None,
            Some(json!({
                "title": "Nokia G21",
                "description": "Dual SIM, 128GB",
                "price": 18_500,
                "category": "phones",
                "details": { "kind": "electronics", "condition": "new", "stock": 4 }
            })),
        )
        .await;
    assert_eq!(created.status(), StatusCode::CREATED);
    let listing = json_body(created).await;
    let listing_id = listing["id"].as_u64().expect("listing id");

    let added = client
        .send(
            Method::POST,
            "/api/v1/cart/items",
            None,
            None,
            Some(json!({ "kind": "electronics", "id": listing_id })),
        )
        .await;
    assert_eq!(added.status(), StatusCode::CREATED);
    let session = json_body(added).await["session"]
        .as_str()
        .expect("guest session issued")
        .to_string();

    let again = client
        .send(
            Method::POST,
            "/api/v1/cart/items",
            None,
            Some(&session),
            Some(json!({ "kind": "electronics", "id": listing_id })),
        )
        .await;
    let again = json_body(again).await;
    assert_eq!(again["item"]["quantity"], 2);
    assert!(again.get("session").is_none());

    let buyer = register(&client, "mnunuzi", "+254710000002", Some(&session)).await;
    let buyer_token = buyer["token"].as_str().expect("buyer token").to_string();
    let buyer_id = buyer["user"]["id"].as_u64().expect("buyer id");

    let cart = client
        .send(Method::GET, "/api/v1/cart", Some(&buyer_token), None, None)
        .await;
    let cart = json_body(cart).await;
    assert_eq!(cart["item_count"], 1);
    assert_eq!(cart["items"][0]["quantity"], 2);
    assert_eq!(cart["display_total"], "$370.00");

    let mut seller_events = market.channels.subscribe(&user_group(seller_id));
    let started = client
        .send(
            Method::POST,
            "/api/v1/conversations",
            Some(&buyer_token),
            None,
            Some(json!({
                "listing": { "kind": "electronics", "id": listing_id },
                "content": "Can you deliver to Thika?"
            })),
        )
        .await;
    assert_eq!(started.status(), StatusCode::CREATED);
    let conversation_id = json_body(started).await["conversation"]["id"]
        .as_u64()
        .expect("conversation id");
    match seller_events.try_recv().expect("seller notified") {
        Event::UnreadUpdate {
            conversation_id: notified,
            count,
        } => {
            assert_eq!(notified.0, conversation_id);
            assert_eq!(count, 1);
        }
        other => panic!("expected unread update, got {other:?}"),
    }

    let inbox = client
        .send(Method::GET, "/api/v1/conversations", Some(&seller_token), None, None)
        .await;
    let inbox = json_body(inbox).await;
    assert_eq!(inbox[0]["counterpart"]["id"], buyer_id);
    assert_eq!(inbox[0]["unread_count"], 1);
    assert_eq!(inbox[0]["listing_title"], "Nokia G21");

    let order = client
        .send(
            Method::POST,
            "/api/v1/orders",
            Some(&buyer_token),
            None,
            Some(json!({
                "listing": { "kind": "electronics", "id": listing_id },
                "quantity": 2,
                "shipping_address": "Stage Road, Thika",
                "payment_method": "M-Pesa"
            })),
        )
        .await;
    assert_eq!(order.status(), StatusCode::CREATED);
    assert_eq!(json_body(order).await["total_price"], 37_000);

    let detail = client
        .send(
            Method::GET,
            "/api/v1/listings/electronics/nokia-g21",
            Some(&buyer_token),
            None,
            None,
        )
        .await;
    let detail = json_body(detail).await;
    assert_eq!(detail["details"]["stock"], 2);
    assert_eq!(detail["is_carted"], true);
}

#[tokio::test]
async fn deleting_a_listing_clears_dependents() {
    let market = Marketplace::in_memory(&MarketConfig::default());
    let client = Client::new(&market);

    let seller = register(&client, "wauzaji", "+254720000001", None).await;
    let seller_token = seller["token"].as_str().expect("seller token").to_string();
    let buyer = register(&client, "mteja", "+254720000002", None).await;
    let buyer_token = buyer["token"].as_str().expect("buyer token").to_string();

    let created = client
        .send(
            Method::POST,
            "/api/v1/listings/houses",
            Some(&seller_token),
            None,
            Some(json!({
                "title": "Garden Cottage",
                "description": "Quiet compound with parking",
                "price": 6_500_000,
                "category": "bungalow",
                "details": {
                    "kind": "house",
                    "address": "7 Jacaranda Close",
                    "city": "Kisumu",
                    "state": "Kisumu",
                    "bedrooms": 3,
                    "bathrooms": 2,
                    "area_sqm": 140
                }
            })),
        )
        .await;
    let listing = json_body(created).await;
    let slug = listing["slug"].as_str().expect("slug").to_string();
    assert_eq!(slug, "garden-cottage-kisumu-kisumu");
    let listing_id = listing["id"].as_u64().expect("listing id");

    client
        .send(
            Method::POST,
            "/api/v1/cart/items",
            Some(&buyer_token),
            None,
            Some(json!({ "kind": "house", "id": listing_id })),
        )
        .await;
    client
        .send(
            Method::POST,
            "/api/v1/conversations",
            Some(&buyer_token),
            None,
            Some(json!({
                "listing": { "kind": "house", "id": listing_id },
                "content": "Viewing on Saturday?"
            })),
        )
        .await;

    let forbidden = client
        .send(
            Method::DELETE,
            &format!("/api/v1/listings/houses/{slug}"),
            Some(&buyer_token),
            None,
            None,
        )
        .await;
    assert_eq!(forbidden.status(), StatusCode::FORBIDDEN);

    let deleted = client
        .send(
            Method::DELETE,
            &format!("/api/v1/listings/houses/{slug}"),
            Some(&seller_token),
            None,
            None,
        )
        .await;
    assert_eq!(deleted.status(), StatusCode::NO_CONTENT);

    let count = client
        .send(Method::GET, "/api/v1/cart/count", Some(&buyer_token), None, None)
        .await;
    assert_eq!(json_body(count).await["count"], 0);

    let inbox = client
        .send(Method::GET, "/api/v1/conversations", Some(&buyer_token), None, None)
        .await;
    assert_eq!(json_body(inbox).await, json!([]));

    let home = client
        .send(Method::GET, "/api/v1/home", None, None, None)
        .await;
    let home = json_body(home).await;
    assert_eq!(home["listings"], 0);
    assert_eq!(home["conversations"], 0);
}
