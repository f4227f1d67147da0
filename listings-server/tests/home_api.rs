//! Router-level tests over the in-memory store

use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use chrono::Duration;
use serde_json::{json, Value};
use tower::ServiceExt;

use listings_server::db::{HomeStore, MemoryHomeStore};
use listings_server::models::{NewUser, User, UserType};
use listings_server::{build_router, AppState, ServerConfig, TokenKeys};

struct TestApp {
    router: Router,
    tokens: TokenKeys,
    realtor: User,
    rival: User,
    buyer: User,
}

impl TestApp {
    async fn new() -> Self {
        let store = Arc::new(MemoryHomeStore::new());
        let realtor = register(&store, "Rae", UserType::Realtor).await;
        let rival = register(&store, "Rob", UserType::Realtor).await;
        let buyer = register(&store, "Bea", UserType::Buyer).await;

        let tokens = TokenKeys::new("test-secret", Duration::hours(1)).unwrap();
        let state = AppState::new(store, tokens.clone());
        let router = build_router(state, &ServerConfig::default());

        Self {
            router,
            tokens,
            realtor,
            rival,
            buyer,
        }
    }

    async fn send(
        &self,
        method: Method,
        uri: &str,
        user: Option<&User>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut request = Request::builder().method(method).uri(uri);
        if let Some(user) = user {
            let token = self.tokens.issue(user).unwrap();
            request = request.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let body = match body {
            Some(value) => {
                request = request.header(header::CONTENT_TYPE, "application/json");
                Body::from(value.to_string())
            }
            None => Body::empty(),
        };

        let response = self
            .router
            .clone()
            .oneshot(request.body(body).unwrap())
            .await
            .unwrap();

        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, value)
    }

    async fn create_home(&self, city: &str, price: f64, images: &[&str]) -> i64 {
        let (status, body) = self
            .send(
                Method::POST,
                "/home",
                Some(&self.realtor),
                Some(home_body(city, price, images)),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "{body}");
        body["id"].as_i64().unwrap()
    }
}

async fn register(store: &MemoryHomeStore, name: &str, user_type: UserType) -> User {
    store
        .create_user(&NewUser {
            name: name.into(),
            email: format!("{}@example.com", name.to_lowercase()),
            phone: "555-0100".into(),
            user_type,
        })
        .await
        .unwrap()
}

fn home_body(city: &str, price: f64, images: &[&str]) -> Value {
    json!({
        "address": "12 Elm Street",
        "city": city,
        "price": price,
        "numberOfBedrooms": 3,
        "numberOfBathrooms": 2,
        "landSize": 450,
        "propertyType": "RESIDENTIAL",
        "images": images.iter().map(|url| json!({ "url": url })).collect::<Vec<_>>(),
    })
}

#[tokio::test]
async fn health_is_public() {
    let app = TestApp::new().await;
    let (status, body) = app.send(Method::GET, "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["store"], "up");
}

#[tokio::test]
async fn list_filters_by_price_range() {
    let app = TestApp::new().await;
    for price in [90_000.0, 150_000.0, 210_000.0] {
        app.create_home("Toronto", price, &["front.jpg", "back.jpg"]).await;
    }

    let (status, body) = app
        .send(Method::GET, "/home?minPrice=100000&maxPrice=200000", None, None)
        .await;

    assert_eq!(status, StatusCode::OK);
    let homes = body.as_array().unwrap();
    assert_eq!(homes.len(), 1);
    assert_eq!(homes[0]["price"], 150_000.0);
    assert_eq!(homes[0]["image"], "front.jpg");
    assert!(homes[0].get("images").is_none());
}

#[tokio::test]
async fn list_with_no_matches_is_404() {
    let app = TestApp::new().await;
    app.create_home("Toronto", 1.0, &[]).await;

    let (status, body) = app.send(Method::GET, "/home?city=Ottawa", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "not_found");
}

#[tokio::test]
async fn malformed_number_in_query_is_400() {
    let app = TestApp::new().await;
    app.create_home("Toronto", 1.0, &[]).await;

    let (status, body) = app.send(Method::GET, "/home?minPrice=abc", None, None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].as_str().unwrap().contains("minPrice"));
}

#[tokio::test]
async fn undecodable_query_is_json_400() {
    let app = TestApp::new().await;
    app.create_home("Toronto", 1.0, &[]).await;

    let (status, body) = app.send(Method::GET, "/home?city=a&city=b", None, None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "validation_error");
    assert!(body["message"].as_str().unwrap().starts_with("malformed request"));
}

#[tokio::test]
async fn lower_case_property_type_in_query_is_400() {
    let app = TestApp::new().await;
    app.create_home("Toronto", 1.0, &[]).await;

    let (status, body) = app
        .send(Method::GET, "/home?propertyType=residential", None, None)
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "validation_error");

    let (status, body) = app
        .send(Method::GET, "/home?propertyType=RESIDENTIAL", None, None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn detail_returns_every_image() {
    let app = TestApp::new().await;
    let id = app.create_home("Toronto", 1.0, &["a.jpg", "b.jpg"]).await;

    let (status, body) = app.send(Method::GET, &format!("/home/{id}"), None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["images"], json!([{ "url": "a.jpg" }, { "url": "b.jpg" }]));
}

#[tokio::test]
async fn non_numeric_id_is_400() {
    let app = TestApp::new().await;
    let (status, _) = app.send(Method::GET, "/home/abc", None, None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn create_requires_token() {
    let app = TestApp::new().await;
    let (status, _) = app
        .send(Method::POST, "/home", None, Some(home_body("Toronto", 1.0, &[])))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn create_rejects_garbage_token() {
    let app = TestApp::new().await;
    let response = app
        .router
        .clone()
        .oneshot(
            Request::builder()
                .method(Method::POST)
                .uri("/home")
                .header(header::AUTHORIZATION, "Bearer not-a-jwt")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(home_body("Toronto", 1.0, &[]).to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn buyer_cannot_create() {
    let app = TestApp::new().await;
    let (status, _) = app
        .send(
            Method::POST,
            "/home",
            Some(&app.buyer),
            Some(home_body("Toronto", 1.0, &[])),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn create_validates_body() {
    let app = TestApp::new().await;
    let mut body = home_body("Toronto", 1.0, &[]);
    body["price"] = json!(-5);

    let (status, body) = app.send(Method::POST, "/home", Some(&app.realtor), Some(body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "validation_error");
}

#[tokio::test]
async fn create_rejects_unknown_property_type() {
    let app = TestApp::new().await;
    let mut body = home_body("Toronto", 1.0, &[]);
    body["propertyType"] = json!("CASTLE");

    let (status, _) = app.send(Method::POST, "/home", Some(&app.realtor), Some(body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn owner_updates_home() {
    let app = TestApp::new().await;
    let id = app.create_home("Toronto", 1.0, &[]).await;

    let (status, body) = app
        .send(
            Method::PUT,
            &format!("/home/{id}"),
            Some(&app.realtor),
            Some(json!({ "price": 2.5, "city": "Ottawa" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["price"], 2.5);
    assert_eq!(body["city"], "Ottawa");
    assert_eq!(body["address"], "12 Elm Street");
}

#[tokio::test]
async fn rival_update_is_401_and_changes_nothing() {
    let app = TestApp::new().await;
    let id = app.create_home("Toronto", 1.0, &[]).await;

    let (status, _) = app
        .send(
            Method::PUT,
            &format!("/home/{id}"),
            Some(&app.rival),
            Some(json!({ "price": 2.5 })),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (_, body) = app.send(Method::GET, &format!("/home/{id}"), None, None).await;
    assert_eq!(body["price"], 1.0);
}

#[tokio::test]
async fn update_missing_home_is_404() {
    let app = TestApp::new().await;
    let (status, _) = app
        .send(
            Method::PUT,
            "/home/999",
            Some(&app.realtor),
            Some(json!({ "price": 2.5 })),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn rival_delete_is_401_and_home_survives() {
    let app = TestApp::new().await;
    let id = app.create_home("Toronto", 1.0, &[]).await;

    let (status, _) = app
        .send(Method::DELETE, &format!("/home/{id}"), Some(&app.rival), None)
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = app.send(Method::GET, &format!("/home/{id}"), None, None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn owner_deletes_home() {
    let app = TestApp::new().await;
    let id = app.create_home("Toronto", 1.0, &["a.jpg"]).await;

    let (status, body) = app
        .send(Method::DELETE, &format!("/home/{id}"), Some(&app.realtor), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], id);

    let (status, _) = app.send(Method::GET, &format!("/home/{id}"), None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn buyer_inquiry_reaches_realtor() {
    let app = TestApp::new().await;
    let id = app.create_home("Toronto", 1.0, &[]).await;

    let (status, message) = app
        .send(
            Method::POST,
            &format!("/home/{id}/inquire"),
            Some(&app.buyer),
            Some(json!({ "message": "hello" })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(message["message"], "hello");
    assert_eq!(message["homeId"], id);
    assert_eq!(message["buyerId"], app.buyer.id);
    assert_eq!(message["realtorId"], app.realtor.id);

    let (status, inbox) = app
        .send(Method::GET, &format!("/home/{id}/messages"), Some(&app.realtor), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        inbox,
        json!([{
            "message": "hello",
            "buyer": { "name": "Bea", "email": "bea@example.com", "phone": "555-0100" }
        }])
    );

    let (status, inbox) = app
        .send(Method::GET, &format!("/home/{id}/messages"), Some(&app.rival), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(inbox, json!([]));
}

#[tokio::test]
async fn realtor_cannot_inquire() {
    let app = TestApp::new().await;
    let id = app.create_home("Toronto", 1.0, &[]).await;

    let (status, _) = app
        .send(
            Method::POST,
            &format!("/home/{id}/inquire"),
            Some(&app.realtor),
            Some(json!({ "message": "hello" })),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn empty_inquiry_is_400() {
    let app = TestApp::new().await;
    let id = app.create_home("Toronto", 1.0, &[]).await;

    let (status, _) = app
        .send(
            Method::POST,
            &format!("/home/{id}/inquire"),
            Some(&app.buyer),
            Some(json!({ "message": "   " })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn inquiry_on_missing_home_is_404() {
    let app = TestApp::new().await;
    let (status, _) = app
        .send(
            Method::POST,
            "/home/999/inquire",
            Some(&app.buyer),
            Some(json!({ "message": "hello" })),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn messages_for_missing_home_is_404() {
    let app = TestApp::new().await;
    let (status, _) = app
        .send(Method::GET, "/home/999/messages", Some(&app.realtor), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
