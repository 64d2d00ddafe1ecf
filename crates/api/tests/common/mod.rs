#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;

use frond_api::config::ServerConfig;
use frond_api::router::build_app_router;
use frond_api::state::AppState;
use frond_core::types::DbId;
use frond_db::models::customer::CreateCustomer;
use frond_db::models::plant::CreatePlant;
use frond_db::repositories::{CustomerRepo, PlantRepo};

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 30,
        public_base_url: "https://plants.example.com".to_string(),
        database_max_connections: 5,
    }
}

/// Build the full application router with all middleware layers, using the
/// given database pool. Same construction as the production binary.
pub fn build_test_app(pool: PgPool) -> Router {
    let config = test_config();
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
    };
    build_app_router(state, &config)
}

async fn send(app: Router, method: Method, uri: &str, body: Option<serde_json::Value>) -> Response<Body> {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_vec(&json).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::GET, uri, None).await
}

pub async fn delete(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::DELETE, uri, None).await
}

/// POST without a body, for action endpoints.
pub async fn post(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::POST, uri, None).await
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    send(app, Method::POST, uri, Some(body)).await
}

pub async fn put_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    send(app, Method::PUT, uri, Some(body)).await
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

// ---------------------------------------------------------------------------
// Seed data
// ---------------------------------------------------------------------------

/// Insert a customer and return its id.
pub async fn seed_customer(pool: &PgPool) -> DbId {
    CustomerRepo::create(
        pool,
        &CreateCustomer {
            name: "Mira Leaf".to_string(),
            email: Some("mira@example.com".to_string()),
        },
    )
    .await
    .unwrap()
    .id
}

/// Insert `count` catalog plants and return their ids.
pub async fn seed_plants(pool: &PgPool, count: usize) -> Vec<DbId> {
    let mut ids = Vec::with_capacity(count);
    for n in 0..count {
        let plant = PlantRepo::create(
            pool,
            &CreatePlant {
                name: format!("Fern {n}"),
                scientific_name: Some("Nephrolepis exaltata".to_string()),
                price_band: Some("$10-20".to_string()),
            },
        )
        .await
        .unwrap();
        ids.push(plant.id);
    }
    ids
}
