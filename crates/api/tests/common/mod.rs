//! Common test utilities for integration tests.

// Each test binary uses a different subset of these helpers.
#![allow(dead_code)]

use axum::{
    body::{to_bytes, Body},
    http::{header, Request, Response},
    Router,
};
use contacts_web::{app::create_app, config::Config};
use persistence::db::DatabaseConfig;
use persistence::repositories::{ContactRepository, ContactStore, MemoryContactStore};
use sqlx::{postgres::PgPoolOptions, PgPool};
use std::sync::Arc;
use std::time::Duration;

/// Router backed by an in-memory store, plus a handle to that store.
pub fn memory_app() -> (Router, Arc<MemoryContactStore>) {
    let store = Arc::new(MemoryContactStore::new());
    let app = create_app(Config::default(), store.clone());
    (app, store)
}

/// Pool for the database named by `TEST_DATABASE_URL`.
///
/// Returns `None` when the variable is unset so that database tests are
/// skipped on machines without Postgres.
pub async fn create_test_pool() -> Option<PgPool> {
    let database_url = match std::env::var("TEST_DATABASE_URL") {
        Ok(url) if !url.trim().is_empty() => url,
        _ => {
            eprintln!("TEST_DATABASE_URL not set, skipping database test");
            return None;
        }
    };

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .acquire_timeout(Duration::from_secs(10))
        .connect(&database_url)
        .await
        .expect("Failed to connect to test database");
    Some(pool)
}

/// Repository over the test database with the schema in place.
pub async fn test_repository() -> Option<ContactRepository> {
    let pool = create_test_pool().await?;
    let repository = ContactRepository::new(pool);
    repository
        .ensure_schema()
        .await
        .expect("Failed to prepare schema");
    Some(repository)
}

/// Configuration pointing at a port where nothing listens.
pub fn unreachable_database() -> DatabaseConfig {
    DatabaseConfig {
        host: "127.0.0.1".to_string(),
        port: 1,
        connect_timeout_secs: 1,
        ..DatabaseConfig::default()
    }
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

pub fn get_with_cookie(uri: &str, cookie: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .header(header::COOKIE, cookie)
        .body(Body::empty())
        .unwrap()
}

pub fn post_form(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn json_request(method: &str, uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub async fn body_string(response: Response<Body>) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

/// The `name=value` part of a response's Set-Cookie header.
pub fn cookie_pair(response: &Response<Body>) -> String {
    response
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(';').next())
        .map(str::to_string)
        .expect("response has no Set-Cookie header")
}
