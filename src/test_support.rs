//! Shared fixtures for unit and router tests.

use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Request},
    response::Response,
    Router,
};
use axum_extra::extract::cookie::Cookie;
use http_body_util::BodyExt;
use sqlx::{sqlite::SqlitePoolOptions, SqlitePool};
use tower::ServiceExt;

use crate::{
    app::build_app,
    config::{AppConfig, SessionConfig},
    state::AppState,
};

pub fn test_config(download_path: &str) -> AppConfig {
    AppConfig {
        database_url: "sqlite::memory:".into(),
        download_path: download_path.into(),
        session: SessionConfig {
            secret: "test-secret".into(),
            issuer: "secretsite-test".into(),
            ttl_minutes: 60 * 24,
            flash_ttl_minutes: 5,
        },
    }
}

/// In-memory database with the schema applied. One connection, kept alive,
/// so every query sees the same database.
pub async fn test_pool() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await
        .expect("in-memory sqlite");
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("migrations");
    pool
}

pub async fn test_app_with_download(download_path: &str) -> (Router, AppState) {
    let state = AppState::from_parts(test_pool().await, Arc::new(test_config(download_path)));
    (build_app(state.clone()), state)
}

pub async fn test_app() -> (Router, AppState) {
    test_app_with_download("static/files/cheat_sheet.pdf").await
}

pub async fn send(app: &Router, request: Request<Body>) -> Response {
    app.clone().oneshot(request).await.unwrap()
}

pub fn get(uri: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(c) = cookie {
        builder = builder.header(header::COOKIE, c);
    }
    builder.body(Body::empty()).unwrap()
}

pub fn post_form(uri: &str, form: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
    if let Some(c) = cookie {
        builder = builder.header(header::COOKIE, c);
    }
    builder.body(Body::from(form.to_owned())).unwrap()
}

/// The `name=value` pair a response sets for `name`, if any.
pub fn cookie(response: &Response, name: &str) -> Option<String> {
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|h| h.to_str().ok())
        .filter_map(|h| Cookie::parse(h.to_owned()).ok())
        .find(|c| c.name() == name)
        .map(|c| format!("{}={}", c.name(), c.value()))
}

pub fn location(response: &Response) -> &str {
    response
        .headers()
        .get(header::LOCATION)
        .and_then(|h| h.to_str().ok())
        .unwrap_or_default()
}

pub async fn body_bytes(response: Response) -> Vec<u8> {
    response
        .into_body()
        .collect()
        .await
        .unwrap()
        .to_bytes()
        .to_vec()
}

pub async fn body_text(response: Response) -> String {
    String::from_utf8(body_bytes(response).await).unwrap()
}
