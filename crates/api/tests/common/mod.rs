#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use chrono::{TimeZone, Utc};
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;

use showplay_api::config::ServerConfig;
use showplay_api::router::build_app_router;
use showplay_api::state::AppState;
use showplay_core::clock::FixedClock;
use showplay_core::show::{Preferences, ViewerControlMode};
use showplay_core::types::Timestamp;
use showplay_db::models::show::{CreateShow, ShowRecord};
use showplay_db::repositories::ShowRepo;

/// Token seeded by [`seed_show`] unless a test picks its own.
pub const TOKEN: &str = "test-show-token";

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        sequence_limit: 5,
        save_retry_limit: 3,
    }
}

/// The instant every test app's clock is frozen at.
pub fn test_now() -> Timestamp {
    Utc.with_ymd_and_hms(2024, 12, 24, 19, 0, 0).unwrap()
}

/// Build the full application router with all middleware layers, using the
/// given database pool and a clock frozen at [`test_now`].
pub fn build_test_app(pool: PgPool) -> Router {
    build_test_app_with_config(pool, test_config())
}

/// Like [`build_test_app`] but with a caller-supplied configuration.
pub fn build_test_app_with_config(pool: PgPool, config: ServerConfig) -> Router {
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        clock: Arc::new(FixedClock(test_now())),
    };
    build_app_router(state, &config)
}

/// Insert a show with the given mode and default preferences.
pub async fn seed_show(pool: &PgPool, mode: ViewerControlMode) -> ShowRecord {
    seed_show_with(pool, Some(Preferences::new(mode))).await
}

pub async fn seed_show_with(pool: &PgPool, preferences: Option<Preferences>) -> ShowRecord {
    ShowRepo::create(
        pool,
        &CreateShow {
            show_token: TOKEN.to_string(),
            show_subdomain: "lights".to_string(),
            preferences,
        },
    )
    .await
    .unwrap()
}

/// Reload the seeded show straight from the database.
pub async fn reload(pool: &PgPool) -> ShowRecord {
    ShowRepo::find_by_token(pool, TOKEN).await.unwrap().unwrap()
}

/// Overwrite the seeded show's aggregate.
pub async fn store(pool: &PgPool, record: &ShowRecord) {
    ShowRepo::save(pool, record).await.unwrap();
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// Send a plugin request carrying [`TOKEN`] in the `showtoken` header.
pub async fn plugin(
    app: Router,
    method: Method,
    path: &str,
    body: Option<serde_json::Value>,
) -> Response<Body> {
    plugin_as(app, TOKEN, method, path, body).await
}

pub async fn plugin_as(
    app: Router,
    token: &str,
    method: Method,
    path: &str,
    body: Option<serde_json::Value>,
) -> Response<Body> {
    let builder = Request::builder()
        .method(method)
        .uri(format!("/api/v1/plugin{path}"))
        .header("showtoken", token);
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    app.oneshot(request).await.unwrap()
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
