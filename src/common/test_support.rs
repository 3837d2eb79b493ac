//! Shared fixtures for HTTP-level tests: an in-memory database, fake
//! mailers and small request helpers.

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    Router,
};
use serde_json::Value;
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;
use std::sync::{Arc, Mutex};
use tower::ServiceExt;

use super::config::AppConfig;
use super::migrations::run_migrations;
use super::state::AppState;
use crate::app::build_router;
use crate::services::{EmailError, Mailer, OutgoingEmail};

/// Captures every email instead of sending it
#[derive(Default)]
pub struct RecordingMailer {
    pub sent: Mutex<Vec<OutgoingEmail>>,
}

impl RecordingMailer {
    pub fn sent(&self) -> Vec<OutgoingEmail> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send(&self, email: OutgoingEmail) -> Result<(), EmailError> {
        self.sent.lock().unwrap().push(email);
        Ok(())
    }
}

/// Always fails, as an unreachable relay would
pub struct FailingMailer;

#[async_trait]
impl Mailer for FailingMailer {
    async fn send(&self, email: OutgoingEmail) -> Result<(), EmailError> {
        Err(EmailError::InvalidAddress(email.to))
    }
}

pub async fn memory_pool() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .unwrap();
    run_migrations(&pool).await.unwrap();
    pool
}

pub struct TestApp {
    pub router: Router,
    pub db: SqlitePool,
    pub mailer: Arc<RecordingMailer>,
}

pub async fn test_app() -> TestApp {
    let db = memory_pool().await;
    let mailer = Arc::new(RecordingMailer::default());
    let state = AppState::new(db.clone(), AppConfig::for_tests(), mailer.clone());

    TestApp {
        router: build_router(state),
        db,
        mailer,
    }
}

pub async fn test_app_with_mailer(mailer: Arc<dyn Mailer>) -> (Router, SqlitePool) {
    let db = memory_pool().await;
    let state = AppState::new(db.clone(), AppConfig::for_tests(), mailer);
    (build_router(state), db)
}

pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
    pub set_cookies: Vec<String>,
}

impl TestResponse {
    /// Value of a cookie set by this response, if any
    pub fn cookie(&self, name: &str) -> Option<String> {
        let prefix = format!("{}=", name);
        self.set_cookies.iter().find_map(|c| {
            c.strip_prefix(&prefix)
                .map(|rest| rest.split(';').next().unwrap_or("").to_string())
        })
    }
}

/// Sends a request; `cookie` is passed verbatim as the `Cookie` header
pub async fn send(
    router: &Router,
    method: &str,
    uri: &str,
    body: Option<Value>,
    cookie: Option<&str>,
) -> TestResponse {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let set_cookies = response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok().map(str::to_string))
        .collect();

    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };

    TestResponse {
        status,
        body,
        set_cookies,
    }
}

pub fn signup_body(name: &str, email: &str, phone: &str) -> Value {
    serde_json::json!({
        "name": name,
        "email": email,
        "phone": phone,
        "password": "correct horse battery",
    })
}

/// Signs up and logs in, returning a `Cookie` header carrying the access token
pub async fn signed_in(router: &Router, email: &str, phone: &str) -> String {
    let signup = send(router, "POST", "/signup", Some(signup_body("Test", email, phone)), None).await;
    assert_eq!(signup.status, StatusCode::CREATED, "{}", signup.body);

    let login = send(
        router,
        "POST",
        "/login",
        Some(serde_json::json!({ "email": email, "password": "correct horse battery" })),
        None,
    )
    .await;
    assert_eq!(login.status, StatusCode::OK, "{}", login.body);

    let access = login.cookie("accessToken").unwrap();
    format!("accessToken={}", access)
}
