// Application state shared across all modules

use sqlx::SqlitePool;
use std::sync::Arc;
use tokio::sync::RwLock;

use super::config::AppConfig;
use crate::services::Mailer;

/// Application state containing database pool, services, and configuration
#[derive(Clone)]
pub struct AppState {
    pub db: SqlitePool,
    pub config: Arc<AppConfig>,
    pub mailer: Arc<dyn Mailer>,
}

impl AppState {
    pub fn new(db: SqlitePool, config: AppConfig, mailer: Arc<dyn Mailer>) -> Self {
        Self {
            db,
            config: Arc::new(config),
            mailer,
        }
    }

    /// True when the email is listed in `ADMIN_EMAILS`
    pub fn is_admin_email(&self, email: &str) -> bool {
        self.config.admin_emails.contains(&email.to_lowercase())
    }
}

/// State handle installed as an axum `Extension`
pub type SharedState = Arc<RwLock<AppState>>;
