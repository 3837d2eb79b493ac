// src/common/config.rs
//! Runtime configuration read from the environment (and `.env` via dotenv)

use std::collections::HashSet;
use std::env;

/// Token signing settings
#[derive(Debug, Clone)]
pub struct TokenConfig {
    pub access_secret: String,
    pub access_expiry_minutes: i64,
    pub refresh_secret: String,
    pub refresh_expiry_days: i64,
}

/// SMTP relay settings used by the mailer
#[derive(Debug, Clone)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub from_address: String,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub port: u16,
    pub tokens: TokenConfig,
    pub smtp: SmtpConfig,
    pub cookie_secure: bool,
    pub otp_ttl_minutes: i64,
    pub admin_emails: HashSet<String>,
    pub cors_origins: Vec<String>,
}

fn var_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn parse_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.trim().parse::<T>().ok())
        .unwrap_or(default)
}

fn flag_or(key: &str, default: bool) -> bool {
    match env::var(key) {
        Ok(v) => matches!(v.trim().to_lowercase().as_str(), "true" | "1" | "yes"),
        Err(_) => default,
    }
}

/// Parses a comma-separated list, trimming and dropping empty entries
pub fn parse_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

impl AppConfig {
    pub fn from_env() -> Self {
        let email_id = var_or("EMAIL_ID", "");

        let admin_emails = parse_list(&var_or("ADMIN_EMAILS", ""))
            .into_iter()
            .map(|e| e.to_lowercase())
            .collect();

        Self {
            database_url: var_or("DATABASE_URL", "sqlite://storefront.db"),
            port: parse_or("PORT", 8080),
            tokens: TokenConfig {
                access_secret: var_or("ACCESS_TOKEN_SECRET", "replace_with_strong_access_secret"),
                access_expiry_minutes: parse_or("ACCESS_TOKEN_EXPIRY_MINUTES", 15),
                refresh_secret: var_or(
                    "REFRESH_TOKEN_SECRET",
                    "replace_with_strong_refresh_secret",
                ),
                refresh_expiry_days: parse_or("REFRESH_TOKEN_EXPIRY_DAYS", 10),
            },
            smtp: SmtpConfig {
                host: var_or("SMTP_HOST", "smtp.hostinger.com"),
                port: parse_or("SMTP_PORT", 465),
                from_address: var_or("MAIL_FROM", &email_id),
                username: email_id,
                password: var_or("EMAIL_PASSWORD", ""),
            },
            cookie_secure: flag_or("COOKIE_SECURE", true),
            otp_ttl_minutes: parse_or("OTP_TTL_MINUTES", 10),
            admin_emails,
            cors_origins: parse_list(&var_or(
                "CORS_ORIGINS",
                "http://localhost:3000,http://localhost:5173",
            )),
        }
    }

    /// Configuration with fixed secrets for unit tests
    #[cfg(test)]
    pub fn for_tests() -> Self {
        Self {
            database_url: "sqlite::memory:".to_string(),
            port: 0,
            tokens: TokenConfig {
                access_secret: "test_access_secret".to_string(),
                access_expiry_minutes: 15,
                refresh_secret: "test_refresh_secret".to_string(),
                refresh_expiry_days: 10,
            },
            smtp: SmtpConfig {
                host: "localhost".to_string(),
                port: 465,
                username: "shop@example.com".to_string(),
                password: String::new(),
                from_address: "shop@example.com".to_string(),
            },
            cookie_secure: true,
            otp_ttl_minutes: 10,
            admin_emails: ["admin@example.com".to_string()].into_iter().collect(),
            cors_origins: Vec::new(),
        }
    }
}
