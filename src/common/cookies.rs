// src/common/cookies.rs
//! `Set-Cookie` construction and `Cookie` header lookup for the token cookies

use axum::http::{header::COOKIE, HeaderMap, HeaderValue};

use super::config::AppConfig;
use super::ApiError;

pub const ACCESS_TOKEN_COOKIE: &str = "accessToken";
pub const REFRESH_TOKEN_COOKIE: &str = "refreshToken";

/// Attributes shared by every cookie of one kind
#[derive(Debug, Clone)]
pub struct CookieOptions {
    pub http_only: bool,
    pub secure: bool,
    pub max_age_secs: i64,
}

impl CookieOptions {
    pub fn access_token(config: &AppConfig) -> Self {
        Self {
            http_only: true,
            secure: config.cookie_secure,
            max_age_secs: config.tokens.access_expiry_minutes * 60,
        }
    }

    pub fn refresh_token(config: &AppConfig) -> Self {
        Self {
            http_only: true,
            secure: config.cookie_secure,
            max_age_secs: config.tokens.refresh_expiry_days * 24 * 60 * 60,
        }
    }

    fn render(&self, name: &str, value: &str, max_age_secs: i64) -> String {
        let mut cookie = format!("{}={}; Path=/; Max-Age={}", name, value, max_age_secs);
        if self.http_only {
            cookie.push_str("; HttpOnly");
        }
        // SameSite=None is only honoured by browsers on secure cookies
        if self.secure {
            cookie.push_str("; Secure; SameSite=None");
        } else {
            cookie.push_str("; SameSite=Lax");
        }
        cookie
    }
}

/// Builds a `Set-Cookie` value that stores `value` under `name`
pub fn set_cookie(name: &str, value: &str, options: &CookieOptions) -> Result<HeaderValue, ApiError> {
    HeaderValue::from_str(&options.render(name, value, options.max_age_secs))
        .map_err(|_| ApiError::InternalServer("invalid cookie value".to_string()))
}

/// Builds a `Set-Cookie` value that expires the cookie immediately
pub fn clear_cookie(name: &str, options: &CookieOptions) -> Result<HeaderValue, ApiError> {
    HeaderValue::from_str(&options.render(name, "", 0))
        .map_err(|_| ApiError::InternalServer("invalid cookie value".to_string()))
}

/// Both token cookies, refresh first (same order the responses always used)
pub fn token_cookies(
    config: &AppConfig,
    access_token: &str,
    refresh_token: &str,
) -> Result<Vec<HeaderValue>, ApiError> {
    Ok(vec![
        set_cookie(
            REFRESH_TOKEN_COOKIE,
            refresh_token,
            &CookieOptions::refresh_token(config),
        )?,
        set_cookie(
            ACCESS_TOKEN_COOKIE,
            access_token,
            &CookieOptions::access_token(config),
        )?,
    ])
}

/// Reads a cookie value from the request's `Cookie` header(s)
pub fn read_cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|raw| raw.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value.to_string())
        .filter(|value| !value.is_empty())
}
