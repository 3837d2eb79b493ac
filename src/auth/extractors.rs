//! Authentication extractors for Axum

use async_trait::async_trait;
use axum::{
    extract::{Extension, FromRequestParts},
    http::{header::AUTHORIZATION, request::Parts},
};
use tracing::{debug, warn};

use super::tokens::decode_access_token;
use crate::common::cookies::{read_cookie, ACCESS_TOKEN_COOKIE};
use crate::common::{safe_email_log, ApiError, SharedState};
use crate::users::services::UserService;

/// Authenticated caller, resolved from the `accessToken` cookie or an
/// `Authorization: Bearer` header and confirmed against the users table.
#[derive(Debug, Clone)]
pub struct AuthedUser {
    pub id: String,
    pub email: String,
    pub role: String,
    pub is_admin: bool,
}

impl AuthedUser {
    pub fn require_admin(&self) -> Result<(), ApiError> {
        if self.is_admin {
            Ok(())
        } else {
            warn!(user_id = %self.id, role = %self.role, "Admin access denied");
            Err(ApiError::Forbidden("Admin access required".to_string()))
        }
    }
}

/// Drops a leading `Bearer ` scheme, matched case-insensitively
fn strip_bearer(raw: &str) -> &str {
    let raw = raw.trim_start();
    match raw.get(..7) {
        Some(scheme) if scheme.eq_ignore_ascii_case("bearer ") => &raw[7..],
        _ => raw,
    }
}

/// Cookie first, then the `Authorization` header (with or without `Bearer `)
fn extract_token(parts: &Parts) -> Option<String> {
    read_cookie(&parts.headers, ACCESS_TOKEN_COOKIE).or_else(|| {
        parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .map(|raw| strip_bearer(raw).trim().to_string())
            .filter(|t| !t.is_empty())
    })
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthedUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Extension(state_lock): Extension<SharedState> =
            Extension::from_request_parts(parts, state)
                .await
                .map_err(|_| ApiError::InternalServer("missing app state".to_string()))?;

        let app_state = state_lock.read().await.clone();

        let token = extract_token(parts).ok_or_else(|| {
            warn!("Authentication failed: no access token on request");
            ApiError::Unauthorized("Unauthorized request".into())
        })?;

        let claims = decode_access_token(&app_state.config.tokens, &token).map_err(|e| {
            warn!(error = %e, "Access token validation failed");
            ApiError::Unauthorized("Invalid access token".into())
        })?;

        let user = UserService::new(app_state.db.clone())
            .find_by_id(&claims.sub)
            .await?
            .ok_or_else(|| {
                warn!(user_id = %claims.sub, "Authentication failed: user not found in database");
                ApiError::Unauthorized("Invalid access token".into())
            })?;

        let is_admin = user.is_admin() || app_state.is_admin_email(&user.email);
        debug!(
            user_id = %user.id,
            email = %safe_email_log(&user.email),
            is_admin = is_admin,
            "User authenticated via extractor"
        );

        Ok(AuthedUser {
            id: user.id,
            email: user.email,
            role: user.role,
            is_admin,
        })
    }
}
