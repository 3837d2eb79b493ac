//! Access/refresh token signing and the token-issuing service

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{de::DeserializeOwned, Serialize};
use sqlx::SqlitePool;
use thiserror::Error;
use tracing::{debug, error};
use uuid::Uuid;

use super::models::{AccessClaims, RefreshClaims, TokenPair};
use crate::common::config::TokenConfig;
use crate::common::ApiError;
use crate::users::models::User;
use crate::users::services::UserService;

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("Failed to sign token: {0}")]
    Sign(jsonwebtoken::errors::Error),

    #[error("Invalid token: {0}")]
    Invalid(jsonwebtoken::errors::Error),
}

fn sign<C: Serialize>(claims: &C, secret: &str) -> Result<String, TokenError> {
    encode(
        &Header::new(Algorithm::HS256),
        claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(TokenError::Sign)
}

fn verify<C: DeserializeOwned>(token: &str, secret: &str) -> Result<C, TokenError> {
    decode::<C>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::new(Algorithm::HS256),
    )
    .map(|data| data.claims)
    .map_err(TokenError::Invalid)
}

/// Signs a short-lived access token for the user
pub fn generate_access_token(config: &TokenConfig, user: &User) -> Result<String, TokenError> {
    let now = Utc::now();
    let claims = AccessClaims {
        sub: user.id.clone(),
        email: user.email.clone(),
        name: user.name.clone(),
        role: user.role.clone(),
        exp: (now + Duration::minutes(config.access_expiry_minutes)).timestamp() as usize,
        iat: now.timestamp() as usize,
        jti: Uuid::new_v4().to_string(),
    };
    sign(&claims, &config.access_secret)
}

/// Signs a long-lived refresh token for the user
pub fn generate_refresh_token(config: &TokenConfig, user: &User) -> Result<String, TokenError> {
    let now = Utc::now();
    let claims = RefreshClaims {
        sub: user.id.clone(),
        exp: (now + Duration::days(config.refresh_expiry_days)).timestamp() as usize,
        iat: now.timestamp() as usize,
        jti: Uuid::new_v4().to_string(),
    };
    sign(&claims, &config.refresh_secret)
}

pub fn decode_access_token(config: &TokenConfig, token: &str) -> Result<AccessClaims, TokenError> {
    verify(token, &config.access_secret)
}

pub fn decode_refresh_token(
    config: &TokenConfig,
    token: &str,
) -> Result<RefreshClaims, TokenError> {
    verify(token, &config.refresh_secret)
}

/// Loads the user, signs a fresh token pair and stores the refresh token on
/// the user record.
///
/// A missing user is a 404; every other failure is logged with its cause and
/// reported as a 500 "Error generating tokens".
pub async fn generate_access_and_refresh_tokens(
    db: &SqlitePool,
    config: &TokenConfig,
    user_id: &str,
) -> Result<TokenPair, ApiError> {
    let users = UserService::new(db.clone());

    let user = users
        .find_by_id(user_id)
        .await
        .map_err(|e| token_failure(user_id, &e))?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    let access_token =
        generate_access_token(config, &user).map_err(|e| token_failure(user_id, &e))?;
    let refresh_token =
        generate_refresh_token(config, &user).map_err(|e| token_failure(user_id, &e))?;

    users
        .set_refresh_token(&user.id, Some(&refresh_token))
        .await
        .map_err(|e| token_failure(user_id, &e))?;

    debug!(user_id = %user.id, "Issued access and refresh tokens");

    Ok(TokenPair {
        access_token,
        refresh_token,
    })
}

fn token_failure(user_id: &str, cause: &dyn std::fmt::Display) -> ApiError {
    error!(user_id = %user_id, error = %cause, "Token generation failed");
    ApiError::InternalServer("Error generating tokens".to_string())
}
