//! Token claim and payload types

use serde::{Deserialize, Serialize};

/// Claims carried by the short-lived access token
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct AccessClaims {
    pub sub: String,
    pub email: String,
    pub name: String,
    pub role: String,
    pub exp: usize,
    pub iat: usize,
    pub jti: String,
}

/// Claims carried by the refresh token; identity only
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RefreshClaims {
    pub sub: String,
    pub exp: usize,
    pub iat: usize,
    pub jti: String,
}

/// Access + refresh token pair returned by the token service
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}
