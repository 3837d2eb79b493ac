//! User account handlers: signup, login, logout, token refresh, OTP
//! verification and profile/listing reads

use axum::{
    extract::{Extension, Path},
    http::HeaderMap,
};
use chrono::Utc;
use tracing::{debug, error, info, warn};

use super::models::{
    LoginRequest, NewUser, ProfileView, PublicUser, RefreshTokenRequest, SignupRequest,
    VerifyOtpRequest, ROLE_ADMIN, ROLE_USER,
};
use super::services::{generate_otp_code, otp_is_expired, UserService};
use super::validators::{LoginValidator, SignupValidator};
use crate::auth::password::{hash_password, verify_password};
use crate::auth::tokens::{decode_refresh_token, generate_access_and_refresh_tokens};
use crate::auth::{AuthedUser, TokenPair};
use crate::common::cookies::{self, read_cookie, CookieOptions, REFRESH_TOKEN_COOKIE};
use crate::common::validation::is_blank;
use crate::common::{
    safe_email_log, safe_token_log, ApiError, ApiJson, ApiResponse, SharedState, Validator,
};
use crate::services::OutgoingEmail;

fn trimmed(value: Option<String>) -> String {
    value.unwrap_or_default().trim().to_string()
}

/// POST /signup
/// Creates the account, emails a 4-digit OTP and signs the user in.
///
/// # Request Body
/// ```json
/// { "name": "Ada", "email": "ada@example.com", "phone": "5550100", "password": "..." }
/// ```
pub async fn signup(
    Extension(state_lock): Extension<SharedState>,
    ApiJson(payload): ApiJson<SignupRequest>,
) -> Result<ApiResponse<PublicUser>, ApiError> {
    let state = state_lock.read().await.clone();

    SignupValidator.validate(&payload).into_result()?;

    let name = trimmed(payload.name);
    let email = trimmed(payload.email).to_lowercase();
    let phone = trimmed(payload.phone);
    let password = payload.password.unwrap_or_default();

    let users = UserService::new(state.db.clone());

    if users.find_by_email_or_phone(&email, &phone).await?.is_some() {
        warn!(email = %safe_email_log(&email), "Signup rejected: user already exists");
        return Err(ApiError::Conflict("User already exists".to_string()));
    }

    let password_hash = hash_password(&password).map_err(|e| {
        error!(error = %e, "Password hashing failed during signup");
        ApiError::InternalServer("Internal Server Error".to_string())
    })?;

    let role = if state.is_admin_email(&email) {
        ROLE_ADMIN
    } else {
        ROLE_USER
    };

    let user = users
        .create_user(NewUser {
            name,
            email,
            phone,
            password_hash,
            role,
        })
        .await?;

    let code = generate_otp_code();
    users
        .create_otp(&user.id, &code, state.config.otp_ttl_minutes)
        .await?;

    // A failed send does not undo the signup; the user can still sign in.
    let email_message = OutgoingEmail::otp(&user.email, &code, state.config.otp_ttl_minutes);
    if let Err(e) = state.mailer.send(email_message).await {
        error!(
            error = %e,
            user_id = %user.id,
            email = %safe_email_log(&user.email),
            "Failed to send OTP email"
        );
    }

    let tokens =
        generate_access_and_refresh_tokens(&state.db, &state.config.tokens, &user.id).await?;

    let created = users
        .find_by_id(&user.id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    info!(user_id = %created.id, email = %safe_email_log(&created.email), "User signed up");

    Ok(ApiResponse::created(
        PublicUser::from(&created),
        "User created successfully. OTP sent to your email.",
    )
    .with_cookies(cookies::token_cookies(
        &state.config,
        &tokens.access_token,
        &tokens.refresh_token,
    )?))
}

/// POST /login
/// Verifies credentials and issues a fresh token pair (cookies and body).
pub async fn login(
    Extension(state_lock): Extension<SharedState>,
    ApiJson(payload): ApiJson<LoginRequest>,
) -> Result<ApiResponse<TokenPair>, ApiError> {
    let state = state_lock.read().await.clone();

    LoginValidator.validate(&payload).into_result()?;

    let email = trimmed(payload.email).to_lowercase();
    let password = payload.password.unwrap_or_default();

    let users = UserService::new(state.db.clone());
    let user = users.find_by_email(&email).await?.ok_or_else(|| {
        warn!(email = %safe_email_log(&email), "Login failed: unknown email");
        ApiError::NotFound("User not found with this email".to_string())
    })?;

    let is_match = verify_password(&password, &user.password).map_err(|e| {
        error!(error = %e, user_id = %user.id, "Password verification failed");
        ApiError::InternalServer("Internal Server Error".to_string())
    })?;

    if !is_match {
        warn!(user_id = %user.id, "Login failed: invalid credentials");
        return Err(ApiError::Unauthorized("Invalid credentials".to_string()));
    }

    let tokens =
        generate_access_and_refresh_tokens(&state.db, &state.config.tokens, &user.id).await?;

    info!(user_id = %user.id, email = %safe_email_log(&user.email), "User logged in");

    let cookies = cookies::token_cookies(&state.config, &tokens.access_token, &tokens.refresh_token)?;
    Ok(ApiResponse::ok(tokens, "Login successful").with_cookies(cookies))
}

/// POST /logout
/// Drops the stored refresh token and expires both cookies.
pub async fn logout(
    Extension(state_lock): Extension<SharedState>,
    authed: AuthedUser,
) -> Result<ApiResponse<serde_json::Value>, ApiError> {
    let state = state_lock.read().await.clone();

    UserService::new(state.db.clone())
        .set_refresh_token(&authed.id, None)
        .await?;

    info!(user_id = %authed.id, email = %safe_email_log(&authed.email), "User logged out");

    Ok(
        ApiResponse::ok(serde_json::json!({}), "User logged Out").with_cookies([
            cookies::clear_cookie(
                cookies::ACCESS_TOKEN_COOKIE,
                &CookieOptions::access_token(&state.config),
            )?,
            cookies::clear_cookie(
                REFRESH_TOKEN_COOKIE,
                &CookieOptions::refresh_token(&state.config),
            )?,
        ]),
    )
}

/// POST /refresh-token
/// Exchanges a valid, still-current refresh token for a new token pair.
/// The token is read from the `refreshToken` cookie or `{ "refreshToken": ... }`.
pub async fn refresh_access_token(
    Extension(state_lock): Extension<SharedState>,
    headers: HeaderMap,
    body: Option<ApiJson<RefreshTokenRequest>>,
) -> Result<ApiResponse<TokenPair>, ApiError> {
    let state = state_lock.read().await.clone();

    let incoming = read_cookie(&headers, REFRESH_TOKEN_COOKIE)
        .or_else(|| body.and_then(|ApiJson(b)| b.refresh_token))
        .filter(|t| !t.trim().is_empty())
        .ok_or_else(|| ApiError::Unauthorized("Unauthorized request".to_string()))?;

    let claims = decode_refresh_token(&state.config.tokens, &incoming).map_err(|e| {
        warn!(error = %e, token = %safe_token_log(&incoming), "Refresh token rejected");
        ApiError::Unauthorized("Invalid refresh token".to_string())
    })?;

    let user = UserService::new(state.db.clone())
        .find_by_id(&claims.sub)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("Invalid refresh token".to_string()))?;

    if user.refresh_token.as_deref() != Some(incoming.as_str()) {
        warn!(user_id = %user.id, "Refresh token does not match the stored token");
        return Err(ApiError::Unauthorized(
            "Refresh token is expired or used".to_string(),
        ));
    }

    let tokens =
        generate_access_and_refresh_tokens(&state.db, &state.config.tokens, &user.id).await?;

    debug!(user_id = %user.id, "Access token refreshed");

    let cookies = cookies::token_cookies(&state.config, &tokens.access_token, &tokens.refresh_token)?;
    Ok(ApiResponse::ok(tokens, "Access token refreshed").with_cookies(cookies))
}

/// POST /verify-otp
/// Checks the caller's latest OTP and activates the account.
pub async fn verify_otp(
    Extension(state_lock): Extension<SharedState>,
    authed: AuthedUser,
    ApiJson(payload): ApiJson<VerifyOtpRequest>,
) -> Result<ApiResponse<ProfileView>, ApiError> {
    let state = state_lock.read().await.clone();

    if is_blank(&payload.otp) {
        return Err(ApiError::ValidationError("OTP is required".to_string()));
    }
    let submitted = trimmed(payload.otp);

    let users = UserService::new(state.db.clone());
    let otp = users
        .latest_unverified_otp(&authed.id)
        .await?
        .ok_or_else(|| ApiError::NotFound("No pending OTP for this user".to_string()))?;

    if otp_is_expired(&otp, Utc::now()) {
        warn!(user_id = %authed.id, otp_id = %otp.id, "OTP verification failed: expired");
        return Err(ApiError::BadRequest("OTP has expired".to_string()));
    }

    if otp.otp != submitted {
        warn!(user_id = %authed.id, otp_id = %otp.id, "OTP verification failed: mismatch");
        return Err(ApiError::BadRequest("Invalid OTP".to_string()));
    }

    users.mark_otp_verified(&otp.id).await?;
    users.activate_user(&authed.id).await?;

    let user = users
        .find_by_id(&authed.id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    info!(user_id = %user.id, "Email verified via OTP");

    Ok(ApiResponse::ok(
        ProfileView::from(&user),
        "Email verified successfully",
    ))
}

/// GET /users
pub async fn get_all_users(
    Extension(state_lock): Extension<SharedState>,
) -> Result<ApiResponse<Vec<PublicUser>>, ApiError> {
    let state = state_lock.read().await.clone();

    let users = UserService::new(state.db.clone()).list_users().await?;
    let users: Vec<PublicUser> = users.iter().map(PublicUser::from).collect();

    Ok(ApiResponse::ok(users, "All users fetched successfully"))
}

/// GET /users/me
pub async fn get_user_profile(
    Extension(state_lock): Extension<SharedState>,
    authed: AuthedUser,
) -> Result<ApiResponse<ProfileView>, ApiError> {
    let state = state_lock.read().await.clone();

    let user = UserService::new(state.db.clone())
        .find_by_id(&authed.id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    Ok(ApiResponse::ok(
        ProfileView::from(&user),
        "User fetched successfully",
    ))
}

/// GET /users/:id
pub async fn get_single_user(
    Extension(state_lock): Extension<SharedState>,
    Path(user_id): Path<String>,
) -> Result<ApiResponse<PublicUser>, ApiError> {
    let state = state_lock.read().await.clone();

    let user = UserService::new(state.db.clone())
        .find_by_id(&user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    Ok(ApiResponse::ok(
        PublicUser::from(&user),
        "User fetched successfully",
    ))
}
