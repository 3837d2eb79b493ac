//! User account routes

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers;

/// Creates the users router
///
/// # Routes
/// - `POST /signup` - Create an account and email an OTP
/// - `POST /login` - Email/password login
/// - `POST /logout` - Clear the session (authenticated)
/// - `POST /refresh-token` - Rotate the token pair
/// - `POST /verify-otp` - Confirm the emailed OTP (authenticated)
/// - `GET /users` - List users
/// - `GET /users/me` - Current user's profile (authenticated)
/// - `GET /users/:id` - Single user
pub fn users_routes() -> Router {
    Router::new()
        .route("/signup", post(handlers::signup))
        .route("/login", post(handlers::login))
        .route("/logout", post(handlers::logout))
        .route("/refresh-token", post(handlers::refresh_access_token))
        .route("/verify-otp", post(handlers::verify_otp))
        .route("/users", get(handlers::get_all_users))
        .route("/users/me", get(handlers::get_user_profile))
        .route("/users/:id", get(handlers::get_single_user))
}
