//! # Users Module
//!
//! Account lifecycle and user reads:
//! - Signup with OTP email, login, logout and token refresh
//! - OTP verification
//! - Profile and listing projections that never expose credentials

pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;
pub mod validators;


pub use routes::users_routes;
