//! # Auth Module
//!
//! Authentication building blocks shared by the handler modules:
//! - Password hashing and verification (argon2)
//! - Access/refresh JWT signing and the token-issuing service
//! - `AuthedUser` extractor for protected routes

pub mod extractors;
pub mod models;
pub mod password;
pub mod tokens;

#[cfg(test)]
mod tests;

pub use extractors::AuthedUser;
pub use models::TokenPair;
