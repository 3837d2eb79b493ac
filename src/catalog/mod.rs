//! # Catalog Module
//!
//! Product catalog records:
//! - Categories and coupons (admin-only creation)
//! - Products (admin creation, public reads)

pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;
pub mod validators;

#[cfg(test)]
mod tests;

pub use routes::catalog_routes;
