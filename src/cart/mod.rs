// Cart module - one cart per user, ordered line items

pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;


pub use routes::cart_routes;
