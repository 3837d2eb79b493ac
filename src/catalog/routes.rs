use super::handlers;
use axum::{
    routing::{get, post},
    Router,
};

/// Creates the catalog router (categories, coupons, products)
pub fn catalog_routes() -> Router {
    Router::new()
        .route("/categories", post(handlers::create_category))
        .route("/coupons", post(handlers::create_coupon))
        .route(
            "/products",
            get(handlers::list_products).post(handlers::create_product),
        )
        .route("/products/:id", get(handlers::get_product))
}
