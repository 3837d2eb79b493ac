use super::handlers;
use axum::{
    routing::{delete, get, post},
    Router,
};

pub fn cart_routes() -> Router {
    Router::new()
        .route("/cart", get(handlers::get_cart))
        .route("/cart/items", post(handlers::add_item))
        .route("/cart/items/:product_id", delete(handlers::remove_item))
}
