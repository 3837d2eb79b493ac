use axum::extract::{Extension, Path};

use super::models::{AddCartItemRequest, CartView};
use super::services::CartService;
use crate::auth::AuthedUser;
use crate::common::validation::is_blank;
use crate::common::{ApiError, ApiJson, ApiResponse, SharedState};

/// GET /cart
pub async fn get_cart(
    Extension(state_lock): Extension<SharedState>,
    authed: AuthedUser,
) -> Result<ApiResponse<CartView>, ApiError> {
    let state = state_lock.read().await.clone();

    let cart = CartService::new(state.db.clone())
        .view_cart(&authed.id)
        .await?;

    Ok(ApiResponse::ok(cart, "Cart fetched successfully"))
}

/// POST /cart/items
///
/// # Request Body
/// ```json
/// { "productId": "P_...", "quantity": 2 }
/// ```
pub async fn add_item(
    Extension(state_lock): Extension<SharedState>,
    authed: AuthedUser,
    ApiJson(payload): ApiJson<AddCartItemRequest>,
) -> Result<ApiResponse<CartView>, ApiError> {
    let state = state_lock.read().await.clone();

    if is_blank(&payload.product_id) {
        return Err(ApiError::ValidationError("Product id is required".to_string()));
    }
    let product_id = payload.product_id.unwrap_or_default();
    let quantity = payload.quantity.unwrap_or(1);

    let cart = CartService::new(state.db.clone())
        .add_item(&authed.id, product_id.trim(), quantity)
        .await?;

    Ok(ApiResponse::ok(cart, "Item added to cart"))
}

/// DELETE /cart/items/:product_id
pub async fn remove_item(
    Extension(state_lock): Extension<SharedState>,
    authed: AuthedUser,
    Path(product_id): Path<String>,
) -> Result<ApiResponse<CartView>, ApiError> {
    let state = state_lock.read().await.clone();

    let cart = CartService::new(state.db.clone())
        .remove_item(&authed.id, &product_id)
        .await?;

    Ok(ApiResponse::ok(cart, "Item removed from cart"))
}
