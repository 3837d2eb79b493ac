use axum::extract::{Extension, Path};

use super::models::{
    Category, Coupon, CreateCategoryRequest, CreateCouponRequest, CreateProductRequest, Product,
};
use super::services::CatalogService;
use crate::auth::AuthedUser;
use crate::common::{ApiError, ApiJson, ApiResponse, SharedState};

// ============================================================================
// Admin creators
// ============================================================================

/// POST /categories - Create a category (admin)
pub async fn create_category(
    Extension(state_lock): Extension<SharedState>,
    user: AuthedUser,
    ApiJson(request): ApiJson<CreateCategoryRequest>,
) -> Result<ApiResponse<Category>, ApiError> {
    user.require_admin()?;

    let state = state_lock.read().await.clone();
    let category = CatalogService::new(state.db.clone())
        .create_category(request)
        .await?;

    Ok(ApiResponse::created(category, "Category created successfully"))
}

/// POST /coupons - Create a coupon (admin)
pub async fn create_coupon(
    Extension(state_lock): Extension<SharedState>,
    user: AuthedUser,
    ApiJson(request): ApiJson<CreateCouponRequest>,
) -> Result<ApiResponse<Coupon>, ApiError> {
    user.require_admin()?;

    let state = state_lock.read().await.clone();
    let coupon = CatalogService::new(state.db.clone())
        .create_coupon(request)
        .await?;

    Ok(ApiResponse::created(coupon, "Coupon created successfully"))
}

/// POST /products - Create a product (admin)
pub async fn create_product(
    Extension(state_lock): Extension<SharedState>,
    user: AuthedUser,
    ApiJson(request): ApiJson<CreateProductRequest>,
) -> Result<ApiResponse<Product>, ApiError> {
    user.require_admin()?;

    let state = state_lock.read().await.clone();
    let product = CatalogService::new(state.db.clone())
        .create_product(request)
        .await?;

    Ok(ApiResponse::created(product, "Product created successfully"))
}

// ============================================================================
// Public reads
// ============================================================================

/// GET /products
pub async fn list_products(
    Extension(state_lock): Extension<SharedState>,
) -> Result<ApiResponse<Vec<Product>>, ApiError> {
    let state = state_lock.read().await.clone();
    let products = CatalogService::new(state.db.clone())
        .list_products()
        .await?;

    Ok(ApiResponse::ok(products, "Products fetched successfully"))
}

/// GET /products/:id
pub async fn get_product(
    Extension(state_lock): Extension<SharedState>,
    Path(product_id): Path<String>,
) -> Result<ApiResponse<Product>, ApiError> {
    let state = state_lock.read().await.clone();
    let product = CatalogService::new(state.db.clone())
        .get_product(&product_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Product not found".to_string()))?;

    Ok(ApiResponse::ok(product, "Product fetched successfully"))
}
