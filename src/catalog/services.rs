use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::info;

use super::models::{
    Category, Coupon, CreateCategoryRequest, CreateCouponRequest, CreateProductRequest, Product,
};
use super::validators::{CategoryValidator, CouponValidator, ProductValidator};
use crate::common::{
    format_timestamp, generate_category_id, generate_coupon_id, generate_product_id,
    now_timestamp, ApiError, Validator,
};

fn clean(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

pub struct CatalogService {
    db: SqlitePool,
}

impl CatalogService {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    // ============================================================================
    // Categories
    // ============================================================================

    pub async fn create_category(
        &self,
        request: CreateCategoryRequest,
    ) -> Result<Category, ApiError> {
        CategoryValidator.validate(&request).into_result()?;

        let category = Category {
            id: generate_category_id(),
            name: clean(request.name).unwrap_or_default(),
            description: clean(request.description),
            created_at: now_timestamp(),
        };

        sqlx::query("INSERT INTO categories (id, name, description, created_at) VALUES (?, ?, ?, ?)")
            .bind(&category.id)
            .bind(&category.name)
            .bind(&category.description)
            .bind(&category.created_at)
            .execute(&self.db)
            .await
            .map_err(|e| ApiError::from_write_error(e, "Category already exists"))?;

        info!(category_id = %category.id, name = %category.name, "Created category");

        Ok(category)
    }

    pub async fn get_category(&self, category_id: &str) -> Result<Option<Category>, ApiError> {
        sqlx::query_as::<_, Category>(
            "SELECT id, name, description, created_at FROM categories WHERE id = ?",
        )
        .bind(category_id)
        .fetch_optional(&self.db)
        .await
        .map_err(ApiError::DatabaseError)
    }

    // ============================================================================
    // Coupons
    // ============================================================================

    pub async fn create_coupon(&self, request: CreateCouponRequest) -> Result<Coupon, ApiError> {
        CouponValidator.validate(&request).into_result()?;

        // Normalised to UTC so stored expiries compare as strings
        let expires_at = request
            .expires_at
            .as_deref()
            .and_then(|raw| DateTime::parse_from_rfc3339(raw).ok())
            .map(|dt| format_timestamp(dt.with_timezone(&Utc)));

        let coupon = Coupon {
            id: generate_coupon_id(),
            code: clean(request.code).unwrap_or_default().to_uppercase(),
            discount_percent: request.discount_percent.unwrap_or_default(),
            expires_at,
            is_active: request.is_active.unwrap_or(true),
            created_at: now_timestamp(),
        };

        sqlx::query(
            r#"
            INSERT INTO coupons (id, code, discount_percent, expires_at, is_active, created_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&coupon.id)
        .bind(&coupon.code)
        .bind(coupon.discount_percent)
        .bind(&coupon.expires_at)
        .bind(coupon.is_active)
        .bind(&coupon.created_at)
        .execute(&self.db)
        .await
        .map_err(|e| ApiError::from_write_error(e, "Coupon code already exists"))?;

        info!(coupon_id = %coupon.id, code = %coupon.code, "Created coupon");

        Ok(coupon)
    }

    // ============================================================================
    // Products
    // ============================================================================

    pub async fn create_product(&self, request: CreateProductRequest) -> Result<Product, ApiError> {
        ProductValidator.validate(&request).into_result()?;

        let category_id = clean(request.category_id);
        if let Some(category_id) = &category_id {
            if self.get_category(category_id).await?.is_none() {
                return Err(ApiError::NotFound("Category not found".to_string()));
            }
        }

        let product = Product {
            id: generate_product_id(),
            name: clean(request.name).unwrap_or_default(),
            description: clean(request.description),
            price: request.price.unwrap_or_default(),
            stock: request.stock.unwrap_or(0),
            category_id,
            created_at: now_timestamp(),
        };

        sqlx::query(
            r#"
            INSERT INTO products (id, name, description, price, stock, category_id, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&product.id)
        .bind(&product.name)
        .bind(&product.description)
        .bind(product.price)
        .bind(product.stock)
        .bind(&product.category_id)
        .bind(&product.created_at)
        .execute(&self.db)
        .await
        .map_err(ApiError::DatabaseError)?;

        info!(product_id = %product.id, name = %product.name, "Created product");

        Ok(product)
    }

    pub async fn list_products(&self) -> Result<Vec<Product>, ApiError> {
        sqlx::query_as::<_, Product>(
            r#"
            SELECT id, name, description, price, stock, category_id, created_at
            FROM products
            ORDER BY created_at DESC, rowid DESC
            "#,
        )
        .fetch_all(&self.db)
        .await
        .map_err(ApiError::DatabaseError)
    }

    pub async fn get_product(&self, product_id: &str) -> Result<Option<Product>, ApiError> {
        sqlx::query_as::<_, Product>(
            r#"
            SELECT id, name, description, price, stock, category_id, created_at
            FROM products
            WHERE id = ?
            "#,
        )
        .bind(product_id)
        .fetch_optional(&self.db)
        .await
        .map_err(ApiError::DatabaseError)
    }
}
