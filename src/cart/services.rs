use sqlx::SqlitePool;
use tracing::{debug, info};

use super::models::{Cart, CartItem, CartView};
use crate::catalog::services::CatalogService;
use crate::common::{generate_cart_id, generate_cart_item_id, now_timestamp, ApiError};

/// Upper bound on the quantity of a single cart line
pub const MAX_LINE_QUANTITY: i64 = 10_000;

pub struct CartService {
    db: SqlitePool,
}

impl CartService {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    async fn find_cart(&self, user_id: &str) -> Result<Option<Cart>, ApiError> {
        sqlx::query_as::<_, Cart>(
            "SELECT id, user_id, updated_at FROM carts WHERE user_id = ?",
        )
        .bind(user_id)
        .fetch_optional(&self.db)
        .await
        .map_err(ApiError::DatabaseError)
    }

    /// Returns the user's cart, creating an empty one on first access
    pub async fn get_or_create_cart(&self, user_id: &str) -> Result<Cart, ApiError> {
        if let Some(cart) = self.find_cart(user_id).await? {
            return Ok(cart);
        }

        let now = now_timestamp();
        let cart_id = generate_cart_id();

        // Two first requests may race; the loser falls through to the re-read
        sqlx::query(
            "INSERT INTO carts (id, user_id, created_at, updated_at) VALUES (?, ?, ?, ?) \
             ON CONFLICT(user_id) DO NOTHING",
        )
        .bind(&cart_id)
        .bind(user_id)
        .bind(&now)
        .bind(&now)
        .execute(&self.db)
        .await
        .map_err(ApiError::DatabaseError)?;

        debug!(user_id = %user_id, "Cart ensured for user");

        self.find_cart(user_id)
            .await?
            .ok_or_else(|| ApiError::InternalServer("Failed to create cart".to_string()))
    }

    pub async fn list_items(&self, cart_id: &str) -> Result<Vec<CartItem>, ApiError> {
        sqlx::query_as::<_, CartItem>(
            r#"
            SELECT id, cart_id, product_id, quantity, price, position
            FROM cart_items
            WHERE cart_id = ?
            ORDER BY position ASC
            "#,
        )
        .bind(cart_id)
        .fetch_all(&self.db)
        .await
        .map_err(ApiError::DatabaseError)
    }

    pub async fn view_cart(&self, user_id: &str) -> Result<CartView, ApiError> {
        let cart = self.get_or_create_cart(user_id).await?;
        let items = self.list_items(&cart.id).await?;
        Ok(CartView::new(cart, items))
    }

    /// Adds `quantity` of a product. An existing line for the same product
    /// is merged and its unit price refreshed; new lines go to the end.
    pub async fn add_item(
        &self,
        user_id: &str,
        product_id: &str,
        quantity: i64,
    ) -> Result<CartView, ApiError> {
        if !(1..=MAX_LINE_QUANTITY).contains(&quantity) {
            return Err(ApiError::ValidationError(format!(
                "Quantity must be between 1 and {}",
                MAX_LINE_QUANTITY
            )));
        }

        let product = CatalogService::new(self.db.clone())
            .get_product(product_id)
            .await?
            .ok_or_else(|| ApiError::NotFound("Product not found".to_string()))?;

        let cart = self.get_or_create_cart(user_id).await?;
        let now = now_timestamp();

        let mut tx = self.db.begin().await.map_err(ApiError::DatabaseError)?;

        let existing: Option<(i64,)> = sqlx::query_as(
            "SELECT quantity FROM cart_items WHERE cart_id = ? AND product_id = ?",
        )
        .bind(&cart.id)
        .bind(&product.id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(ApiError::DatabaseError)?;

        let merged = existing.is_some();
        match existing {
            Some((current,)) => {
                let total = current
                    .checked_add(quantity)
                    .filter(|total| *total <= MAX_LINE_QUANTITY)
                    .ok_or_else(|| {
                        ApiError::ValidationError(format!(
                            "Quantity for one product cannot exceed {}",
                            MAX_LINE_QUANTITY
                        ))
                    })?;

                sqlx::query(
                    "UPDATE cart_items SET quantity = ?, price = ? WHERE cart_id = ? AND product_id = ?",
                )
                .bind(total)
                .bind(product.price)
                .bind(&cart.id)
                .bind(&product.id)
                .execute(&mut *tx)
                .await
                .map_err(ApiError::DatabaseError)?;
            }
            None => {
                let (next_position,): (i64,) = sqlx::query_as(
                    "SELECT COALESCE(MAX(position), -1) + 1 FROM cart_items WHERE cart_id = ?",
                )
                .bind(&cart.id)
                .fetch_one(&mut *tx)
                .await
                .map_err(ApiError::DatabaseError)?;

                sqlx::query(
                    r#"
                    INSERT INTO cart_items (id, cart_id, product_id, quantity, price, position)
                    VALUES (?, ?, ?, ?, ?, ?)
                    "#,
                )
                .bind(generate_cart_item_id())
                .bind(&cart.id)
                .bind(&product.id)
                .bind(quantity)
                .bind(product.price)
                .bind(next_position)
                .execute(&mut *tx)
                .await
                .map_err(ApiError::DatabaseError)?;
            }
        }

        sqlx::query("UPDATE carts SET updated_at = ? WHERE id = ?")
            .bind(&now)
            .bind(&cart.id)
            .execute(&mut *tx)
            .await
            .map_err(ApiError::DatabaseError)?;

        tx.commit().await.map_err(ApiError::DatabaseError)?;

        info!(
            user_id = %user_id,
            cart_id = %cart.id,
            product_id = %product.id,
            quantity = quantity,
            merged = merged,
            "Cart item added"
        );

        self.view_cart(user_id).await
    }

    pub async fn remove_item(&self, user_id: &str, product_id: &str) -> Result<CartView, ApiError> {
        let cart = self.get_or_create_cart(user_id).await?;

        let result = sqlx::query("DELETE FROM cart_items WHERE cart_id = ? AND product_id = ?")
            .bind(&cart.id)
            .bind(product_id)
            .execute(&self.db)
            .await
            .map_err(ApiError::DatabaseError)?;

        if result.rows_affected() == 0 {
            return Err(ApiError::NotFound("Item not found in cart".to_string()));
        }

        sqlx::query("UPDATE carts SET updated_at = ? WHERE id = ?")
            .bind(now_timestamp())
            .bind(&cart.id)
            .execute(&self.db)
            .await
            .map_err(ApiError::DatabaseError)?;

        info!(user_id = %user_id, cart_id = %cart.id, product_id = %product_id, "Cart item removed");

        self.view_cart(user_id).await
    }
}
