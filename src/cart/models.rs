use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow)]
pub struct Cart {
    pub id: String,
    pub user_id: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, Serialize, FromRow, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    pub id: String,
    #[serde(skip)]
    pub cart_id: String,
    pub product_id: String,
    pub quantity: i64,
    pub price: f64, // unit price captured when the item was last added
    pub position: i64,
}

/// Cart as returned to the client, items in insertion order
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartView {
    pub id: String,
    pub user_id: String,
    pub items: Vec<CartItem>,
    pub total: f64,
    pub updated_at: String,
}

impl CartView {
    pub fn new(cart: Cart, items: Vec<CartItem>) -> Self {
        let total = items
            .iter()
            .map(|item| item.price * item.quantity as f64)
            .sum();

        Self {
            id: cart.id,
            user_id: cart.user_id,
            items,
            total,
            updated_at: cart.updated_at,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddCartItemRequest {
    #[serde(alias = "product_id")]
    pub product_id: Option<String>,
    pub quantity: Option<i64>,
}
