//! Tests for catalog module
//!
//! These tests verify:
//! - Category, coupon and product validation
//! - Admin-only creation
//! - Product reads

#[cfg(test)]
mod tests {
    use super::super::*;
    use crate::common::test_support::{memory_pool, send, signed_in, test_app};
    use crate::common::{ApiError, Validator};
    use axum::http::StatusCode;
    use serde_json::json;

    fn product_request(name: &str, price: f64) -> models::CreateProductRequest {
        models::CreateProductRequest {
            name: Some(name.to_string()),
            price: Some(price),
            ..Default::default()
        }
    }

    #[test]
    fn test_coupon_validation() {
        let valid = models::CreateCouponRequest {
            code: Some("SPRING-10".to_string()),
            discount_percent: Some(10),
            expires_at: Some("2030-01-01T00:00:00+02:00".to_string()),
            is_active: None,
        };
        assert!(validators::CouponValidator.validate(&valid).is_valid);

        let bad_discount = models::CreateCouponRequest {
            discount_percent: Some(0),
            ..valid
        };
        let result = validators::CouponValidator.validate(&bad_discount);
        assert!(!result.is_valid);
        assert_eq!(result.errors[0].field, "discountPercent");

        let bad_code = models::CreateCouponRequest {
            code: Some("10% off".to_string()),
            discount_percent: Some(10),
            ..Default::default()
        };
        assert!(!validators::CouponValidator.validate(&bad_code).is_valid);
    }

    #[test]
    fn test_product_validation() {
        assert!(validators::ProductValidator.validate(&product_request("Mug", 9.5)).is_valid);
        assert!(!validators::ProductValidator.validate(&product_request("Mug", -1.0)).is_valid);
        assert!(!validators::ProductValidator.validate(&product_request(" ", 1.0)).is_valid);

        let negative_stock = models::CreateProductRequest {
            stock: Some(-3),
            ..product_request("Mug", 1.0)
        };
        assert!(!validators::ProductValidator.validate(&negative_stock).is_valid);
    }

    #[tokio::test]
    async fn test_coupon_code_is_normalised_and_unique() {
        let catalog = services::CatalogService::new(memory_pool().await);

        let coupon = catalog
            .create_coupon(models::CreateCouponRequest {
                code: Some(" spring ".to_string()),
                discount_percent: Some(15),
                expires_at: Some("2030-01-01T02:00:00+02:00".to_string()),
                is_active: None,
            })
            .await
            .unwrap();
        assert_eq!(coupon.code, "SPRING");
        assert!(coupon.is_active);
        assert_eq!(coupon.expires_at.as_deref(), Some("2030-01-01T00:00:00.000000Z"));

        let dup = catalog
            .create_coupon(models::CreateCouponRequest {
                code: Some("SPRING".to_string()),
                discount_percent: Some(5),
                ..Default::default()
            })
            .await;
        assert!(matches!(dup, Err(ApiError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_product_with_unknown_category_is_not_found() {
        let catalog = services::CatalogService::new(memory_pool().await);

        let result = catalog
            .create_product(models::CreateProductRequest {
                category_id: Some("CG_MISSING0".to_string()),
                ..product_request("Mug", 4.0)
            })
            .await;
        assert!(matches!(result, Err(ApiError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_products_listed_newest_first() {
        let catalog = services::CatalogService::new(memory_pool().await);
        let first = catalog.create_product(product_request("First", 1.0)).await.unwrap();
        let second = catalog.create_product(product_request("Second", 2.0)).await.unwrap();

        let products = catalog.list_products().await.unwrap();
        let ids: Vec<&str> = products.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec![second.id.as_str(), first.id.as_str()]);
    }

    #[tokio::test]
    async fn test_creation_requires_admin() {
        let app = test_app().await;
        let body = json!({ "name": "Mug", "price": 9.5 });

        let anonymous = send(&app.router, "POST", "/products", Some(body.clone()), None).await;
        assert_eq!(anonymous.status, StatusCode::UNAUTHORIZED);

        let shopper = signed_in(&app.router, "ada@example.com", "111").await;
        let forbidden = send(&app.router, "POST", "/products", Some(body.clone()), Some(&shopper)).await;
        assert_eq!(forbidden.status, StatusCode::FORBIDDEN);
        assert_eq!(forbidden.body["message"], "Admin access required");

        let admin = signed_in(&app.router, "admin@example.com", "999").await;
        let created = send(&app.router, "POST", "/products", Some(body), Some(&admin)).await;
        assert_eq!(created.status, StatusCode::CREATED);
        assert!(created.body["data"]["id"].as_str().unwrap().starts_with("P_"));
    }

    #[tokio::test]
    async fn test_admin_creates_category_and_coupon() {
        let app = test_app().await;
        let admin = signed_in(&app.router, "admin@example.com", "999").await;

        let category = send(
            &app.router,
            "POST",
            "/categories",
            Some(json!({ "name": "Kitchen" })),
            Some(&admin),
        )
        .await;
        assert_eq!(category.status, StatusCode::CREATED);
        assert_eq!(category.body["data"]["name"], "Kitchen");

        let dup = send(
            &app.router,
            "POST",
            "/categories",
            Some(json!({ "name": "Kitchen" })),
            Some(&admin),
        )
        .await;
        assert_eq!(dup.status, StatusCode::BAD_REQUEST);
        assert_eq!(dup.body["message"], "Category already exists");

        let coupon = send(
            &app.router,
            "POST",
            "/coupons",
            Some(json!({ "code": "welcome", "discountPercent": 20 })),
            Some(&admin),
        )
        .await;
        assert_eq!(coupon.status, StatusCode::CREATED);
        assert_eq!(coupon.body["data"]["code"], "WELCOME");
    }

    #[tokio::test]
    async fn test_get_product_reads() {
        let app = test_app().await;
        let product = services::CatalogService::new(app.db.clone())
            .create_product(product_request("Mug", 9.5))
            .await
            .unwrap();

        let found = send(&app.router, "GET", &format!("/products/{}", product.id), None, None).await;
        assert_eq!(found.status, StatusCode::OK);
        assert_eq!(found.body["data"]["price"], 9.5);

        let listed = send(&app.router, "GET", "/products", None, None).await;
        assert_eq!(listed.body["data"].as_array().unwrap().len(), 1);

        let missing = send(&app.router, "GET", "/products/P_MISSING0", None, None).await;
        assert_eq!(missing.status, StatusCode::NOT_FOUND);
        assert_eq!(missing.body["message"], "Product not found");
    }
}
