use chrono::DateTime;

use super::models::{CreateCategoryRequest, CreateCouponRequest, CreateProductRequest};
use crate::common::validation::is_blank;
use crate::common::{ValidationResult, Validator};

pub struct CategoryValidator;

impl Validator<CreateCategoryRequest> for CategoryValidator {
    fn validate(&self, data: &CreateCategoryRequest) -> ValidationResult {
        let mut result = ValidationResult::new();

        if is_blank(&data.name) {
            result.add_error("name", "Category name is required");
        } else if data.name.as_deref().map_or(0, str::len) > 100 {
            result.add_error("name", "Category name must not exceed 100 characters");
        }

        result
    }
}

pub struct CouponValidator;

impl Validator<CreateCouponRequest> for CouponValidator {
    fn validate(&self, data: &CreateCouponRequest) -> ValidationResult {
        let mut result = ValidationResult::new();

        if is_blank(&data.code) {
            result.add_error("code", "Coupon code is required");
        } else if let Some(code) = &data.code {
            if !code.trim().chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_') {
                result.add_error(
                    "code",
                    "Coupon code may only contain letters, digits, '-' and '_'",
                );
            }
        }

        match data.discount_percent {
            None => result.add_error("discountPercent", "Discount is required"),
            Some(d) if !(1..=100).contains(&d) => {
                result.add_error("discountPercent", "Discount must be between 1 and 100")
            }
            Some(_) => {}
        }

        if let Some(expires_at) = &data.expires_at {
            if DateTime::parse_from_rfc3339(expires_at).is_err() {
                result.add_error("expiresAt", "Expiry must be an RFC 3339 timestamp");
            }
        }

        result
    }
}

pub struct ProductValidator;

impl Validator<CreateProductRequest> for ProductValidator {
    fn validate(&self, data: &CreateProductRequest) -> ValidationResult {
        let mut result = ValidationResult::new();

        if is_blank(&data.name) {
            result.add_error("name", "Product name is required");
        } else if data.name.as_deref().map_or(0, str::len) > 255 {
            result.add_error("name", "Product name must not exceed 255 characters");
        }

        match data.price {
            None => result.add_error("price", "Price is required"),
            Some(p) if !p.is_finite() || p < 0.0 => {
                result.add_error("price", "Price must be a non-negative number")
            }
            Some(_) => {}
        }

        if data.stock.map_or(false, |s| s < 0) {
            result.add_error("stock", "Stock must not be negative");
        }

        result
    }
}
