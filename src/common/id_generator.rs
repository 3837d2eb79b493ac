// src/common/id_generator.rs
//! Crockford Base32 ID Generator
//!
//! Every stored record gets a prefixed, human-readable ID such as
//! `U_K7NP3XY2` (user) or `P_8MWQT2ZA` (product). The random part uses the
//! Crockford alphabet, which has no I, L, O or U.

use rand::Rng;

/// Crockford Base32 alphabet (excludes I, L, O, U to avoid confusion)
const CROCKFORD_ALPHABET: &[u8; 32] = b"0123456789ABCDEFGHJKMNPQRSTVWXYZ";

/// Length of the random part of every generated ID
const ID_LENGTH: usize = 8;

/// Entity type prefixes for ID generation
#[derive(Debug, Clone, Copy)]
pub enum EntityPrefix {
    /// User (U_)
    User,
    /// One-time password record (O_)
    Otp,
    /// Cart (CT_)
    Cart,
    /// Cart line item (CI_)
    CartItem,
    /// Product (P_)
    Product,
    /// Category (CG_)
    Category,
    /// Coupon (CP_)
    Coupon,
}

impl EntityPrefix {
    /// Get the string prefix for this entity type
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityPrefix::User => "U",
            EntityPrefix::Otp => "O",
            EntityPrefix::Cart => "CT",
            EntityPrefix::CartItem => "CI",
            EntityPrefix::Product => "P",
            EntityPrefix::Category => "CG",
            EntityPrefix::Coupon => "CP",
        }
    }
}

/// Generate a random Crockford Base32 string of specified length
fn generate_crockford_string(length: usize) -> String {
    let mut rng = rand::thread_rng();
    (0..length)
        .map(|_| {
            let idx = rng.gen_range(0..32);
            CROCKFORD_ALPHABET[idx] as char
        })
        .collect()
}

/// Generate a prefixed ID, e.g. `generate_id(EntityPrefix::Cart)` -> `"CT_K7NP3XY2"`
pub fn generate_id(prefix: EntityPrefix) -> String {
    format!("{}_{}", prefix.as_str(), generate_crockford_string(ID_LENGTH))
}

pub fn generate_user_id() -> String {
    generate_id(EntityPrefix::User)
}

pub fn generate_otp_id() -> String {
    generate_id(EntityPrefix::Otp)
}

pub fn generate_cart_id() -> String {
    generate_id(EntityPrefix::Cart)
}

pub fn generate_cart_item_id() -> String {
    generate_id(EntityPrefix::CartItem)
}

pub fn generate_product_id() -> String {
    generate_id(EntityPrefix::Product)
}

pub fn generate_category_id() -> String {
    generate_id(EntityPrefix::Category)
}

pub fn generate_coupon_id() -> String {
    generate_id(EntityPrefix::Coupon)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_generate_id_format() {
        let user_id = generate_user_id();
        assert!(user_id.starts_with("U_"));
        assert_eq!(user_id.len(), 2 + ID_LENGTH);

        let cart_id = generate_cart_id();
        assert!(cart_id.starts_with("CT_"));
        assert_eq!(cart_id.len(), 3 + ID_LENGTH);
    }

    #[test]
    fn test_crockford_alphabet_only() {
        let id = generate_product_id();
        let random_part = &id[2..]; // Skip "P_"

        for c in random_part.chars() {
            assert!(
                CROCKFORD_ALPHABET.contains(&(c as u8)),
                "Character '{}' not in Crockford alphabet",
                c
            );
        }
    }

    #[test]
    fn test_uniqueness() {
        let mut ids = HashSet::new();
        for _ in 0..1000 {
            let id = generate_user_id();
            assert!(ids.insert(id), "Duplicate ID generated");
        }
    }

    #[test]
    fn test_all_prefixes() {
        assert!(generate_user_id().starts_with("U_"));
        assert!(generate_otp_id().starts_with("O_"));
        assert!(generate_cart_id().starts_with("CT_"));
        assert!(generate_cart_item_id().starts_with("CI_"));
        assert!(generate_product_id().starts_with("P_"));
        assert!(generate_category_id().starts_with("CG_"));
        assert!(generate_coupon_id().starts_with("CP_"));
    }
}
