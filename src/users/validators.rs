use super::models::{LoginRequest, SignupRequest};
use crate::common::validation::{is_blank, looks_like_email};
use crate::common::{ValidationResult, Validator};

pub struct SignupValidator;

impl Validator<SignupRequest> for SignupValidator {
    fn validate(&self, data: &SignupRequest) -> ValidationResult {
        let mut result = ValidationResult::new();

        let missing = [
            ("name", &data.name),
            ("email", &data.email),
            ("phone", &data.phone),
            ("password", &data.password),
        ]
        .into_iter()
        .find(|(_, value)| is_blank(value));

        if let Some((field, _)) = missing {
            result.add_error(field, "All fields are required");
            return result;
        }

        if let Some(email) = &data.email {
            if !looks_like_email(email) {
                result.add_error("email", "Email is invalid");
            }
        }

        result
    }
}

pub struct LoginValidator;

impl Validator<LoginRequest> for LoginValidator {
    fn validate(&self, data: &LoginRequest) -> ValidationResult {
        let mut result = ValidationResult::new();

        if is_blank(&data.email) || is_blank(&data.password) {
            result.add_error("credentials", "Email and password are required");
        }

        result
    }
}
