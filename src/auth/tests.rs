//! Tests for auth module
//!
//! These tests verify core authentication functionality including:
//! - Access/refresh token signing and validation
//! - The token-issuing service
//! - Bearer and cookie authentication on protected routes

#[cfg(test)]
mod tests {
    use super::super::*;
    use crate::common::config::{AppConfig, TokenConfig};
    use crate::common::test_support::{memory_pool, send, signed_in, test_app};
    use crate::common::ApiError;
    use crate::users::models::{NewUser, User, ROLE_USER};
    use crate::users::services::UserService;
    use axum::http::StatusCode;
    use jsonwebtoken::{encode, EncodingKey, Header};

    fn token_config() -> TokenConfig {
        AppConfig::for_tests().tokens
    }

    fn sample_user() -> User {
        User {
            id: "U_TEST0001".to_string(),
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            phone: "111".to_string(),
            password: "hash".to_string(),
            role: ROLE_USER.to_string(),
            status: "pending".to_string(),
            refresh_token: None,
            created_at: "2024-01-01T00:00:00.000000Z".to_string(),
            updated_at: "2024-01-01T00:00:00.000000Z".to_string(),
        }
    }

    #[test]
    fn test_access_token_round_trip_claims() {
        let config = token_config();
        let token = tokens::generate_access_token(&config, &sample_user()).unwrap();

        let claims = tokens::decode_access_token(&config, &token).unwrap();
        assert_eq!(claims.sub, "U_TEST0001");
        assert_eq!(claims.email, "ada@example.com");
        assert_eq!(claims.role, ROLE_USER);
        assert_eq!(claims.exp - claims.iat, 15 * 60);
    }

    #[test]
    fn test_refresh_token_is_not_an_access_token() {
        let config = token_config();
        let refresh = tokens::generate_refresh_token(&config, &sample_user()).unwrap();

        assert!(tokens::decode_refresh_token(&config, &refresh).is_ok());
        assert!(tokens::decode_access_token(&config, &refresh).is_err());
    }

    #[test]
    fn test_each_token_is_unique() {
        let config = token_config();
        let user = sample_user();
        let a = tokens::generate_refresh_token(&config, &user).unwrap();
        let b = tokens::generate_refresh_token(&config, &user).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_expired_access_token_is_rejected() {
        let config = token_config();
        let claims = models::AccessClaims {
            sub: "U_TEST0001".to_string(),
            email: "ada@example.com".to_string(),
            name: "Ada".to_string(),
            role: ROLE_USER.to_string(),
            exp: 1_000,
            iat: 0,
            jti: "j".to_string(),
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(config.access_secret.as_bytes()),
        )
        .unwrap();

        assert!(tokens::decode_access_token(&config, &token).is_err());
    }

    #[tokio::test]
    async fn test_token_service_persists_refresh_token() {
        let db = memory_pool().await;
        let users = UserService::new(db.clone());
        let user = users
            .create_user(NewUser {
                name: "Ada".to_string(),
                email: "ada@example.com".to_string(),
                phone: "111".to_string(),
                password_hash: "hash".to_string(),
                role: ROLE_USER,
            })
            .await
            .unwrap();

        let pair = tokens::generate_access_and_refresh_tokens(&db, &token_config(), &user.id)
            .await
            .unwrap();

        let stored = users.find_by_id(&user.id).await.unwrap().unwrap();
        assert_eq!(stored.refresh_token, Some(pair.refresh_token));
    }

    #[tokio::test]
    async fn test_token_service_unknown_user_is_not_found() {
        let db = memory_pool().await;
        let result =
            tokens::generate_access_and_refresh_tokens(&db, &token_config(), "U_MISSING0").await;

        assert!(matches!(result, Err(ApiError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_bearer_header_authenticates() {
        let app = test_app().await;
        let cookie = signed_in(&app.router, "ada@example.com", "111").await;
        let token = cookie.trim_start_matches("accessToken=").to_string();

        let request = axum::http::Request::builder()
            .uri("/users/me")
            .header("Authorization", format!("Bearer {}", token))
            .body(axum::body::Body::empty())
            .unwrap();
        let response = tower::ServiceExt::oneshot(app.router.clone(), request)
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_lowercase_bearer_scheme_authenticates() {
        let app = test_app().await;
        let cookie = signed_in(&app.router, "ada@example.com", "111").await;
        let token = cookie.trim_start_matches("accessToken=").to_string();

        let request = axum::http::Request::builder()
            .uri("/users/me")
            .header("Authorization", format!("bearer {}", token))
            .body(axum::body::Body::empty())
            .unwrap();
        let response = tower::ServiceExt::oneshot(app.router.clone(), request)
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_garbage_token_is_unauthorized() {
        let app = test_app().await;
        let response = send(&app.router, "GET", "/users/me", None, Some("accessToken=garbage")).await;

        assert_eq!(response.status, StatusCode::UNAUTHORIZED);
        assert_eq!(response.body["success"], false);
    }
}
