//! JSON body extractor whose rejections use the API error envelope

use async_trait::async_trait;
use axum::{
    extract::{FromRequest, Request},
    Json,
};
use serde::de::DeserializeOwned;
use tracing::warn;

use super::ApiError;

/// Drop-in for `axum::Json` in handlers. Malformed JSON, a wrong field type
/// or a missing `Content-Type` become a 400 `ApiError::ValidationError`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ApiJson<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for ApiJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(ApiJson(value)),
            Err(rejection) => {
                warn!(status = %rejection.status(), "Rejected request body");
                Err(ApiError::ValidationError(rejection.body_text()))
            }
        }
    }
}
