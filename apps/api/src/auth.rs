//! Identity extraction. The identity provider sits in front of this service and
//! forwards the signed-in user's stable id in the `x-user-id` header.

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};

use crate::errors::AppError;

pub const USER_ID_HEADER: &str = "x-user-id";

/// Stable id of the signed-in user. Rejects the request with 401 when absent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OwnerId(pub String);

#[async_trait]
impl<S> FromRequestParts<S> for OwnerId
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .headers
            .get(USER_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(|id| OwnerId(id.to_string()))
            .ok_or(AppError::Unauthorized)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    async fn extract(header: Option<&str>) -> Result<OwnerId, AppError> {
        let mut builder = Request::builder().uri("/");
        if let Some(value) = header {
            builder = builder.header(USER_ID_HEADER, value);
        }
        let (mut parts, _) = builder.body(()).unwrap().into_parts();
        OwnerId::from_request_parts(&mut parts, &()).await
    }

    #[tokio::test]
    async fn test_header_is_extracted_and_trimmed() {
        assert_eq!(
            extract(Some(" user_2abc ")).await.unwrap(),
            OwnerId("user_2abc".to_string())
        );
    }

    #[tokio::test]
    async fn test_missing_or_blank_header_is_unauthorized() {
        assert!(matches!(extract(None).await, Err(AppError::Unauthorized)));
        assert!(matches!(extract(Some("  ")).await, Err(AppError::Unauthorized)));
    }
}
