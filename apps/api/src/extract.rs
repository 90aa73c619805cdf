//! JSON body extractor whose rejections use the API error shape.

use axum::extract::{rejection::JsonRejection, FromRequest};

use crate::errors::AppError;

/// `axum::Json`, except a malformed or mistyped body is answered as an
/// `AppError::Validation` instead of axum's plain-text rejection.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct AppJson<T>(pub T);

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}
