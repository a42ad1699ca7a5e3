//! HTTP 请求处理器

pub mod reading;

pub use reading::handle_astrology_reading;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// 请求校验错误
///
/// Display 文本即返回给调用方的错误消息
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RequestError {
    #[error("Request must be JSON")]
    NotJson,
    #[error("Missing birth details. Please provide name, date of birth, time of birth, and place of birth.")]
    MissingBirthDetails,
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

impl IntoResponse for RequestError {
    fn into_response(self) -> Response {
        let body = ErrorResponse {
            error: self.to_string(),
        };
        (StatusCode::BAD_REQUEST, Json(body)).into_response()
    }
}
