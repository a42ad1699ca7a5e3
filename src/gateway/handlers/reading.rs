//! 占星解读处理器

use axum::{
    body::Bytes,
    extract::State,
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::Value;

use crate::gateway::{handlers::RequestError, state::AppState};
use crate::reading::{build_prompt, FailureKind, ReadingRequest, ReadingResult};

#[derive(Serialize)]
struct ReadingResponse {
    reading: String,
}

/// POST /get-astrology-reading 处理器
///
/// 校验失败返回 400；生成失败时仍返回 200，错误说明放在 `reading` 字段中
pub async fn handle_astrology_reading(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let request = match parse_request(&headers, &body) {
        Ok(request) => request,
        Err(err) => return err.into_response(),
    };

    let prompt = build_prompt(&request);
    let generator = state.generator();

    tracing::info!(
        model = generator.model(),
        prompt_len = prompt.len(),
        "request"
    );

    let result = ReadingResult::from_generation(generator.generate(&prompt).await);
    if let ReadingResult::Failed { kind, message } = &result {
        match kind {
            FailureKind::Provider => tracing::error!(error = %message, "Gemini API error"),
            FailureKind::Internal => tracing::error!(error = %message, "unexpected error"),
        }
    }

    let body = ReadingResponse {
        reading: result.into_text(),
    };
    (StatusCode::OK, Json(body)).into_response()
}

/// 校验 Content-Type 和请求体，提取出生信息
fn parse_request(headers: &HeaderMap, body: &[u8]) -> Result<ReadingRequest, RequestError> {
    if !is_json_content_type(headers) {
        return Err(RequestError::NotJson);
    }

    let value: Value = serde_json::from_slice(body).map_err(|_| RequestError::NotJson)?;
    ReadingRequest::from_json(&value).ok_or(RequestError::MissingBirthDetails)
}

/// `application/json` 或 `application/*+json`，忽略参数和大小写
fn is_json_content_type(headers: &HeaderMap) -> bool {
    let Some(content_type) = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
    else {
        return false;
    };

    let mime = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();

    mime == "application/json" || (mime.starts_with("application/") && mime.ends_with("+json"))
}
