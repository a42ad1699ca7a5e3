//! Gemini Provider
//!
//! 通过 REST `generateContent` 接口调用 Gemini 模型

mod constants;

use anyhow::{Context, Result};
use async_trait::async_trait;
use http::{header, HeaderMap, HeaderValue};
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::providers::{GenerationError, Generator};

pub use constants::GEMINI_API_BASE_URL;
use constants::GEMINI_MODEL;

/// Gemini API 客户端
///
/// 构造一次后在所有请求间只读共享
pub struct GeminiClient {
    client: Client,
    base_url: String,
    model: String,
}

impl GeminiClient {
    /// 创建客户端
    ///
    /// # 参数
    ///
    /// * `api_key` - Gemini API 密钥，作为默认请求头附加到每个请求
    /// * `base_url` - API 根地址（如 `https://generativelanguage.googleapis.com/v1beta`）
    ///
    /// 不设置请求超时，沿用 reqwest 的默认行为
    pub fn new(api_key: &str, base_url: &str) -> Result<Self> {
        let mut key = HeaderValue::from_str(api_key).context("Invalid Gemini API key for header")?;
        key.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(constants::GEMINI_API_KEY_HEADER, key);
        headers.insert(header::ACCEPT, HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .user_agent(constants::user_agent())
            .default_headers(headers)
            .build()
            .context("Failed to create Gemini API client")?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            model: GEMINI_MODEL.to_string(),
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url, self.model)
    }
}

#[async_trait]
impl Generator for GeminiClient {
    fn model(&self) -> &str {
        &self.model
    }

    async fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
        let body = GenerateContentRequest {
            contents: vec![Content {
                role: Some("user".to_string()),
                parts: vec![Part {
                    text: Some(prompt.to_string()),
                    thought: None,
                }],
            }],
        };

        let response = self.client.post(self.endpoint()).json(&body).send().await?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            return Err(GenerationError::Api {
                status: status.as_u16(),
                message: parse_error_message(status, &text),
            });
        }

        let parsed: GenerateContentResponse = serde_json::from_str(&text)
            .map_err(|e| GenerationError::UnexpectedResponse(e.to_string()))?;
        parsed.into_text()
    }
}

/// 从错误响应中提取人类可读的消息
///
/// 优先使用 Google 错误信封中的 `error.message`，其次是原始响应体，
/// 响应体为空时退回到 HTTP 状态描述
fn parse_error_message(status: reqwest::StatusCode, body: &str) -> String {
    if let Ok(envelope) = serde_json::from_str::<ErrorEnvelope>(body) {
        return envelope.error.message;
    }

    let body = body.trim();
    if body.is_empty() {
        status
            .canonical_reason()
            .unwrap_or("Unknown error")
            .to_string()
    } else {
        body.to_string()
    }
}

#[derive(Debug, Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    thought: Option<bool>,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

impl GenerateContentResponse {
    /// 拼接第一个候选中所有非 thought 的文本片段
    fn into_text(self) -> Result<String, GenerationError> {
        let content = self
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .ok_or_else(|| GenerationError::UnexpectedResponse("no candidates".to_string()))?;

        let texts: Vec<String> = content
            .parts
            .into_iter()
            .filter(|p| !p.thought.unwrap_or(false))
            .filter_map(|p| p.text)
            .collect();

        if texts.is_empty() {
            return Err(GenerationError::UnexpectedResponse(
                "candidate has no text parts".to_string(),
            ));
        }

        Ok(texts.concat())
    }
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}
