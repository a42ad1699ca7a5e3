//! 文本生成 Provider 抽象层
//!
//! 定义生成 API 的统一接口和错误分类，具体实现见 `gemini`

pub mod gemini;

use async_trait::async_trait;
use thiserror::Error;

pub use gemini::GeminiClient;

/// 生成调用的失败分类
#[derive(Debug, Error)]
pub enum GenerationError {
    /// Provider 明确返回的错误（认证失败、限流、请求非法等）
    #[error("Gemini API error {status}: {message}")]
    Api { status: u16, message: String },

    /// 网络层失败（连接、TLS、读取响应体）
    #[error("Request to Gemini API failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// 2xx 响应但内容无法解析或不含文本
    #[error("Unexpected Gemini API response: {0}")]
    UnexpectedResponse(String),
}

/// Generator Trait - 文本生成服务的统一接口
#[async_trait]
pub trait Generator: Send + Sync {
    /// 使用的模型标识（用于日志）
    fn model(&self) -> &str;

    /// 以 prompt 调用生成 API，返回生成的文本
    async fn generate(&self, prompt: &str) -> Result<String, GenerationError>;
}
