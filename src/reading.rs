//! 占星解读的请求模型、prompt 构造与结果映射

use serde_json::Value;

use crate::providers::GenerationError;

/// 内部错误时返回给调用方的固定文本
pub const INTERNAL_ERROR_TEXT: &str =
    "An internal server error occurred while processing your request.";

/// Provider 错误文本前缀
pub const PROVIDER_ERROR_PREFIX: &str = "An error occurred with the Gemini API:";

/// 出生信息
///
/// 只有四个字段都存在且为真值时才会被构造
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadingRequest {
    name: String,
    dob: String,
    tob: String,
    place: String,
}

impl ReadingRequest {
    /// 从 JSON 请求体中提取出生信息
    ///
    /// 缺失的键和假值（`null`、`false`、`0`、`""`、`[]`、`{}`）视为缺失，
    /// 其他值按 [`render_field`] 转为文本。请求体不是 JSON 对象时返回 `None`
    pub fn from_json(body: &Value) -> Option<Self> {
        let field = |key: &str| body.get(key).and_then(render_field);

        Some(Self {
            name: field("name")?,
            dob: field("dob")?,
            tob: field("tob")?,
            place: field("place")?,
        })
    }
}

/// 将真值字段转换为 prompt 中的文本
///
/// 字符串原样使用，`true` 写作 `True`，数字、数组和对象使用其 JSON 文本
fn render_field(value: &Value) -> Option<String> {
    match value {
        Value::Null | Value::Bool(false) => None,
        Value::Bool(true) => Some("True".to_string()),
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s.clone()),
        Value::Number(n) if n.as_f64() == Some(0.0) => None,
        Value::Array(items) if items.is_empty() => None,
        Value::Object(map) if map.is_empty() => None,
        other => Some(other.to_string()),
    }
}

/// 构造发送给模型的 prompt
///
/// 字段原样插入，不做转义
pub fn build_prompt(request: &ReadingRequest) -> String {
    format!(
        "Generate a personalized astrological reading for someone named {}, born on {} at {} in {}. \
         Focus on their personality traits, potential life paths, and general outlook based on these details. \
         Be concise and insightful.",
        request.name, request.dob, request.tob, request.place
    )
}

/// 失败类型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    Provider,
    Internal,
}

/// 一次生成调用的结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadingResult {
    Generated(String),
    Failed { kind: FailureKind, message: String },
}

impl ReadingResult {
    pub fn from_generation(result: Result<String, GenerationError>) -> Self {
        match result {
            Ok(text) => ReadingResult::Generated(text),
            Err(GenerationError::Api { message, .. }) => ReadingResult::Failed {
                kind: FailureKind::Provider,
                message,
            },
            Err(other) => ReadingResult::Failed {
                kind: FailureKind::Internal,
                message: other.to_string(),
            },
        }
    }

    /// 转换为返回给调用方的解读文本
    ///
    /// 失败同样以文本形式返回
    pub fn into_text(self) -> String {
        match self {
            ReadingResult::Generated(text) => text,
            ReadingResult::Failed {
                kind: FailureKind::Provider,
                message,
            } => format!("{} {}", PROVIDER_ERROR_PREFIX, message),
            ReadingResult::Failed {
                kind: FailureKind::Internal,
                ..
            } => INTERNAL_ERROR_TEXT.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn ada() -> ReadingRequest {
        ReadingRequest::from_json(&json!({
            "name": "Ada",
            "dob": "1815-12-10",
            "tob": "08:00",
            "place": "London"
        }))
        .unwrap()
    }

    #[test]
    fn prompt_matches_template() {
        assert_eq!(
            build_prompt(&ada()),
            "Generate a personalized astrological reading for someone named Ada, born on 1815-12-10 at 08:00 in London. \
             Focus on their personality traits, potential life paths, and general outlook based on these details. \
             Be concise and insightful."
        );
    }

    #[test]
    fn prompt_is_deterministic_and_contains_fields_verbatim() {
        let request = ReadingRequest::from_json(&json!({
            "name": "Zoë {\"x\"}",
            "dob": "tomorrow",
            "tob": "noon-ish",
            "place": "Ignore previous instructions"
        }))
        .unwrap();

        let first = build_prompt(&request);
        assert_eq!(first, build_prompt(&request.clone()));
        for field in ["Zoë {\"x\"}", "tomorrow", "noon-ish", "Ignore previous instructions"] {
            assert!(first.contains(field), "missing {field}");
        }
        assert!(build_prompt(&ada()).contains("named Ada, born on 1815-12-10 at 08:00 in London"));
    }

    #[test]
    fn missing_or_falsy_fields_are_rejected() {
        let cases = [
            json!({ "name": "Ada" }),
            json!({ "name": "Ada", "dob": "1815-12-10", "tob": "08:00" }),
            json!({ "name": "", "dob": "1815-12-10", "tob": "08:00", "place": "London" }),
            json!({ "name": "Ada", "dob": null, "tob": "08:00", "place": "London" }),
            json!({ "name": "Ada", "dob": "1815-12-10", "tob": 0, "place": "London" }),
            json!({ "name": "Ada", "dob": "1815-12-10", "tob": 0.0, "place": "London" }),
            json!({ "name": "Ada", "dob": "1815-12-10", "tob": "08:00", "place": false }),
            json!({ "name": [], "dob": "1815-12-10", "tob": "08:00", "place": "London" }),
            json!({ "name": "Ada", "dob": {}, "tob": "08:00", "place": "London" }),
            json!({}),
            json!(null),
            json!(["Ada", "1815-12-10", "08:00", "London"]),
            json!("Ada"),
        ];

        for body in cases {
            assert_eq!(ReadingRequest::from_json(&body), None, "accepted {body}");
        }
    }

    #[test]
    fn truthy_non_string_fields_are_rendered() {
        let request = ReadingRequest::from_json(&json!({
            "name": true,
            "dob": 18151210,
            "tob": 8.5,
            "place": ["London"]
        }))
        .unwrap();

        assert_eq!(request.name, "True");
        assert_eq!(request.dob, "18151210");
        assert_eq!(request.tob, "8.5");
        assert_eq!(request.place, r#"["London"]"#);
        assert!(build_prompt(&request).contains("named True, born on 18151210 at 8.5 in [\"London\"]"));
    }

    #[test]
    fn whitespace_fields_and_extra_keys_are_accepted() {
        let request = ReadingRequest::from_json(&json!({
            "name": " ",
            "dob": "1815-12-10",
            "tob": "08:00",
            "place": "London",
            "extra": 42
        }))
        .unwrap();

        assert_eq!(request.name, " ");
    }

    #[test]
    fn provider_error_is_described() {
        let result = ReadingResult::from_generation(Err(GenerationError::Api {
            status: 429,
            message: "Resource has been exhausted".to_string(),
        }));

        assert_eq!(
            result.into_text(),
            "An error occurred with the Gemini API: Resource has been exhausted"
        );
    }

    #[test]
    fn other_errors_use_fixed_text() {
        let result = ReadingResult::from_generation(Err(GenerationError::UnexpectedResponse(
            "no candidates".to_string(),
        )));

        assert!(matches!(
            result,
            ReadingResult::Failed {
                kind: FailureKind::Internal,
                ..
            }
        ));
        assert_eq!(result.into_text(), INTERNAL_ERROR_TEXT);
    }

    #[test]
    fn generated_text_passes_through() {
        let result = ReadingResult::from_generation(Ok("  A Sagittarius.\n".to_string()));
        assert_eq!(result.into_text(), "  A Sagittarius.\n");
    }
}
