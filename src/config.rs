//! 应用配置模块
//!
//! 配置来源（优先级从低到高）：
//! - 内置默认值
//! - 可选的 TOML 配置文件
//! - 环境变量
//!
//! 配置在启动时加载一次，之后只读

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::providers::gemini::GEMINI_API_BASE_URL;

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 5000;
const DEFAULT_FRONTEND: &str = "index.html";

/// 应用配置
#[derive(Clone)]
pub struct Config {
    /// 服务器监听地址（如 "0.0.0.0" 或 "127.0.0.1"）
    pub host: String,
    /// 服务器监听端口
    pub port: u16,
    /// Gemini API 根地址
    pub gemini_base_url: String,
    /// 启动时在浏览器中打开的前端页面
    pub frontend: PathBuf,
    /// 启动时是否打开浏览器
    pub open_browser: bool,
    gemini_api_key: String,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("gemini_base_url", &self.gemini_base_url)
            .field("frontend", &self.frontend)
            .field("open_browser", &self.open_browser)
            .field("gemini_api_key", &"<redacted>")
            .finish()
    }
}

/// TOML 配置文件结构，所有字段可选
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    host: Option<String>,
    port: Option<u16>,
    gemini_api_key: Option<String>,
    gemini_base_url: Option<String>,
    frontend: Option<PathBuf>,
    open_browser: Option<bool>,
}

impl FileConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        toml::from_str(&content)
            .with_context(|| format!("Invalid config file {}", path.display()))
    }
}

impl Config {
    /// 从配置文件（如果提供）和进程环境变量加载配置
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        let file = match config_path {
            Some(path) => FileConfig::load(path)?,
            None => FileConfig::default(),
        };
        Self::from_sources(file, |key| std::env::var(key).ok())
    }

    /// 合并配置文件与环境变量
    ///
    /// # 环境变量
    ///
    /// - `ASTROLOGER_HOST`: 服务器监听地址（默认: "0.0.0.0"）
    /// - `ASTROLOGER_PORT`: 服务器监听端口（默认: 5000）
    /// - `GEMINI_API_KEY`: Gemini API 密钥（`serve` 必需）
    /// - `ASTROLOGER_GEMINI_BASE_URL`: Gemini API 根地址
    /// - `ASTROLOGER_FRONTEND`: 前端 HTML 文件路径（默认: "index.html"）
    /// - `ASTROLOGER_OPEN_BROWSER`: 启动时是否打开浏览器（默认: true）
    ///
    /// 值为空的环境变量视为未设置
    pub fn from_sources<F>(file: FileConfig, env: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let env = |key: &str| env(key).filter(|v| !v.is_empty());

        let host = env("ASTROLOGER_HOST")
            .or(file.host)
            .unwrap_or_else(|| DEFAULT_HOST.to_string());

        let port = match env("ASTROLOGER_PORT") {
            Some(raw) => raw
                .parse()
                .context("ASTROLOGER_PORT must be a valid port number")?,
            None => file.port.unwrap_or(DEFAULT_PORT),
        };

        let gemini_api_key = env("GEMINI_API_KEY")
            .or(file.gemini_api_key)
            .unwrap_or_default();

        let gemini_base_url = env("ASTROLOGER_GEMINI_BASE_URL")
            .or(file.gemini_base_url)
            .unwrap_or_else(|| GEMINI_API_BASE_URL.to_string());

        let frontend = env("ASTROLOGER_FRONTEND")
            .map(PathBuf::from)
            .or(file.frontend)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_FRONTEND));

        let open_browser = match env("ASTROLOGER_OPEN_BROWSER") {
            Some(raw) => parse_bool(&raw)
                .with_context(|| format!("ASTROLOGER_OPEN_BROWSER must be a boolean, got {raw:?}"))?,
            None => file.open_browser.unwrap_or(true),
        };

        Ok(Self {
            host,
            port,
            gemini_base_url,
            frontend,
            open_browser,
            gemini_api_key,
        })
    }

    /// 获取 Gemini API 密钥
    ///
    /// # 错误
    ///
    /// 密钥未设置或为空白时返回错误，服务器不会启动
    pub fn gemini_api_key(&self) -> Result<&str> {
        let key = self.gemini_api_key.trim();
        if key.is_empty() {
            bail!("GEMINI_API_KEY is not set. Provide it via the environment, a .env file or the config file.");
        }
        Ok(key)
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
