//! Serve 命令 - 启动 API 服务器

use anyhow::Result;

use crate::config::Config;
use crate::gateway;

/// 执行服务器启动命令
///
/// # 参数
///
/// * `config` - 应用配置
/// * `no_browser` - 为 true 时不在启动后打开前端页面，覆盖配置项
///
/// Gemini API 密钥缺失时直接返回错误，不会监听端口
pub async fn serve_command(mut config: Config, no_browser: bool) -> Result<()> {
    if no_browser {
        config.open_browser = false;
    }
    gateway::serve(config).await
}
