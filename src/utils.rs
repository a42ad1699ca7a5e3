use anyhow::{Context, Result};
use std::borrow::Cow;
use std::path::Path;
use std::time::Duration;

/// 将前端 HTML 文件路径转换为 `file://` URL
///
/// 相对路径基于当前工作目录解析，路径各段做百分号编码
pub fn frontend_url(path: &Path) -> Result<String> {
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .context("Failed to resolve current directory")?
            .join(path)
    };

    let normalized = absolute.to_string_lossy().replace('\\', "/");
    let encoded = normalized
        .split('/')
        .map(|segment| {
            // Windows 盘符（如 `C:`）保持原样
            if segment.ends_with(':') {
                Cow::Borrowed(segment)
            } else {
                urlencoding::encode(segment)
            }
        })
        .collect::<Vec<_>>()
        .join("/");

    let separator = if encoded.starts_with('/') { "" } else { "/" };
    Ok(format!("file://{}{}", separator, encoded))
}

/// 延迟后在默认浏览器中打开 URL
///
/// 后台执行，失败只记录警告，不影响服务器
pub fn spawn_browser_launch(url: String, delay: Duration) {
    tokio::spawn(async move {
        tokio::time::sleep(delay).await;
        tracing::debug!("Attempting to open frontend at {}", url);

        match open::that_detached(&url) {
            Ok(()) => tracing::info!("Opened frontend: {}", url),
            Err(e) => tracing::warn!("Failed to open browser: {}", e),
        }
    });
}
