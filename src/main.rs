//! Astrologer - 出生信息占星解读服务
//!
//! 接收姓名、出生日期、时间和地点，构造 prompt 调用 Gemini 生成解读文本。
//!
//! # 命令行接口
//!
//! - `serve`: 启动 API 服务器（默认命令）
//! - `test`: 向本地服务器发送示例请求

mod commands;
mod config;
mod gateway;
mod providers;
mod reading;
mod utils;

use anyhow::Result;
use clap::{Parser, Subcommand};
use config::Config;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Astrologer CLI
#[derive(Parser)]
#[command(name = "astrologer")]
#[command(about = "Astrological readings from birth details, powered by Gemini", long_about = None)]
#[command(version)]
struct Cli {
    /// TOML 配置文件路径（也可通过 ASTROLOGER_CONFIG 指定）
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// 可用的命令
#[derive(Subcommand)]
enum Commands {
    /// 启动 API 服务器
    Serve {
        /// 启动后不打开前端页面
        #[arg(long)]
        no_browser: bool,
    },
    /// 向本地服务器发送示例请求
    Test,
}

#[tokio::main]
async fn main() -> Result<()> {
    // 加载 .env 文件（如果存在）
    if let Ok(dotenv_path) = std::env::var("ASTROLOGER_ENV_FILE") {
        dotenvy::from_path(&dotenv_path).ok();
    } else {
        dotenvy::dotenv().ok();
    }

    // 初始化日志系统
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "astrologer=info".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_thread_ids(false)
                .with_thread_names(false),
        )
        .init();

    // 解析命令行参数和配置
    let cli = Cli::parse();
    let config_path = cli
        .config
        .or_else(|| std::env::var_os("ASTROLOGER_CONFIG").map(PathBuf::from));
    let config = Config::load(config_path.as_deref())?;

    match cli.command.unwrap_or(Commands::Serve { no_browser: false }) {
        Commands::Serve { no_browser } => commands::serve_command(config, no_browser).await,
        Commands::Test => commands::test_command(config).await,
    }
}
