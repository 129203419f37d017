//! 日志基础设施

use anyhow::Result;
use std::io;
use tracing_appender::{non_blocking, non_blocking::WorkerGuard, rolling};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::core::config::LoggingConfig;

/// 初始化日志系统
///
/// - 按日期分割的文件日志写入 `log_path/file_prefix.YYYY-MM-DD`
/// - 可选的控制台输出写到 stderr（stdout 留给界面渲染）
/// - 级别取自配置，`RUST_LOG` 存在时优先
///
/// 返回的 guard 必须在程序退出前保持存活，否则缓冲中的日志会丢失。
pub fn init_logging(config: &LoggingConfig) -> Result<WorkerGuard> {
    std::fs::create_dir_all(&config.log_path)?;

    let file_appender = rolling::daily(&config.log_path, &config.file_prefix);
    let (non_blocking, guard) = non_blocking(file_appender);

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    let console = config
        .console_output
        .then(|| fmt::layer().with_writer(io::stderr).with_ansi(true));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_target(false),
        )
        .with(console)
        .try_init()?;

    Ok(guard)
}
