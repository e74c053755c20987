//! 日志基础设施
//!
//! 基于 `tracing` 的结构化日志。`RUST_LOG` 优先于配置的级别；
//! 指定日志目录时输出到按天滚动的文件，
//! 否则输出到 stdout。

use std::path::Path;

use tracing_subscriber::EnvFilter;

/// 初始化日志，可选级别 (默认 `info`) 和文件输出
pub fn init_logger_with_file(log_level: Option<&str>, log_dir: Option<&str>) {
    let level = log_level.unwrap_or("info");
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("blog_server={level},tower_http={level},security={level},{level}")));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_file(false)
        .with_line_number(false)
        .with_thread_ids(false)
        .with_target(true);

    if let Some(dir) = log_dir {
        let log_path = Path::new(dir);
        if std::fs::create_dir_all(log_path).is_ok()
            && let Some(dir_str) = log_path.to_str()
        {
            let file_appender = tracing_appender::rolling::daily(dir_str, "blog-server");
            subscriber.with_ansi(false).with_writer(file_appender).init();
            return;
        }
        eprintln!("Log directory {dir} is not usable, logging to stdout");
    }

    subscriber.init();
}
