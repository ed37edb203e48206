//! 日志初始化
//!
//! 库内部只经过 `log` 门面输出。命令行程序在启动时调用 [`init`]，
//! 退出前调用 [`shutdown`] 把异步缓冲写入文件。

use flexi_logger::{
    Cleanup, Criterion, Duplicate, FileSpec, FlexiLoggerError, Logger, LoggerHandle, Naming,
    WriteMode,
};
use parking_lot::{const_mutex, Mutex};

use crate::config::LogConfig;

static LOGGER_HANDLE: Mutex<Option<LoggerHandle>> = const_mutex(None);

/// 按配置构造文件日志器，告警以上同时输出到标准错误
fn build_logger(config: &LogConfig) -> Result<Logger, FlexiLoggerError> {
    Ok(Logger::try_with_str(&config.level)?
        .log_to_file(
            FileSpec::default()
                .basename(&config.file)
                .directory(&config.dir),
        )
        .rotate(
            Criterion::Size(config.max_file_size),
            Naming::Numbers,
            Cleanup::KeepLogFiles(config.max_files),
        )
        .duplicate_to_stderr(Duplicate::Warn)
        .write_mode(WriteMode::Async)
        .append())
}

/// 启动文件日志；重复调用时保留第一次的日志器
///
/// ```no_run
/// use relopt::config::LogConfig;
/// use relopt::utils::logging;
///
/// logging::init(&LogConfig::default()).unwrap();
/// log::info!("开始优化");
/// logging::shutdown();
/// ```
pub fn init(config: &LogConfig) -> Result<(), FlexiLoggerError> {
    let mut slot = LOGGER_HANDLE.lock();
    if slot.is_some() {
        return Ok(());
    }
    *slot = Some(build_logger(config)?.start()?);
    log::info!("日志写入 {}/{}，级别 {}", config.dir, config.file, config.level);
    Ok(())
}

/// 写完缓冲中的日志并释放日志器
pub fn shutdown() {
    if let Some(handle) = LOGGER_HANDLE.lock().take() {
        handle.flush();
    }
}

pub fn is_initialized() -> bool {
    LOGGER_HANDLE.lock().is_some()
}
