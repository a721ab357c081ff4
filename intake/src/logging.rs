//! ロギング初期化
//!
//! `SURVEY_LOG_LEVEL`（旧: `RUST_LOG`）からフィルタを組み立て、
//! 非ブロッキングのstdoutライターでtracingサブスクライバを登録する。

use crate::common::error::{CommonError, CommonResult};
use crate::config::get_env_with_fallback_or;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

/// デフォルトのログレベル
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// フィルタ文字列を解決する
pub fn log_filter() -> String {
    get_env_with_fallback_or("SURVEY_LOG_LEVEL", "RUST_LOG", DEFAULT_LOG_LEVEL)
}

/// グローバルサブスクライバを初期化する
///
/// 返り値のガードはプロセス終了まで保持すること（dropでバッファがflushされる）。
pub fn init() -> CommonResult<WorkerGuard> {
    let filter = EnvFilter::try_new(log_filter())
        .map_err(|e| CommonError::Config(format!("invalid log filter: {e}")))?;
    let (writer, guard) = tracing_appender::non_blocking(std::io::stdout());

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_target(false)
        .try_init()
        .map_err(|e| CommonError::Config(format!("failed to install subscriber: {e}")))?;

    Ok(guard)
}
