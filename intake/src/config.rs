//! Configuration management via environment variables
//!
//! Provides helper functions for reading environment variables with fallback
//! to legacy variable names, and the `IntakeConfig` aggregate.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Get an environment variable with fallback to a legacy name
///
/// If the new variable name is set, returns its value.
/// If only the legacy variable name is set, returns its value
/// and logs a deprecation warning.
///
/// # Example
/// ```
/// use survey_intake::config::get_env_with_fallback;
///
/// let port = get_env_with_fallback("SURVEY_PORT", "PORT");
/// ```
pub fn get_env_with_fallback(new_name: &str, old_name: &str) -> Option<String> {
    if let Ok(val) = std::env::var(new_name) {
        return Some(val);
    }
    if let Ok(val) = std::env::var(old_name) {
        if new_name != old_name {
            tracing::warn!(
                "Environment variable '{}' is deprecated, use '{}' instead",
                old_name,
                new_name
            );
        }
        return Some(val);
    }
    None
}

/// Get an environment variable with fallback and default value
pub fn get_env_with_fallback_or(new_name: &str, old_name: &str, default: &str) -> String {
    get_env_with_fallback(new_name, old_name).unwrap_or_else(|| default.to_string())
}

/// Get an environment variable with fallback, parsing to a specific type
///
/// Falls back to `default` if neither is set or parsing fails.
pub fn get_env_with_fallback_parse<T: std::str::FromStr>(
    new_name: &str,
    old_name: &str,
    default: T,
) -> T {
    get_env_with_fallback(new_name, old_name)
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}

/// サービス設定
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntakeConfig {
    /// ホストアドレス (デフォルト: "127.0.0.1")
    #[serde(default = "default_host")]
    pub host: String,

    /// ポート番号 (デフォルト: 5000)
    #[serde(default = "default_port")]
    pub port: u16,

    /// NDJSONログのパス (デフォルト: "data/survey.ndjson")
    #[serde(default = "default_data_path")]
    pub data_path: PathBuf,

    /// `/v1/` 配下で許可するCORSオリジン（`*` は全許可）
    #[serde(default = "default_cors_origins")]
    pub cors_origins: Vec<String>,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    5000
}

fn default_data_path() -> PathBuf {
    PathBuf::from("data").join("survey.ndjson")
}

fn default_cors_origins() -> Vec<String> {
    vec!["*".to_string()]
}

impl Default for IntakeConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            data_path: default_data_path(),
            cors_origins: default_cors_origins(),
        }
    }
}

impl IntakeConfig {
    /// 環境変数から設定を読み込む
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let host = get_env_with_fallback_or("SURVEY_HOST", "HOST", &defaults.host);
        let port = get_env_with_fallback_parse("SURVEY_PORT", "PORT", defaults.port);
        let data_path = get_env_with_fallback("SURVEY_DATA_PATH", "RESULTS_PATH")
            .map(PathBuf::from)
            .unwrap_or(defaults.data_path);
        let cors_origins = get_env_with_fallback("SURVEY_CORS_ORIGINS", "SURVEY_CORS_ORIGINS")
            .map(|raw| parse_origins(&raw))
            .filter(|origins| !origins.is_empty())
            .unwrap_or(defaults.cors_origins);

        Self {
            host,
            port,
            data_path,
            cors_origins,
        }
    }

    /// `host:port` 形式のバインドアドレス
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// 全オリジン許可か
    pub fn allows_any_origin(&self) -> bool {
        self.cors_origins.iter().any(|o| o == "*")
    }
}

/// カンマ区切りのオリジン一覧を分解する
fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
