//! エラー型定義
//!
//! 統一エラー型（thiserror使用）
//!
//! `IntakeError` は `error_kind()` と `status_code()` を提供し、
//! `{"error": <kind>, "detail": ...}` 形式のエラーレスポンスを生成できます。

use crate::common::types::ValidationFailure;
use axum::http::StatusCode;
use serde::Serialize;
use serde_json::Value;
use std::path::PathBuf;
use thiserror::Error;

/// Common layer error type
#[derive(Debug, Error)]
pub enum CommonError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// レコードストアのI/Oエラー
#[derive(Debug, Error)]
pub enum StorageError {
    /// 親ディレクトリの作成に失敗
    #[error("Failed to create directory {path}: {source}")]
    CreateDir {
        /// 作成しようとしたディレクトリ
        path: PathBuf,
        /// 原因
        #[source]
        source: std::io::Error,
    },

    /// ログファイルのオープンに失敗
    #[error("Failed to open {path}: {source}")]
    Open {
        /// ログファイル
        path: PathBuf,
        /// 原因
        #[source]
        source: std::io::Error,
    },

    /// ファイルロックの取得・解除に失敗
    #[error("Failed to lock {path}: {source}")]
    Lock {
        /// ログファイル
        path: PathBuf,
        /// 原因
        #[source]
        source: std::io::Error,
    },

    /// 書き込みに失敗
    #[error("Failed to write {path}: {source}")]
    Write {
        /// ログファイル
        path: PathBuf,
        /// 原因
        #[source]
        source: std::io::Error,
    },

    /// レコードのシリアライズに失敗
    #[error("Failed to serialize record: {0}")]
    Serialize(#[from] serde_json::Error),

    /// 書き込みタスクが異常終了
    #[error("Storage task failed: {0}")]
    Join(String),
}

/// Intake service error type
#[derive(Debug, Error)]
pub enum IntakeError {
    /// Common layer error
    #[error(transparent)]
    Common(#[from] CommonError),

    /// 本文がJSONオブジェクトとして解釈できない
    #[error("Invalid JSON body: {0}")]
    InvalidJson(String),

    /// 検証エラー
    #[error(transparent)]
    Validation(#[from] ValidationFailure),

    /// 永続化エラー
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntakeError {
    /// レスポンスの `error` フィールドに入る安定した種別タグ
    pub fn error_kind(&self) -> &'static str {
        match self {
            Self::InvalidJson(_) => "invalid_json",
            Self::Validation(_) => "validation_error",
            Self::Storage(_) => "storage_error",
            Self::Common(_) | Self::Internal(_) => "internal_error",
        }
    }

    /// Returns the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidJson(_) => StatusCode::BAD_REQUEST,
            Self::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Common(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Returns a detail value that is safe for external clients.
    ///
    /// I/O paths and internal messages only go to the server log.
    pub fn external_detail(&self) -> Value {
        match self {
            Self::InvalidJson(_) => Value::from("Body must be application/json"),
            Self::Validation(failure) => {
                serde_json::to_value(&failure.errors).unwrap_or(Value::Array(Vec::new()))
            }
            Self::Storage(_) => Value::from("Failed to persist submission"),
            Self::Common(_) | Self::Internal(_) => Value::from("Internal server error"),
        }
    }

    /// Converts this error to the wire error body.
    pub fn to_error_body(&self) -> ErrorBody {
        ErrorBody {
            error: self.error_kind().to_string(),
            detail: self.external_detail(),
        }
    }
}

/// エラーレスポンス本文
///
/// ```json
/// { "error": "validation_error", "detail": [ { "loc": ["email"], "msg": "Field required", "type": "missing" } ] }
/// ```
#[derive(Debug, Clone, Serialize)]
pub struct ErrorBody {
    /// 種別タグ
    pub error: String,
    /// 詳細
    pub detail: Value,
}

/// Result type alias (Common)
pub type CommonResult<T> = Result<T, CommonError>;
