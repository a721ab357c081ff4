//! APIエラーレスポンス型
//!
//! axum用の共通エラーハンドリング

use crate::common::error::IntakeError;
use axum::{response::IntoResponse, Json};
use tracing::{debug, error};

/// Axum用のエラーレスポンス型
#[derive(Debug)]
pub struct AppError(pub IntakeError);

impl<E> From<E> for AppError
where
    E: Into<IntakeError>,
{
    fn from(err: E) -> Self {
        AppError(err.into())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let status = self.0.status_code();
        // 5xxは詳細をログにのみ残し、レスポンスには汎用メッセージを返す
        if status.is_server_error() {
            error!(kind = self.0.error_kind(), error = %self.0, "Request failed");
        } else {
            debug!(kind = self.0.error_kind(), error = %self.0, "Request rejected");
        }

        (status, Json(self.0.to_error_body())).into_response()
    }
}
