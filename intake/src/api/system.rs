//! System API (liveness check).

use crate::AppState;
use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

/// `GET /ping` レスポンス
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PingResponse {
    /// 常に `"ok"`
    pub status: String,
    /// 固定メッセージ
    pub message: String,
    /// サーバーの現在時刻（RFC 3339, UTC）
    pub utc_time: String,
}

/// GET /ping
pub async fn ping(State(state): State<AppState>) -> Json<PingResponse> {
    Json(PingResponse {
        status: "ok".to_string(),
        message: "API is alive".to_string(),
        utc_time: state.clock.now().to_rfc3339(),
    })
}
