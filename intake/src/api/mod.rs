//! REST APIハンドラー
//!
//! アンケート送信、ヘルスチェック

/// エラーレスポンス
pub mod error;
/// アンケート送信
pub mod survey;
/// 生存確認
pub mod system;

use crate::config::IntakeConfig;
use crate::AppState;
use axum::{
    http::{HeaderValue, Method},
    routing::{get, post},
    Router,
};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::warn;

/// アプリケーションのルーターを作成
///
/// CORSは `/v1/` 配下のルートにのみ適用する。
pub fn create_app(state: AppState) -> Router {
    let v1 = Router::new()
        .route("/v1/survey", post(survey::submit_survey))
        .layer(cors_layer(&state.config));

    Router::new()
        .route("/ping", get(system::ping))
        .merge(v1)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// 設定からCORSレイヤーを組み立てる
pub fn cors_layer(config: &IntakeConfig) -> CorsLayer {
    if config.allows_any_origin() {
        return CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);
    }

    let origins: Vec<HeaderValue> = config
        .cors_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!(origin = %origin, error = %e, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any)
}
