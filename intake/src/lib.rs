//! Survey Intake Server
//!
//! アンケート送信を検証・匿名化し、NDJSONログへ追記するHTTPサービス

#![warn(missing_docs)]

/// 共通型定義（ハッシュ、型、エラー、IP）
pub mod common;

/// REST APIハンドラー
pub mod api;

/// CLIインターフェース
pub mod cli;

/// 設定管理（環境変数ヘルパー）
pub mod config;

/// ロギング初期化ユーティリティ
pub mod logging;

/// 送信処理（識別子・匿名化）
pub mod processor;

/// axumサーバー起動・シャットダウン
pub mod server;

/// レコードストア（NDJSON追記）
pub mod store;

/// 送信内容の検証
pub mod validation;

use std::sync::Arc;

/// アプリケーション状態
#[derive(Clone)]
pub struct AppState {
    /// レコードの追記先
    pub store: Arc<dyn store::RecordSink>,
    /// 受付時刻の供給元
    pub clock: Arc<dyn processor::Clock>,
    /// サービス設定
    pub config: Arc<config::IntakeConfig>,
}

impl AppState {
    /// 設定からNDJSONストアとシステム時計を用意する
    pub fn new(config: config::IntakeConfig) -> Self {
        let store = store::NdjsonStore::new(config.data_path.clone());
        Self {
            store: Arc::new(store),
            clock: Arc::new(processor::SystemClock),
            config: Arc::new(config),
        }
    }

    /// 時計を差し替える
    pub fn with_clock(mut self, clock: impl processor::Clock + 'static) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    /// 追記先を差し替える
    pub fn with_store(mut self, store: impl store::RecordSink + 'static) -> Self {
        self.store = Arc::new(store);
        self
    }
}
