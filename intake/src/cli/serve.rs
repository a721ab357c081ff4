//! serve サブコマンド
//!
//! 受付サーバーを起動します。指定した引数は環境変数の設定より優先されます。

use crate::config::IntakeConfig;
use clap::Args;
use std::path::PathBuf;

/// serve サブコマンドの引数
#[derive(Args, Debug, Clone, Default)]
pub struct ServeArgs {
    /// Listen port
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Bind address
    #[arg(short = 'H', long)]
    pub host: Option<String>,

    /// NDJSON log path
    #[arg(long)]
    pub data_path: Option<PathBuf>,
}

impl ServeArgs {
    /// 指定された引数で設定を上書きする
    pub fn apply(self, mut config: IntakeConfig) -> IntakeConfig {
        if let Some(port) = self.port {
            config.port = port;
        }
        if let Some(host) = self.host {
            config.host = host;
        }
        if let Some(data_path) = self.data_path {
            config.data_path = data_path;
        }
        config
    }
}
