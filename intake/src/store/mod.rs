//! レコードストア
//!
//! 永続化を抽象化するtraitと、NDJSONファイルへの追記実装。

/// NDJSON追記実装
pub mod ndjson;

use crate::common::error::StorageError;
use crate::common::types::StoredRecord;
use async_trait::async_trait;

pub use ndjson::NdjsonStore;

/// 匿名化済みレコードの追記先
///
/// 1回の呼び出しで1レコード。部分的な書き込みを残してはならない。
#[async_trait]
pub trait RecordSink: Send + Sync {
    /// レコードを1件追記する
    async fn append(&self, record: &StoredRecord) -> Result<(), StorageError>;
}
