//! NDJSON追記ストア
//!
//! 1レコード = 1行のJSON。書き込みのたびに開いて、1回の `write_all` で
//! 行全体を書き、閉じる。プロセス内はMutexで、プロセス間はfs2の
//! 排他ロックで直列化する。

use super::RecordSink;
use crate::common::error::StorageError;
use crate::common::types::StoredRecord;
use async_trait::async_trait;
use fs2::FileExt;
use serde::Serialize;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::debug;

/// NDJSONファイルへの追記ストア
///
/// Clone可能（内部はArc共有）。
#[derive(Clone, Debug)]
pub struct NdjsonStore {
    inner: Arc<Inner>,
}

#[derive(Debug)]
struct Inner {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl NdjsonStore {
    /// ログファイルのパスを指定して作成（ファイルは最初の追記時に作られる）
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            inner: Arc::new(Inner {
                path: path.into(),
                write_lock: Mutex::new(()),
            }),
        }
    }
}

#[async_trait]
impl RecordSink for NdjsonStore {
    async fn append(&self, record: &StoredRecord) -> Result<(), StorageError> {
        let line = encode_line(record)?;

        let _guard = self.inner.write_lock.lock().await;
        let path = self.inner.path.clone();
        let result = tokio::task::spawn_blocking(move || append_line(&path, &line))
            .await
            .map_err(|e| StorageError::Join(e.to_string()))?;

        // 失敗はレスポンス変換側（AppError）でerrorとして記録される
        match &result {
            Ok(()) => debug!(path = %self.inner.path.display(), "Appended record"),
            Err(e) => debug!(error = %e, "Append failed"),
        }
        result
    }
}

/// コンパクトなJSON + 改行1つにエンコードする
///
/// 文字列中の改行はJSONエスケープされるため、出力はちょうど1行になる。
pub fn encode_line<T: Serialize>(record: &T) -> Result<Vec<u8>, StorageError> {
    let mut line = serde_json::to_vec(record)?;
    line.push(b'\n');
    Ok(line)
}

/// 親ディレクトリを用意し、追記モードで1行を書き込む
///
/// ファイルハンドルはこの関数を抜けるときに必ず閉じられる。
pub fn append_line(path: &Path, line: &[u8]) -> Result<(), StorageError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|source| StorageError::CreateDir {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|source| StorageError::Open {
            path: path.to_path_buf(),
            source,
        })?;

    FileExt::lock_exclusive(&file).map_err(|source| StorageError::Lock {
        path: path.to_path_buf(),
        source,
    })?;

    let written = file.write_all(line).and_then(|_| file.flush());
    let unlocked = FileExt::unlock(&file);

    written.map_err(|source| StorageError::Write {
        path: path.to_path_buf(),
        source,
    })?;
    unlocked.map_err(|source| StorageError::Lock {
        path: path.to_path_buf(),
        source,
    })
}
