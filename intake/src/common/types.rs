//! 型定義
//!
//! 受付済みアンケート（Submission）と永続化レコード（StoredRecord）、
//! 検証エラーの構造体

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/// 検証済みのアンケート送信
///
/// `validation::validate` を通過した値のみが生成される。
/// `email` と `age` は常に存在する。
#[derive(Debug, Clone, PartialEq)]
pub struct Submission {
    /// メールアドレス（正規化しない生の値）
    pub email: String,
    /// 年齢
    pub age: u32,
    /// 回答者名
    pub name: Option<String>,
    /// 同意フラグ
    pub consent: Option<bool>,
    /// 評価（1〜5）
    pub rating: Option<u8>,
    /// 自由記述
    pub comments: Option<String>,
    /// User-Agent（本文に無ければヘッダーから補完される）
    pub user_agent: Option<String>,
    /// 呼び出し側が指定した送信ID
    pub submission_id: Option<String>,
    /// スキーマ外の追加フィールド（そのまま保存される）
    pub extra: Map<String, Value>,
}

/// NDJSONの1行として保存されるレコード
///
/// `email` と `age` は必ずSHA-256ダイジェスト。生の値を持つ経路は存在しない。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredRecord {
    /// 回答者名
    pub name: Option<String>,
    /// メールアドレスのダイジェスト
    pub email: String,
    /// 年齢（10進表記）のダイジェスト
    pub age: String,
    /// 同意フラグ
    pub consent: Option<bool>,
    /// 評価
    pub rating: Option<u8>,
    /// 自由記述
    pub comments: Option<String>,
    /// User-Agent
    pub user_agent: Option<String>,
    /// 確定した送信ID
    pub submission_id: String,
    /// 受付時刻（UTC）
    pub received_at: DateTime<Utc>,
    /// クライアントアドレス（不明なら空文字列）
    pub ip: String,
    /// スキーマ外の追加フィールド
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// フィールド単位の検証エラー
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldError {
    /// フィールドパス
    pub loc: Vec<String>,
    /// 人間向けメッセージ
    pub msg: String,
    /// 制約の種別（例: `missing`, `int_type`）
    #[serde(rename = "type")]
    pub kind: String,
    /// 受け取った値（欠落時はなし）
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input: Option<Value>,
}

impl FieldError {
    /// 新しいフィールドエラーを作成
    pub fn new(field: &str, kind: &str, msg: impl Into<String>, input: Option<Value>) -> Self {
        Self {
            loc: vec![field.to_string()],
            msg: msg.into(),
            kind: kind.to_string(),
            input,
        }
    }

    /// 必須フィールド欠落
    pub fn missing(field: &str) -> Self {
        Self::new(field, "missing", "Field required", None)
    }

    /// 先頭のフィールド名
    pub fn field(&self) -> &str {
        self.loc.first().map(String::as_str).unwrap_or("")
    }
}

/// 検証失敗（1件以上のフィールドエラー）
#[derive(Debug, Clone, PartialEq, Error, Serialize)]
#[error("{} validation error(s) for submission", .errors.len())]
pub struct ValidationFailure {
    /// フィールドエラー一覧
    pub errors: Vec<FieldError>,
}

impl ValidationFailure {
    /// 指定フィールドのエラーを含むか
    pub fn has_field(&self, field: &str) -> bool {
        self.errors.iter().any(|e| e.field() == field)
    }
}

/// `POST /v1/survey` 成功レスポンス
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmitResponse {
    /// 常に `"ok"`
    pub status: String,
    /// 確定した送信ID
    pub submission_id: String,
}

impl SubmitResponse {
    /// 成功レスポンスを作成
    pub fn ok(submission_id: impl Into<String>) -> Self {
        Self {
            status: "ok".to_string(),
            submission_id: submission_id.into(),
        }
    }
}
