//! 送信処理（識別子の確定 → レコード組み立て → 匿名化）
//!
//! 検証済みの `Submission` から永続化用の `StoredRecord` を作る純粋な変換。
//! 生の `email`/`age` は `RecordDraft` の中にだけ存在し、
//! `StoredRecord` は `RecordDraft::anonymize` を通してしか作られない。

use crate::common::hash::sha256_hex;
use crate::common::types::{StoredRecord, Submission};
use chrono::{DateTime, Utc};
use serde_json::{Map, Value};

/// 現在時刻の供給元
pub trait Clock: Send + Sync {
    /// 現在のUTC時刻
    fn now(&self) -> DateTime<Utc>;
}

/// システム時計
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// 固定時刻を返す時計（テスト・再現用）
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// 処理結果
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessedSubmission {
    /// 匿名化済みレコード
    pub record: StoredRecord,
    /// レスポンスで返す送信ID
    pub submission_id: String,
}

/// 組み立て直後のレコード（生のemail/ageを保持）
///
/// ストアには渡せない。`anonymize` で `StoredRecord` に変換する。
#[derive(Debug, Clone)]
pub struct RecordDraft {
    name: Option<String>,
    email: String,
    age: u32,
    consent: Option<bool>,
    rating: Option<u8>,
    comments: Option<String>,
    user_agent: Option<String>,
    submission_id: String,
    received_at: DateTime<Utc>,
    ip: String,
    extra: Map<String, Value>,
}

impl RecordDraft {
    /// 送信IDを除く全フィールドをコピーし、サーバー側の値を設定する
    pub fn assemble(
        submission: Submission,
        submission_id: String,
        received_at: DateTime<Utc>,
        ip: String,
    ) -> Self {
        Self {
            name: submission.name,
            email: submission.email,
            age: submission.age,
            consent: submission.consent,
            rating: submission.rating,
            comments: submission.comments,
            user_agent: submission.user_agent,
            submission_id,
            received_at,
            ip,
            extra: submission.extra,
        }
    }

    /// email と age をダイジェストに置き換える
    pub fn anonymize(self) -> StoredRecord {
        StoredRecord {
            name: self.name,
            email: sha256_hex(&self.email),
            age: sha256_hex(&self.age.to_string()),
            consent: self.consent,
            rating: self.rating,
            comments: self.comments,
            user_agent: self.user_agent,
            submission_id: self.submission_id,
            received_at: self.received_at,
            ip: self.ip,
            extra: self.extra,
        }
    }
}

/// `sha256(email + YYYYMMDDHH)` で送信IDを導出する（UTC、区切りなし）
pub fn derive_submission_id(email: &str, now: DateTime<Utc>) -> String {
    sha256_hex(&format!("{}{}", email, now.format("%Y%m%d%H")))
}

/// 呼び出し側指定のIDがあればそのまま使い、無ければ導出する
///
/// 指定IDの形式や重複は検査しない。
pub fn resolve_submission_id(submission: &Submission, now: DateTime<Utc>) -> String {
    match submission.submission_id.as_deref() {
        Some(id) if !id.is_empty() => id.to_string(),
        _ => derive_submission_id(&submission.email, now),
    }
}

/// 検証済み送信を永続化用レコードに変換する
pub fn process(submission: Submission, client_ip: &str, now: DateTime<Utc>) -> ProcessedSubmission {
    let submission_id = resolve_submission_id(&submission, now);
    let draft = RecordDraft::assemble(submission, submission_id.clone(), now, client_ip.to_string());
    ProcessedSubmission {
        record: draft.anonymize(),
        submission_id,
    }
}
