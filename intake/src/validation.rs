//! アンケート送信の検証
//!
//! デコード済みJSONオブジェクトを型付きの `Submission` に変換する。
//! 失敗は最初の1件で止めず、全フィールド分を `ValidationFailure` に集める。

use crate::common::types::{FieldError, Submission, ValidationFailure};
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Map, Value};

/// 年齢の下限
pub const MIN_AGE: i64 = 0;
/// 年齢の上限
pub const MAX_AGE: i64 = 130;
/// 評価の範囲
pub const RATING_RANGE: (i64, i64) = (1, 5);
/// 名前の最大文字数
pub const MAX_NAME_CHARS: usize = 100;
/// 自由記述の最大文字数
pub const MAX_COMMENTS_CHARS: usize = 1000;
/// メールアドレスの最大長（RFC 5321）
pub const MAX_EMAIL_LEN: usize = 254;

/// サーバー側で付与するため本文では受け付けないキー
const RESERVED_KEYS: &[&str] = &["received_at", "ip"];

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^[A-Za-z0-9!#$%&'*+/=?^_`{|}~-]+(?:\.[A-Za-z0-9!#$%&'*+/=?^_`{|}~-]+)*@[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?(?:\.[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?)+$",
    )
    .expect("email regex is valid")
});

/// メールアドレスの構文チェック
pub fn is_valid_email(email: &str) -> bool {
    email.len() <= MAX_EMAIL_LEN && EMAIL_RE.is_match(email)
}

/// ペイロードを検証して `Submission` を返す
///
/// 呼び出し側は事前に `user_agent` を補完しておくこと（本文に無い場合のみ）。
/// スキーマ外のキーは `extra` としてそのまま保持する。
pub fn validate(payload: Map<String, Value>) -> Result<Submission, ValidationFailure> {
    let mut fields = Fields::new(payload);

    let email = fields.required_string("email").and_then(|email| {
        if is_valid_email(&email) {
            Some(email)
        } else {
            fields.push(FieldError::new(
                "email",
                "value_error",
                "value is not a valid email address",
                Some(Value::String(email)),
            ));
            None
        }
    });
    let age = fields
        .required_int("age", MIN_AGE, MAX_AGE)
        .map(|age| age as u32);
    let name = fields.optional_string("name", Some((1, MAX_NAME_CHARS)));
    let consent = fields.optional_bool("consent");
    let rating = fields
        .optional_int("rating", RATING_RANGE.0, RATING_RANGE.1)
        .map(|rating| rating as u8);
    let comments = fields.optional_string("comments", Some((0, MAX_COMMENTS_CHARS)));
    let user_agent = fields.optional_string("user_agent", None);
    let submission_id = fields.optional_string("submission_id", None);

    for key in RESERVED_KEYS {
        if let Some(value) = fields.map.remove(*key) {
            fields.push(FieldError::new(
                key,
                "extra_forbidden",
                "Extra inputs are not permitted",
                Some(value),
            ));
        }
    }

    let Fields { map: extra, errors } = fields;
    match (email, age) {
        (Some(email), Some(age)) if errors.is_empty() => Ok(Submission {
            email,
            age,
            name,
            consent,
            rating,
            comments,
            user_agent,
            submission_id,
            extra,
        }),
        _ => Err(ValidationFailure { errors }),
    }
}

/// 検証中のフィールド集合とエラー
struct Fields {
    map: Map<String, Value>,
    errors: Vec<FieldError>,
}

impl Fields {
    fn new(map: Map<String, Value>) -> Self {
        Self {
            map,
            errors: Vec::new(),
        }
    }

    fn push(&mut self, error: FieldError) {
        self.errors.push(error);
    }

    fn required(&mut self, field: &str) -> Option<Value> {
        let value = self.map.remove(field);
        if value.is_none() {
            self.push(FieldError::missing(field));
        }
        value
    }

    /// null は未指定として扱う
    fn optional(&mut self, field: &str) -> Option<Value> {
        self.map.remove(field).filter(|v| !v.is_null())
    }

    fn required_string(&mut self, field: &str) -> Option<String> {
        let value = self.required(field)?;
        self.string(field, value, None)
    }

    fn optional_string(&mut self, field: &str, chars: Option<(usize, usize)>) -> Option<String> {
        let value = self.optional(field)?;
        self.string(field, value, chars)
    }

    fn string(&mut self, field: &str, value: Value, chars: Option<(usize, usize)>) -> Option<String> {
        let s = match value {
            Value::String(s) => s,
            other => {
                self.push(FieldError::new(
                    field,
                    "string_type",
                    "Input should be a valid string",
                    Some(other),
                ));
                return None;
            }
        };

        if let Some((min, max)) = chars {
            let len = s.chars().count();
            if len < min {
                self.push(FieldError::new(
                    field,
                    "string_too_short",
                    format!("String should have at least {min} characters"),
                    Some(Value::String(s)),
                ));
                return None;
            }
            if len > max {
                self.push(FieldError::new(
                    field,
                    "string_too_long",
                    format!("String should have at most {max} characters"),
                    Some(Value::String(s)),
                ));
                return None;
            }
        }
        Some(s)
    }

    fn required_int(&mut self, field: &str, min: i64, max: i64) -> Option<i64> {
        let value = self.required(field)?;
        self.int(field, value, min, max)
    }

    fn optional_int(&mut self, field: &str, min: i64, max: i64) -> Option<i64> {
        let value = self.optional(field)?;
        self.int(field, value, min, max)
    }

    fn int(&mut self, field: &str, value: Value, min: i64, max: i64) -> Option<i64> {
        let Some(n) = as_integer(&value) else {
            self.push(FieldError::new(
                field,
                "int_type",
                "Input should be a valid integer",
                Some(value),
            ));
            return None;
        };

        if n < min {
            self.push(FieldError::new(
                field,
                "greater_than_equal",
                format!("Input should be greater than or equal to {min}"),
                Some(value),
            ));
            return None;
        }
        if n > max {
            self.push(FieldError::new(
                field,
                "less_than_equal",
                format!("Input should be less than or equal to {max}"),
                Some(value),
            ));
            return None;
        }
        Some(n)
    }

    fn optional_bool(&mut self, field: &str) -> Option<bool> {
        match self.optional(field)? {
            Value::Bool(b) => Some(b),
            other => {
                self.push(FieldError::new(
                    field,
                    "bool_type",
                    "Input should be a valid boolean",
                    Some(other),
                ));
                None
            }
        }
    }
}

/// 整数、または小数部が0の数値を整数として取り出す
fn as_integer(value: &Value) -> Option<i64> {
    let Value::Number(n) = value else {
        return None;
    };
    n.as_i64().or_else(|| {
        n.as_f64()
            .filter(|f| f.is_finite() && f.fract() == 0.0)
            .filter(|f| *f >= i64::MIN as f64 && *f <= i64::MAX as f64)
            .map(|f| f as i64)
    })
}
