//! SHA-256ハッシュユーティリティ
//!
//! 識別子の導出と匿名化の両方で使う一方向ダイジェスト。

use sha2::{Digest, Sha256};

/// 文字列のSHA-256ダイジェストを小文字16進数（64文字）で返す
///
/// 入力はUTF-8バイト列としてハッシュされる。空文字列を含め失敗しない。
pub fn sha256_hex(input: &str) -> String {
    format!("{:x}", Sha256::digest(input.as_bytes()))
}

/// 64文字の小文字16進数文字列か判定する
pub fn is_sha256_hex(value: &str) -> bool {
    value.len() == 64
        && value
            .bytes()
            .all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b))
}
