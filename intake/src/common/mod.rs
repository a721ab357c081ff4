//! 共通モジュール
//!
//! ハッシュ、型定義、エラー、クライアントアドレス解決

/// エラー型定義
pub mod error;

/// SHA-256ハッシュユーティリティ
pub mod hash;

/// クライアントアドレス解決
pub mod ip;

/// 型定義
pub mod types;
