//! クライアントアドレス解決
//!
//! `X-Forwarded-For` を優先し、無ければソケットのピアアドレスを使う。
//! IPv4-mapped IPv6アドレスはIPv4に正規化する。

use axum::http::HeaderMap;
use std::net::{IpAddr, SocketAddr};

/// IPアドレスを正規化する
///
/// IPv4-mapped IPv6（::ffff:x.x.x.x）をIPv4に変換。
/// それ以外はそのまま返す。
pub fn normalize_ip(addr: IpAddr) -> IpAddr {
    match addr {
        IpAddr::V6(v6) => {
            if let Some(v4) = v6.to_ipv4_mapped() {
                IpAddr::V4(v4)
            } else {
                IpAddr::V6(v6)
            }
        }
        v4 => v4,
    }
}

/// `X-Forwarded-For` の先頭ホップを取り出す
pub fn forwarded_for(headers: &HeaderMap) -> Option<String> {
    let value = headers.get("x-forwarded-for")?.to_str().ok()?;
    let first = value.split(',').next()?.trim();
    if first.is_empty() {
        None
    } else {
        Some(first.to_string())
    }
}

/// 記録用のクライアントアドレスを決定する
///
/// どちらも得られない場合は空文字列。
pub fn resolve_client_ip(headers: &HeaderMap, peer: Option<SocketAddr>) -> String {
    forwarded_for(headers)
        .or_else(|| peer.map(|addr| normalize_ip(addr.ip()).to_string()))
        .unwrap_or_default()
}
