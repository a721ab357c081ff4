//! アンケート送信APIハンドラー
//!
//! POST /v1/survey: JSON本文 → 検証 → 識別子確定・匿名化 → NDJSON追記

use crate::api::error::AppError;
use crate::common::error::IntakeError;
use crate::common::ip::resolve_client_ip;
use crate::common::types::SubmitResponse;
use crate::{processor, validation, AppState};
use axum::{
    body::Bytes,
    extract::{ConnectInfo, State},
    http::{header, HeaderMap, StatusCode},
    Json,
};
use serde_json::{Map, Value};
use std::net::SocketAddr;
use tracing::info;

/// `Content-Type` がJSONか判定する（`application/json` または `application/*+json`）
pub fn is_json_content_type(headers: &HeaderMap) -> bool {
    let Some(value) = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
    else {
        return false;
    };
    let mime = value
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    mime == "application/json" || (mime.starts_with("application/") && mime.ends_with("+json"))
}

/// 本文をJSONオブジェクトとして解釈する
pub fn parse_payload(headers: &HeaderMap, body: &[u8]) -> Result<Map<String, Value>, IntakeError> {
    if !is_json_content_type(headers) {
        return Err(IntakeError::InvalidJson(
            "missing or non-JSON content type".to_string(),
        ));
    }
    match serde_json::from_slice::<Value>(body) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(other) => Err(IntakeError::InvalidJson(format!(
            "expected a JSON object, got {}",
            json_type_name(&other)
        ))),
        Err(e) => Err(IntakeError::InvalidJson(e.to_string())),
    }
}

/// 本文に `user_agent` キーが無い場合のみヘッダー値で補完する
///
/// ヘッダーも無い場合は null を入れる。本文の値は上書きしない。
pub fn fill_user_agent(payload: &mut Map<String, Value>, headers: &HeaderMap) {
    if payload.contains_key("user_agent") {
        return;
    }
    let user_agent = headers
        .get(header::USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .map(|s| Value::String(s.to_string()))
        .unwrap_or(Value::Null);
    payload.insert("user_agent".to_string(), user_agent);
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// POST /v1/survey - アンケート送信
pub async fn submit_survey(
    State(state): State<AppState>,
    connect_info: Option<ConnectInfo<SocketAddr>>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<(StatusCode, Json<SubmitResponse>), AppError> {
    let mut payload = parse_payload(&headers, &body)?;
    fill_user_agent(&mut payload, &headers);

    let submission = validation::validate(payload)?;

    let client_ip = resolve_client_ip(&headers, connect_info.map(|ConnectInfo(addr)| addr));
    let processed = processor::process(submission, &client_ip, state.clock.now());

    state.store.append(&processed.record).await?;

    info!(
        submission_id = %processed.submission_id,
        ip = %client_ip,
        "Accepted survey submission"
    );

    Ok((
        StatusCode::CREATED,
        Json(SubmitResponse::ok(processed.submission_id)),
    ))
}
