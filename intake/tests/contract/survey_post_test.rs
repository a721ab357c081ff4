//! Contract Test: POST /v1/survey
//!
//! 受付・検証・匿名化・NDJSON追記の契約テスト

use crate::support::{body_json, build_app, build_app_at, post_json, read_records};
use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use chrono::{TimeZone, Utc};
use serde_json::{json, Value};
use std::collections::BTreeSet;
use survey_intake::common::hash::{is_sha256_hex, sha256_hex};
use tower::ServiceExt;

/// POST /v1/survey - 正常系: 仕様例の識別子とダイジェスト
#[tokio::test]
async fn test_submit_reference_example() {
    let test = build_app();

    let response = test
        .app
        .oneshot(post_json(r#"{"email":"a@b.com","age":30}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let body = body_json(response).await;
    let expected_id = sha256_hex("a@b.com2024030110");
    assert_eq!(body, json!({"status": "ok", "submission_id": expected_id}));

    let records = read_records(&test.data_path);
    assert_eq!(records.len(), 1);
    assert_eq!(records[0]["submission_id"], expected_id);
    assert_eq!(records[0]["email"], sha256_hex("a@b.com"));
    assert_eq!(records[0]["age"], sha256_hex("30"));
    assert_eq!(records[0]["received_at"], "2024-03-01T10:15:00Z");
}

/// 永続化された行はStoredRecordのフィールドをちょうど持つ
#[tokio::test]
async fn test_stored_line_has_exact_field_set() {
    let test = build_app();

    test.app
        .oneshot(post_json(r#"{"email":"a@b.com","age":30}"#))
        .await
        .unwrap();

    let records = read_records(&test.data_path);
    let keys: BTreeSet<&str> = records[0]
        .as_object()
        .unwrap()
        .keys()
        .map(String::as_str)
        .collect();
    let expected: BTreeSet<&str> = [
        "name",
        "email",
        "age",
        "consent",
        "rating",
        "comments",
        "user_agent",
        "submission_id",
        "received_at",
        "ip",
    ]
    .into_iter()
    .collect();
    assert_eq!(keys, expected);
}

/// 生のemail/ageはファイルに現れない
#[tokio::test]
async fn test_raw_sensitive_values_never_persisted() {
    let test = build_app();

    let response = test
        .app
        .oneshot(post_json(
            r#"{"name":"Grace","email":"grace.hopper@navy.example","age":85,"consent":true,"rating":4,"comments":"multi\nline"}"#,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let content = std::fs::read_to_string(&test.data_path).unwrap();
    assert!(!content.contains("grace.hopper@navy.example"));
    assert_eq!(content.lines().count(), 1);

    let records = read_records(&test.data_path);
    let record = &records[0];
    assert!(is_sha256_hex(record["email"].as_str().unwrap()));
    assert!(is_sha256_hex(record["age"].as_str().unwrap()));
    assert_ne!(record["age"], json!(85));
    assert_eq!(record["name"], "Grace");
    assert_eq!(record["consent"], true);
    assert_eq!(record["rating"], 4);
    assert_eq!(record["comments"], "multi\nline");
}

/// 指定された送信IDはハッシュせずそのまま返す
#[tokio::test]
async fn test_supplied_submission_id_is_echoed_verbatim() {
    let test = build_app();

    let response = test
        .app
        .oneshot(post_json(
            r#"{"email":"a@b.com","age":30,"submission_id":"my-own-id"}"#,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let body = body_json(response).await;
    assert_eq!(body["submission_id"], "my-own-id");
    assert_eq!(read_records(&test.data_path)[0]["submission_id"], "my-own-id");
}

/// 同じ時間帯・同じemailなら導出IDは一致し、時間をまたぐと変わる
#[tokio::test]
async fn test_derived_id_depends_on_utc_hour() {
    let body = r#"{"email":"a@b.com","age":30}"#;

    let early = build_app_at(Utc.with_ymd_and_hms(2024, 3, 1, 10, 0, 1).unwrap());
    let late = build_app_at(Utc.with_ymd_and_hms(2024, 3, 1, 10, 59, 59).unwrap());
    let next = build_app_at(Utc.with_ymd_and_hms(2024, 3, 1, 11, 0, 0).unwrap());

    let early_id = body_json(early.app.oneshot(post_json(body)).await.unwrap()).await;
    let late_id = body_json(late.app.oneshot(post_json(body)).await.unwrap()).await;
    let next_id = body_json(next.app.oneshot(post_json(body)).await.unwrap()).await;

    assert_eq!(early_id["submission_id"], late_id["submission_id"]);
    assert_ne!(late_id["submission_id"], next_id["submission_id"]);
}

/// user_agent が無ければUser-Agentヘッダーから補完される
#[tokio::test]
async fn test_user_agent_filled_from_header() {
    let test = build_app();

    let response = test
        .app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/v1/survey")
                .header("content-type", "application/json")
                .header("user-agent", "SurveyWidget/2.1")
                .body(Body::from(r#"{"email":"a@b.com","age":30}"#))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(read_records(&test.data_path)[0]["user_agent"], "SurveyWidget/2.1");
}

/// 本文の user_agent はヘッダーで上書きされない
#[tokio::test]
async fn test_explicit_user_agent_is_kept() {
    let test = build_app();

    test.app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/v1/survey")
                .header("content-type", "application/json")
                .header("user-agent", "SurveyWidget/2.1")
                .body(Body::from(
                    r#"{"email":"a@b.com","age":30,"user_agent":"typed-by-client"}"#,
                ))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(read_records(&test.data_path)[0]["user_agent"], "typed-by-client");
}

/// X-Forwarded-For の先頭がipとして記録される
#[tokio::test]
async fn test_forwarded_for_is_recorded() {
    let test = build_app();

    test.app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/v1/survey")
                .header("content-type", "application/json")
                .header("x-forwarded-for", "203.0.113.50, 10.0.0.2")
                .body(Body::from(r#"{"email":"a@b.com","age":30}"#))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(read_records(&test.data_path)[0]["ip"], "203.0.113.50");
}

/// 接続情報もヘッダーも無ければipは空文字列
#[tokio::test]
async fn test_unknown_client_ip_is_empty() {
    let test = build_app();

    test.app
        .oneshot(post_json(r#"{"email":"a@b.com","age":30}"#))
        .await
        .unwrap();

    assert_eq!(read_records(&test.data_path)[0]["ip"], "");
}

/// スキーマ外のフィールドはそのまま保存される
#[tokio::test]
async fn test_extra_fields_are_passed_through() {
    let test = build_app();

    let response = test
        .app
        .oneshot(post_json(
            r#"{"email":"a@b.com","age":30,"campaign":"spring","answers":{"q1":"yes"}}"#,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let record = &read_records(&test.data_path)[0];
    assert_eq!(record["campaign"], "spring");
    assert_eq!(record["answers"], json!({"q1": "yes"}));
}

/// 不正なJSON → 400 invalid_json、何も追記されない
#[tokio::test]
async fn test_malformed_json_is_rejected() {
    let test = build_app();

    let response = test
        .app
        .oneshot(post_json(r#"{"email":"a@b.com","age":"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["error"], "invalid_json");
    assert!(read_records(&test.data_path).is_empty());
    assert!(!test.data_path.exists());
}

/// JSON以外のContent-Type → 400 invalid_json
#[tokio::test]
async fn test_non_json_content_type_is_rejected() {
    let test = build_app();

    let response = test
        .app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/v1/survey")
                .header("content-type", "text/plain")
                .body(Body::from(r#"{"email":"a@b.com","age":30}"#))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["error"], "invalid_json");
    assert!(!test.data_path.exists());
}

/// JSON配列はオブジェクトではないため invalid_json
#[tokio::test]
async fn test_json_array_is_rejected() {
    let test = build_app();

    let response = test.app.oneshot(post_json("[1,2,3]")).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["error"], "invalid_json");
}

/// 必須フィールド欠落 → 422 validation_error（フィールドを列挙）
#[tokio::test]
async fn test_missing_email_is_validation_error() {
    let test = build_app();

    let response = test
        .app
        .oneshot(post_json(r#"{"age":30}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = body_json(response).await;
    assert_eq!(body["error"], "validation_error");
    let detail = body["detail"].as_array().unwrap();
    assert!(detail
        .iter()
        .any(|d| d["loc"] == json!(["email"]) && d["type"] == "missing"));
    assert!(!test.data_path.exists());
}

/// 型・範囲違反は全件報告される
#[tokio::test]
async fn test_all_field_errors_are_reported() {
    let test = build_app();

    let response = test
        .app
        .oneshot(post_json(r#"{"email":"nope","age":200,"rating":0}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = body_json(response).await;
    let fields: BTreeSet<String> = body["detail"]
        .as_array()
        .unwrap()
        .iter()
        .map(|d| d["loc"][0].as_str().unwrap().to_string())
        .collect();
    assert_eq!(
        fields,
        ["age", "email", "rating"]
            .into_iter()
            .map(String::from)
            .collect::<BTreeSet<String>>()
    );
}

/// 書き込みに失敗したら成功を返さない（500 storage_error）
#[tokio::test]
async fn test_storage_failure_is_server_error() {
    let dir = tempfile::tempdir().unwrap();
    let blocker = dir.path().join("not-a-dir");
    std::fs::write(&blocker, "file in the way").unwrap();
    let app = crate::support::app_for(
        &blocker.join("survey.ndjson"),
        crate::support::reference_time(),
    );

    let response = app
        .oneshot(post_json(r#"{"email":"a@b.com","age":30}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = body_json(response).await;
    assert_eq!(body["error"], "storage_error");
    assert!(body.get("submission_id").is_none());
    assert!(!body.to_string().contains("not-a-dir"));
}
