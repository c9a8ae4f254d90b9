//! Exercises `GoogleTranslator` against a stub v2 API.

use std::{
    collections::HashMap,
    sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    },
};

use axum::{
    Json, Router,
    extract::Query,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::{get, post},
};
use duo_chat_core::{TranslateError, Translator, auto_translate};
use duo_chat_translate::{Credentials, GoogleTranslator};
use serde_json::json;

type Params = Query<HashMap<String, String>>;

async fn translate(Query(params): Params) -> impl IntoResponse {
    if params.get("key").map(String::as_str) != Some("good-key") {
        return (
            StatusCode::FORBIDDEN,
            Json(json!({"error": {"code": 403, "message": "bad key"}})),
        );
    }
    if params.contains_key("source") {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"error": {"code": 400, "message": "unexpected source"}})),
        );
    }
    let text = params.get("q").cloned().unwrap_or_default();
    let target = params.get("target").cloned().unwrap_or_default();
    assert_eq!(params.get("format").map(String::as_str), Some("text"));

    let translated = match (text.as_str(), target.as_str()) {
        ("hello", "zh-CN") => "你好".to_string(),
        ("你好", "en") => "Hello".to_string(),
        _ => format!("{text} ({target})"),
    };
    (
        StatusCode::OK,
        Json(json!({"data": {"translations": [{"translatedText": translated}]}})),
    )
}

async fn detect(Query(params): Params) -> Json<serde_json::Value> {
    let text = params.get("q").cloned().unwrap_or_default();
    let language = if text.chars().any(|c| ('\u{4e00}'..='\u{9fff}').contains(&c)) {
        "zh-CN"
    } else if text.is_ascii() {
        "en"
    } else {
        "fr"
    };
    Json(json!({"data": {"detections": [[{"language": language, "confidence": 0.9}]]}}))
}

async fn languages(Query(params): Params) -> Json<serde_json::Value> {
    assert_eq!(params.get("target").map(String::as_str), Some("en"));
    Json(json!({"data": {"languages": [
        {"language": "en", "name": "English"},
        {"language": "zh-CN", "name": "Chinese (Simplified)"}
    ]}}))
}

async fn spawn(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move { axum::serve(listener, app).await.unwrap() });
    format!("http://{addr}/v2")
}

async fn stub_api() -> String {
    spawn(
        Router::new()
            .route("/v2", post(translate))
            .route("/v2/detect", post(detect))
            .route("/v2/languages", get(languages)),
    )
    .await
}

fn translator(base: &str, key: &str) -> GoogleTranslator {
    GoogleTranslator::builder(Credentials::ApiKey(key.into()))
        .base_url(base)
        .build()
        .unwrap()
}

#[tokio::test]
async fn test_detect_and_translate() {
    let base = stub_api().await;
    let t = translator(&base, "good-key");

    assert_eq!(t.detect_language("hello").await.unwrap(), "en");
    assert_eq!(t.detect_language("你好").await.unwrap(), "zh-CN");

    let translation = t.translate("hello", "zh-CN", Some("auto")).await.unwrap();
    assert_eq!(translation.translated_text, "你好");
}

#[tokio::test]
async fn test_auto_translate_both_directions() {
    let base = stub_api().await;
    let t = translator(&base, "good-key");

    let en = auto_translate(&t, "hello").await.unwrap();
    assert_eq!(en.translated_text, "你好");
    assert_eq!(en.source_language, "en");
    assert_eq!(en.target_language, "zh-CN");

    let zh = auto_translate(&t, "你好").await.unwrap();
    assert_eq!(zh.translated_text, "Hello");
    assert_eq!(zh.target_language, "en");

    let fr = auto_translate(&t, "déjà vu").await.unwrap();
    assert_eq!(fr.source_language, "fr");
    assert_eq!(fr.target_language, "en");
}

#[tokio::test]
async fn test_explicit_source_is_sent() {
    let base = stub_api().await;
    let t = translator(&base, "good-key");
    let err = t.translate("hello", "de", Some("en")).await.unwrap_err();
    assert!(matches!(err, TranslateError::BadRequest(ref m) if m == "unexpected source"));
}

#[tokio::test]
async fn test_forbidden_maps_to_error() {
    let base = stub_api().await;
    let t = translator(&base, "wrong-key");
    let err = t.translate("hello", "zh-CN", None).await.unwrap_err();
    assert!(matches!(err, TranslateError::Forbidden(ref m) if m == "bad key"));
}

#[tokio::test]
async fn test_supported_languages() {
    let base = stub_api().await;
    let langs = translator(&base, "good-key").supported_languages().await.unwrap();
    assert_eq!(langs.len(), 2);
    assert_eq!(langs[1].language, "zh-CN");
    assert_eq!(langs[1].name.as_deref(), Some("Chinese (Simplified)"));
}

#[tokio::test]
async fn test_unreachable_provider_is_network_error() {
    // bind then drop to get a port nobody listens on
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let t = translator(&format!("http://{addr}/v2"), "good-key");
    let err = t.detect_language("hello").await.unwrap_err();
    assert!(matches!(err, TranslateError::Network(_)));
}

#[tokio::test]
async fn test_unauthorized_refreshes_token() {
    let token_hits = Arc::new(AtomicUsize::new(0));
    let hits = Arc::clone(&token_hits);

    let app = Router::new()
        .route(
            "/token",
            get(move || {
                let hits = Arc::clone(&hits);
                async move {
                    let n = hits.fetch_add(1, Ordering::SeqCst);
                    Json(json!({"access_token": format!("t{n}"), "expires_in": 3600}))
                }
            }),
        )
        .route(
            "/v2/detect",
            post(|headers: HeaderMap| async move {
                // the first token is rejected, later ones accepted
                if headers["authorization"] == "Bearer t0" {
                    return (
                        StatusCode::UNAUTHORIZED,
                        Json(json!({"error": {"code": 401, "message": "expired"}})),
                    );
                }
                (
                    StatusCode::OK,
                    Json(json!({"data": {"detections": [[{"language": "en"}]]}})),
                )
            }),
        );
    let base = spawn(app).await;
    let token_url = base.replace("/v2", "/token");

    let t = GoogleTranslator::builder(Credentials::MetadataServer(token_url))
        .base_url(&base)
        .build()
        .unwrap();

    let err = t.detect_language("hi").await.unwrap_err();
    assert!(matches!(err, TranslateError::Unauthorized(_)));
    assert_eq!(t.detect_language("hi").await.unwrap(), "en");
    assert_eq!(token_hits.load(Ordering::SeqCst), 2);
}
