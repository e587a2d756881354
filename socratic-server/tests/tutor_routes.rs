use std::sync::Arc;

use axum::body::Body;
use axum::http::header::{CONTENT_TYPE, COOKIE, SET_COOKIE};
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use httpmock::prelude::*;
use serde_json::{json, Value};
use socratic_anthropic::{AnthropicClient, AnthropicConfig};
use socratic_core::{TutorService, FALLBACK_RESPONSE};
use socratic_server::{router, AppState};
use socratic_store_sqlite::SqliteConversationStore;
use tower::ServiceExt;

struct Harness {
    app: Router,
    store: SqliteConversationStore,
}

async fn harness(server: &MockServer) -> Harness {
    let store = SqliteConversationStore::builder("sqlite::memory:")
        .max_connections(1)
        .build()
        .await
        .expect("sqlite store should build");
    let gateway = AnthropicClient::new(
        AnthropicConfig::new("test-key").with_base_url(server.base_url()),
    )
    .expect("gateway should build");
    let tutor = TutorService::new(Arc::new(store.clone()), Arc::new(gateway));
    Harness {
        app: router(AppState::new(tutor)),
        store,
    }
}

fn ask_request(body: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri("/tutor/ask")
        .header(CONTENT_TYPE, "application/json");
    if let Some(cookie) = cookie {
        builder = builder.header(COOKIE, cookie);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

async fn json_body(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn session_cookie(response: &axum::response::Response) -> String {
    let raw = response
        .headers()
        .get(SET_COOKIE)
        .expect("new session should set a cookie")
        .to_str()
        .unwrap();
    raw.split(';').next().unwrap().to_string()
}

#[tokio::test]
async fn first_question_is_answered_and_persisted() {
    let server = MockServer::start_async().await;
    let upstream = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/v1/messages")
                .header("x-api-key", "test-key");
            then.status(200)
                .json_body(json!({"content": [{"type": "text", "text": "Four!"}]}));
        })
        .await;
    let harness = harness(&server).await;

    let response = harness
        .app
        .clone()
        .oneshot(ask_request(
            r#"{"question":"What is 2+2?","subject":"math"}"#,
            None,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let cookie = session_cookie(&response);
    assert!(cookie.starts_with("tutor_session_id="));
    assert_eq!(
        json_body(response).await,
        json!({"question": "What is 2+2?", "response": "Four!", "success": true})
    );

    let session_id = cookie.trim_start_matches("tutor_session_id=");
    assert_eq!(harness.store.count_for_session(session_id).await.unwrap(), 1);
    upstream.assert_async().await;
}

#[tokio::test]
async fn upstream_failure_returns_fallback_and_still_persists() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/v1/messages");
            then.status(500).body("overloaded");
        })
        .await;
    let harness = harness(&server).await;

    let response = harness
        .app
        .clone()
        .oneshot(ask_request(
            r#"{"question":"What is 2+2?","subject":"math"}"#,
            None,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let cookie = session_cookie(&response);
    assert_eq!(
        json_body(response).await,
        json!({"question": "What is 2+2?", "response": FALLBACK_RESPONSE, "success": true})
    );

    let history = harness
        .app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/tutor/history?subject=math")
                .header(COOKIE, cookie)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let turns = json_body(history).await;
    assert_eq!(turns.as_array().unwrap().len(), 1);
    assert_eq!(turns[0]["response"], json!(FALLBACK_RESPONSE));
}

#[tokio::test]
async fn returning_session_keeps_its_cookie_and_sends_history() {
    let server = MockServer::start_async().await;
    let follow_up = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/v1/messages")
                .body_contains("What is 2+2?")
                .body_contains("And 3+3?");
            then.status(200)
                .json_body(json!({"content": [{"type": "text", "text": "Six!"}]}));
        })
        .await;
    let first = server
        .mock_async(|when, then| {
            when.method(POST).path("/v1/messages");
            then.status(200)
                .json_body(json!({"content": [{"type": "text", "text": "Four!"}]}));
        })
        .await;
    let harness = harness(&server).await;

    let response = harness
        .app
        .clone()
        .oneshot(ask_request(
            r#"{"question":"What is 2+2?","subject":"math"}"#,
            None,
        ))
        .await
        .unwrap();
    let cookie = session_cookie(&response);

    let response = harness
        .app
        .clone()
        .oneshot(ask_request(
            r#"{"question":"And 3+3?","subject":"math"}"#,
            Some(&cookie),
        ))
        .await
        .unwrap();

    assert!(response.headers().get(SET_COOKIE).is_none());
    assert_eq!(json_body(response).await["response"], json!("Six!"));
    first.assert_hits_async(1).await;
    follow_up.assert_hits_async(1).await;

    let session_id = cookie.trim_start_matches("tutor_session_id=");
    assert_eq!(harness.store.count_for_session(session_id).await.unwrap(), 2);
}

#[tokio::test]
async fn blank_question_is_reported_with_success_false() {
    let server = MockServer::start_async().await;
    let upstream = server
        .mock_async(|when, then| {
            when.method(POST).path("/v1/messages");
            then.status(200)
                .json_body(json!({"content": [{"type": "text", "text": "unused"}]}));
        })
        .await;
    let harness = harness(&server).await;

    let response = harness
        .app
        .clone()
        .oneshot(ask_request(r#"{"subject":"math"}"#, None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        json_body(response).await,
        json!({"error": "Question can't be blank", "success": false})
    );
    upstream.assert_hits_async(0).await;
}

#[tokio::test]
async fn form_encoded_question_is_answered() {
    let server = MockServer::start_async().await;
    let upstream = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/v1/messages")
                .body_contains("What is 2+2?");
            then.status(200)
                .json_body(json!({"content": [{"type": "text", "text": "Four!"}]}));
        })
        .await;
    let harness = harness(&server).await;

    let request = Request::builder()
        .method("POST")
        .uri("/tutor/ask")
        .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from("question=What+is+2%2B2%3F&subject=math"))
        .unwrap();
    let response = harness.app.clone().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let cookie = session_cookie(&response);
    assert_eq!(
        json_body(response).await,
        json!({"question": "What is 2+2?", "response": "Four!", "success": true})
    );
    let session_id = cookie.trim_start_matches("tutor_session_id=");
    assert_eq!(harness.store.count_for_session(session_id).await.unwrap(), 1);
    upstream.assert_async().await;
}

#[tokio::test]
async fn malformed_body_is_reported_with_success_false() {
    let server = MockServer::start_async().await;
    let harness = harness(&server).await;

    let response = harness
        .app
        .clone()
        .oneshot(ask_request("{not json", None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["success"], json!(false));
    assert!(body["error"].as_str().is_some());
}

#[tokio::test]
async fn history_without_a_session_is_empty() {
    let server = MockServer::start_async().await;
    let harness = harness(&server).await;

    let response = harness
        .app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/tutor/history")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await, json!([]));
}

#[tokio::test]
async fn health_reports_ok() {
    let server = MockServer::start_async().await;
    let harness = harness(&server).await;

    let response = harness
        .app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await, json!({"status": "ok"}));
}
