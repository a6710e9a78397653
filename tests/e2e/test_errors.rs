use crate::e2e::helpers;

use fish_tts_proxy::domain::speech::RelayMode;
use helpers::mock_fish::UpstreamBehavior;
use helpers::TestContext;
use hyper::StatusCode;
use pretty_assertions::assert_eq;
use serde_json::json;
use std::time::Duration;

fn native_body() -> serde_json::Value {
    json!({
        "text": "Hello world",
        "reference_id": "test_ref_123"
    })
}

#[tokio::test]
async fn it_should_relay_upstream_rejection_as_bad_gateway() {
    let ctx = TestContext::start(UpstreamBehavior::status(400, "Bad Request"))
        .await
        .unwrap();

    let response = ctx
        .client
        .post("/tts/fishaudio/v1/", &native_body())
        .await
        .unwrap();

    response
        .assert_status(StatusCode::BAD_GATEWAY)
        .assert_detail_contains("Bad Request");
    assert_eq!(
        response.body,
        Some(json!({ "detail": "Bad Request", "upstream_status": 400 }))
    );
    assert_eq!(ctx.upstream.request_count(), 1);
}

#[tokio::test]
async fn it_should_relay_upstream_server_error_in_streaming_mode() {
    let ctx = TestContext::start_with(
        UpstreamBehavior::status(500, "model overloaded"),
        |config| config.relay_mode = RelayMode::Streaming,
    )
    .await
    .unwrap();

    let response = ctx
        .client
        .post(
            "/v1/audio/speech",
            &json!({ "input": "Hello", "model": "voice_abc" }),
        )
        .await
        .unwrap();

    response
        .assert_status(StatusCode::BAD_GATEWAY)
        .assert_detail_contains("model overloaded");
    assert_eq!(
        response.body.as_ref().and_then(|b| b.get("upstream_status")),
        Some(&json!(500))
    );
}

#[tokio::test]
async fn it_should_report_unreachable_upstream_as_server_error() {
    let ctx = TestContext::start_with(UpstreamBehavior::audio(b"unused"), |config| {
        config.fish_api_url = "http://127.0.0.1:1/v1/tts".to_string();
    })
    .await
    .unwrap();

    let response = ctx
        .client
        .post("/tts/fishaudio/v1/", &native_body())
        .await
        .unwrap();

    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    response.assert_detail_contains("error sending request");
    assert!(response
        .body
        .as_ref()
        .and_then(|b| b.get("upstream_status"))
        .is_none());
    assert_eq!(ctx.upstream.request_count(), 0);
}

#[tokio::test]
async fn it_should_time_out_stalled_upstream() {
    let ctx = TestContext::start_with(
        UpstreamBehavior::Stall(Duration::from_secs(5)),
        |config| config.upstream_timeout = Some(Duration::from_millis(200)),
    )
    .await
    .unwrap();

    let response = ctx
        .client
        .post("/tts/fishaudio/v1/", &native_body())
        .await
        .unwrap();

    response.assert_status(StatusCode::GATEWAY_TIMEOUT);
    assert!(response.body.as_ref().and_then(|b| b.get("detail")).is_some());
}

#[tokio::test]
async fn it_should_reject_non_object_body() {
    let ctx = TestContext::start(UpstreamBehavior::audio(b"unused"))
        .await
        .unwrap();

    let response = ctx
        .client
        .post("/tts/fishaudio/v2/", &json!(["Hello"]))
        .await
        .unwrap();

    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(response.validation_locs(), vec!["body"]);
    assert_eq!(ctx.upstream.request_count(), 0);
}

#[tokio::test]
async fn it_should_not_return_partial_audio_when_upstream_drops() {
    let ctx = TestContext::start(UpstreamBehavior::DropAfter(b"partial_audio".to_vec()))
        .await
        .unwrap();

    let response = ctx
        .client
        .post("/tts/fishaudio/v1/", &native_body())
        .await
        .unwrap();

    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    assert!(response.header("content-disposition").is_none());
    assert!(response
        .body
        .as_ref()
        .and_then(|b| b.get("detail"))
        .and_then(|d| d.as_str())
        .is_some());
    assert!(!response
        .body_bytes
        .windows(b"partial_audio".len())
        .any(|w| w == b"partial_audio"));
    assert_eq!(ctx.upstream.request_count(), 1);
}
