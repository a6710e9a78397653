use crate::e2e::helpers;

use fish_tts_proxy::domain::speech::RelayMode;
use helpers::mock_fish::UpstreamBehavior;
use helpers::{TestContext, DEFAULT_AUDIO, TEST_API_KEY};
use hyper::StatusCode;
use pretty_assertions::assert_eq;
use serde_json::json;
use test_context::test_context;

const NATIVE_PATH: &str = "/tts/fishaudio/v1/";

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_relay_audio_from_upstream(ctx: &TestContext) {
    let response = ctx
        .client
        .post(
            NATIVE_PATH,
            &json!({
                "text": "Hello world",
                "reference_id": "test_ref_123"
            }),
        )
        .await
        .unwrap();

    response
        .assert_status(StatusCode::OK)
        .assert_header("content-type", "audio/mp3")
        .assert_header("content-disposition", "attachment; filename=output.mp3");
    assert_eq!(response.body_bytes, DEFAULT_AUDIO);
}

#[tokio::test]
async fn it_should_relay_wav_audio() {
    let ctx = TestContext::start(UpstreamBehavior::audio(b"fake_wav_audio_data"))
        .await
        .unwrap();

    let response = ctx
        .client
        .post(
            NATIVE_PATH,
            &json!({
                "text": "Hello world",
                "reference_id": "test_ref_123",
                "format": "wav",
                "mp3_bitrate": 192
            }),
        )
        .await
        .unwrap();

    response
        .assert_status(StatusCode::OK)
        .assert_header("content-type", "audio/wav")
        .assert_header("content-disposition", "attachment; filename=output.wav");
    assert_eq!(response.body_bytes, b"fake_wav_audio_data");
}

#[tokio::test]
async fn it_should_relay_chunked_binary_audio_unaltered() {
    let chunks = vec![vec![0xff, 0xfb, 0x90, 0x00], vec![0x00, 0x0d, 0x0a], vec![0x80; 4096]];
    let expected: Vec<u8> = chunks.concat();

    for relay_mode in [RelayMode::Streaming, RelayMode::Buffered] {
        let ctx = TestContext::start_with(UpstreamBehavior::Audio(chunks.clone()), |config| {
            config.relay_mode = relay_mode;
        })
        .await
        .unwrap();

        let response = ctx
            .client
            .post(
                "/tts/fishaudio/v1",
                &json!({
                    "text": "Hello world",
                    "reference_id": "test_ref_123",
                    "format": "pcm"
                }),
            )
            .await
            .unwrap();

        response
            .assert_status(StatusCode::OK)
            .assert_header("content-type", "audio/pcm");
        assert_eq!(response.body_bytes, expected, "relay mode {:?}", relay_mode);
    }
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_send_the_native_payload_upstream(ctx: &TestContext) {
    let response = ctx
        .client
        .post(
            NATIVE_PATH,
            &json!({
                "text": "Test text",
                "reference_id": "ref_123",
                "format": "mp3",
                "mp3_bitrate": 64
            }),
        )
        .await
        .unwrap();

    response.assert_status(StatusCode::OK);

    let upstream = ctx.upstream.last_request();
    assert_eq!(
        upstream.payload,
        json!({
            "text": "Test text",
            "chunk_length": 200,
            "format": "mp3",
            "mp3_bitrate": 64,
            "references": [],
            "reference_id": "ref_123",
            "normalize": true,
            "latency": "normal"
        })
    );
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_send_required_upstream_headers(ctx: &TestContext) {
    ctx.client
        .post(
            NATIVE_PATH,
            &json!({
                "text": "Test text",
                "reference_id": "ref_123",
                "format": "pcm",
                "mp3_bitrate": 64
            }),
        )
        .await
        .unwrap()
        .assert_status(StatusCode::OK);

    let upstream = ctx.upstream.last_request();
    assert_eq!(upstream.headers["content-type"], "application/msgpack");
    assert_eq!(upstream.headers["model"], "speech-1.6");
    assert_eq!(
        upstream.headers["authorization"],
        format!("Bearer {}", TEST_API_KEY)
    );
    // Bitrate only applies to mp3
    assert_eq!(upstream.payload["mp3_bitrate"], serde_json::Value::Null);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_apply_native_defaults(ctx: &TestContext) {
    ctx.client
        .post(
            NATIVE_PATH,
            &json!({ "text": "Hi", "reference_id": "ref" }),
        )
        .await
        .unwrap()
        .assert_status(StatusCode::OK);

    let upstream = ctx.upstream.last_request();
    assert_eq!(upstream.payload["format"], "mp3");
    assert_eq!(upstream.payload["mp3_bitrate"], 128);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_forward_empty_text(ctx: &TestContext) {
    let response = ctx
        .client
        .post(
            NATIVE_PATH,
            &json!({ "text": "", "reference_id": "test_ref_123" }),
        )
        .await
        .unwrap();

    response.assert_status(StatusCode::OK);
    assert_eq!(ctx.upstream.last_request().payload["text"], "");
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_reject_missing_text(ctx: &TestContext) {
    let response = ctx
        .client
        .post(NATIVE_PATH, &json!({ "reference_id": "test_ref_123" }))
        .await
        .unwrap();

    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(response.validation_locs(), vec!["body.text"]);
    assert_eq!(ctx.upstream.request_count(), 0);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_reject_missing_reference_id(ctx: &TestContext) {
    let response = ctx
        .client
        .post(NATIVE_PATH, &json!({ "text": "Hello world" }))
        .await
        .unwrap();

    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(response.validation_locs(), vec!["body.reference_id"]);
    assert_eq!(ctx.upstream.request_count(), 0);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_reject_unknown_format_and_bitrate(ctx: &TestContext) {
    let response = ctx
        .client
        .post(
            NATIVE_PATH,
            &json!({
                "text": "Hello world",
                "reference_id": "test_ref_123",
                "format": "flac"
            }),
        )
        .await
        .unwrap();
    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(response.validation_locs(), vec!["body.format"]);

    let response = ctx
        .client
        .post(
            NATIVE_PATH,
            &json!({
                "text": "Hello world",
                "reference_id": "test_ref_123",
                "mp3_bitrate": 256
            }),
        )
        .await
        .unwrap();
    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(response.validation_locs(), vec!["body.mp3_bitrate"]);

    assert_eq!(ctx.upstream.request_count(), 0);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_reject_malformed_json(ctx: &TestContext) {
    let response = ctx
        .client
        .post_raw(
            NATIVE_PATH,
            b"{\"text\": ",
            &[("Content-Type", "application/json")],
        )
        .await
        .unwrap();

    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(response.validation_locs(), vec!["body"]);
    assert_eq!(ctx.upstream.request_count(), 0);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_accept_json_without_content_type(ctx: &TestContext) {
    let response = ctx
        .client
        .post_raw(
            NATIVE_PATH,
            br#"{"text": "Hi", "reference_id": "ref"}"#,
            &[],
        )
        .await
        .unwrap();

    response.assert_status(StatusCode::OK);
    assert_eq!(ctx.upstream.request_count(), 1);
}
