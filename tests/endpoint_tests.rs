use std::sync::{Arc, Mutex};

use inferline::{
    CompletionObserver, CompletionOptions, EndpointClient, EndpointError, GenerationParams,
    HttpTransport, JsonOutputsCodec,
};
use serde_json::{Value, json};
use wiremock::{
    Match, Mock, MockServer, Request as WiremockRequest, ResponseTemplate,
    matchers::{header, method, path},
};

fn client_for(server: &MockServer) -> EndpointClient<HttpTransport, JsonOutputsCodec> {
    let transport = HttpTransport::builder(format!("{}/invocations", server.uri()))
        .build()
        .expect("transport");
    EndpointClient::builder(transport, JsonOutputsCodec)
        .build()
        .expect("client")
}

#[derive(Clone)]
struct BodyField(&'static str, Value);

impl Match for BodyField {
    fn matches(&self, request: &WiremockRequest) -> bool {
        serde_json::from_slice::<Value>(&request.body)
            .map(|body| body[self.0] == self.1)
            .unwrap_or(false)
    }
}

#[derive(Default)]
struct RecordingObserver {
    increments: Mutex<Vec<String>>,
    errors: Mutex<Vec<String>>,
}

impl CompletionObserver for RecordingObserver {
    fn on_increment(&self, text: &str) {
        self.increments.lock().unwrap().push(text.to_string());
    }

    fn on_error(&self, error: &EndpointError) {
        self.errors.lock().unwrap().push(error.to_string());
    }
}

#[tokio::test]
async fn unary_completion_round_trip() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/invocations"))
        .and(header("content-type", "application/json"))
        .and(BodyField("inputs", json!("Tell me a joke.")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "outputs": ["Why did the borrow checker cross the road?"]
        })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let text = client
        .complete("Tell me a joke.", &CompletionOptions::new())
        .await
        .expect("completion");

    assert_eq!(text, "Why did the borrow checker cross the road?");
}

#[tokio::test]
async fn unary_completion_applies_stop_trimming() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/invocations"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "outputs": ["answer\nObservation: ignored"]
        })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let options = CompletionOptions::new().stop(vec!["\nObservation:".to_string()]);
    let text = client.complete("prompt", &options).await.expect("completion");

    assert_eq!(text, "answer");
}

#[tokio::test]
async fn unary_forwards_parameters_and_component_header() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/invocations"))
        .and(header("X-Inference-Component", "variant-b"))
        .and(BodyField("parameters", json!({ "temperature": 0.5 })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "outputs": ["routed"] })),
        )
        .mount(&server)
        .await;

    let transport = HttpTransport::builder(format!("{}/invocations", server.uri()))
        .build()
        .expect("transport");
    let client = EndpointClient::builder(transport, JsonOutputsCodec)
        .defaults(GenerationParams::new().set("temperature", 0.5))
        .component("variant-b")
        .build()
        .expect("client");

    let text = client
        .complete("prompt", &CompletionOptions::new())
        .await
        .expect("completion");

    assert_eq!(text, "routed");
}

#[tokio::test]
async fn error_status_maps_to_api_error_with_code() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/invocations"))
        .respond_with(ResponseTemplate::new(503).set_body_string("model loading"))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = client
        .complete("prompt", &CompletionOptions::new())
        .await
        .expect_err("error");

    match err {
        EndpointError::Api {
            status_code,
            message,
        } => {
            assert_eq!(status_code, 503);
            assert_eq!(message, "model loading");
        }
        other => panic!("expected Api error, got {other:?}"),
    }
}

#[tokio::test]
async fn observer_is_notified_of_api_errors() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/invocations"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let observer = Arc::new(RecordingObserver::default());
    let options = CompletionOptions::new().observer(observer.clone());

    client
        .complete("prompt", &options)
        .await
        .expect_err("error");

    assert_eq!(observer.errors.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn streamed_completion_reassembles_records() {
    let server = MockServer::start().await;

    let body = "{\"outputs\": [\" a\"]}\n{\"outputs\": [\" challenging\"]}\n{\"outputs\": [\" problem\"]}\n";
    Mock::given(method("POST"))
        .and(path("/invocations"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw(body.as_bytes().to_vec(), "application/octet-stream"),
        )
        .mount(&server)
        .await;

    let client = client_for(&server);
    let observer = Arc::new(RecordingObserver::default());
    let options = CompletionOptions::new().observer(observer.clone());

    let completion = client
        .complete_streamed("prompt", &options)
        .await
        .expect("completion");

    assert_eq!(completion, " a challenging problem");
    assert_eq!(
        *observer.increments.lock().unwrap(),
        vec![" a".to_string(), " challenging".to_string(), " problem".to_string()]
    );
}

#[tokio::test]
async fn streamed_completion_discards_unterminated_tail() {
    let server = MockServer::start().await;

    let body = "{\"outputs\": [\"kept\"]}\n{\"outputs\": [\"trunc";
    Mock::given(method("POST"))
        .and(path("/invocations"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw(body.as_bytes().to_vec(), "application/octet-stream"),
        )
        .mount(&server)
        .await;

    let client = client_for(&server);
    let completion = client
        .complete_streamed("prompt", &CompletionOptions::new())
        .await
        .expect("completion");

    assert_eq!(completion, "kept");
}

#[tokio::test]
async fn streaming_trims_and_suppresses_per_increment() {
    let server = MockServer::start().await;

    let body = "{\"outputs\": [\" foo\"]}\n{\"outputs\": [\" bar\"]}\n";
    Mock::given(method("POST"))
        .and(path("/invocations"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw(body.as_bytes().to_vec(), "application/octet-stream"),
        )
        .mount(&server)
        .await;

    let client = client_for(&server);
    let options = CompletionOptions::new().stop(vec![" bar".to_string()]);

    let completion = client
        .complete_streamed("prompt", &options)
        .await
        .expect("completion");

    assert_eq!(completion, " foo");
}

#[tokio::test]
async fn streaming_error_status_surfaces_before_any_increment() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/invocations"))
        .respond_with(ResponseTemplate::new(429).set_body_string("throttled"))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = client
        .complete_streamed("prompt", &CompletionOptions::new())
        .await
        .expect_err("error");

    assert!(matches!(err, EndpointError::Api { status_code: 429, .. }));
}
