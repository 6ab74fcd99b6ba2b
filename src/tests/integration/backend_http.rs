//! Backend Adapter Wire-Format Tests
//!
//! Exercises the HTTP adapters against a local mock server: happy-path
//! parsing, error statuses, and malformed payload handling.

use crate::core::llm::{
    AnthropicBackend, GenerationBackend, GenerationError, GenerationRequest,
    OpenAiCompatibleBackend, OllamaBackend,
};
use serde_json::json;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn request() -> GenerationRequest {
    GenerationRequest::new("Write something").with_max_tokens(100)
}

fn compat_backend(server: &MockServer) -> OpenAiCompatibleBackend {
    OpenAiCompatibleBackend::new(
        "openai",
        "OpenAI",
        "sk-test".to_string(),
        "gpt-4o-mini".to_string(),
        server.uri(),
        0.000375,
    )
}

#[tokio::test]
async fn test_openai_compatible_success() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(header("Authorization", "Bearer sk-test"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{"message": {"role": "assistant", "content": "Hello there"}}],
            "usage": {"prompt_tokens": 12, "completion_tokens": 8, "total_tokens": 20}
        })))
        .mount(&server)
        .await;

    let output = compat_backend(&server).generate(&request()).await.unwrap();
    assert_eq!(output.text, "Hello there");
    assert_eq!(output.tokens_used, Some(20));
}

#[tokio::test]
async fn test_openai_compatible_http_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(429).set_body_string("rate limited"))
        .mount(&server)
        .await;

    let err = compat_backend(&server).generate(&request()).await.unwrap_err();
    match err {
        GenerationError::BackendCallFailed { backend, message } => {
            assert_eq!(backend, "openai");
            assert!(message.contains("429"));
        }
        other => panic!("expected BackendCallFailed, got {other:?}"),
    }
}

#[tokio::test]
async fn test_openai_compatible_malformed_payload() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json at all"))
        .mount(&server)
        .await;

    let err = compat_backend(&server).generate(&request()).await.unwrap_err();
    assert!(matches!(err, GenerationError::MalformedOutput { .. }));
}

#[tokio::test]
async fn test_openai_compatible_empty_choices_is_malformed() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"choices": []})))
        .mount(&server)
        .await;

    let err = compat_backend(&server).generate(&request()).await.unwrap_err();
    match err {
        GenerationError::MalformedOutput { detail, .. } => {
            assert!(detail.contains("empty choices"));
        }
        other => panic!("expected MalformedOutput, got {other:?}"),
    }
}

#[tokio::test]
async fn test_anthropic_success_sums_token_usage() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/messages"))
        .and(header("x-api-key", "sk-ant-test"))
        .and(header("anthropic-version", "2023-06-01"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "content": [{"type": "text", "text": "From Claude"}],
            "usage": {"input_tokens": 30, "output_tokens": 15}
        })))
        .mount(&server)
        .await;

    let backend = AnthropicBackend::new("sk-ant-test".to_string(), "claude-3-5-haiku".to_string())
        .with_base_url(server.uri());
    let output = backend.generate(&request()).await.unwrap();
    assert_eq!(output.text, "From Claude");
    assert_eq!(output.tokens_used, Some(45));
}

#[tokio::test]
async fn test_ollama_success_and_free_pricing() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "model": "llama3.2",
            "response": "Local output",
            "done": true,
            "prompt_eval_count": 25,
            "eval_count": 40
        })))
        .mount(&server)
        .await;

    let backend = OllamaBackend::new(server.uri(), "llama3.2".to_string());
    assert_eq!(backend.cost_per_1k(), 0.0);

    let output = backend.generate(&request()).await.unwrap();
    assert_eq!(output.text, "Local output");
    assert_eq!(output.tokens_used, Some(65));
}
