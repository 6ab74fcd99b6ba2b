//! Ollama Backend Implementation
//!
//! Adapter for a local Ollama instance. Free to run; the cheapest rung of
//! the fallback chain when a host is configured.

use crate::core::llm::router::{
    BackendOutput, GenerationBackend, GenerationError, GenerationRequest, Result,
};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

#[derive(Serialize)]
struct OllamaRequest {
    model: String,
    prompt: String,
    stream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    options: Option<OllamaOptions>,
}

#[derive(Serialize)]
struct OllamaOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    num_predict: Option<u32>,
}

#[derive(Deserialize)]
struct OllamaResponse {
    response: String,
    /// Output token count, reported once generation completes
    eval_count: Option<u32>,
    prompt_eval_count: Option<u32>,
}

/// Local Ollama backend
pub struct OllamaBackend {
    host: String,
    model: String,
    client: reqwest::Client,
}

impl OllamaBackend {
    pub fn new(host: String, model: String) -> Self {
        Self {
            host,
            model,
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl GenerationBackend for OllamaBackend {
    fn id(&self) -> &str {
        "ollama"
    }

    fn name(&self) -> &str {
        "Ollama (Local)"
    }

    fn model(&self) -> &str {
        &self.model
    }

    fn cost_per_1k(&self) -> f64 {
        0.0
    }

    async fn generate(&self, request: &GenerationRequest) -> Result<BackendOutput> {
        let options = if request.temperature.is_some() || request.max_tokens.is_some() {
            Some(OllamaOptions {
                temperature: request.temperature,
                num_predict: request.max_tokens,
            })
        } else {
            None
        };

        let body = OllamaRequest {
            model: self.model.clone(),
            prompt: request.prompt.clone(),
            stream: false,
            options,
        };

        let response = self
            .client
            .post(format!("{}/api/generate", self.host.trim_end_matches('/')))
            .json(&body)
            .send()
            .await
            .map_err(|e| GenerationError::call_failed("ollama", e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let detail = response.text().await.unwrap_or_default();
            return Err(GenerationError::call_failed(
                "ollama",
                format!("HTTP {status}: {detail}"),
            ));
        }

        let parsed: OllamaResponse = response
            .json()
            .await
            .map_err(|e| GenerationError::malformed("ollama", e.to_string()))?;

        let tokens_used = match (parsed.prompt_eval_count, parsed.eval_count) {
            (Some(prompt), Some(eval)) => Some(prompt + eval),
            (None, Some(eval)) => Some(eval),
            _ => None,
        };

        Ok(BackendOutput {
            text: parsed.response,
            tokens_used,
        })
    }
}
