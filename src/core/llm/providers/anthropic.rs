//! Anthropic Backend Implementation
//!
//! Adapter for the Anthropic messages API.

use crate::core::llm::cost::BackendPricing;
use crate::core::llm::router::{
    BackendOutput, GenerationBackend, GenerationError, GenerationRequest, Result,
};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

const ANTHROPIC_BASE_URL: &str = "https://api.anthropic.com/v1";
const ANTHROPIC_VERSION: &str = "2023-06-01";

#[derive(Serialize)]
struct MessagesRequest {
    model: String,
    max_tokens: u32,
    messages: Vec<WireMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

#[derive(Serialize)]
struct WireMessage {
    role: &'static str,
    content: String,
}

#[derive(Deserialize)]
struct MessagesResponse {
    content: Vec<WireContent>,
    usage: Option<WireUsage>,
}

#[derive(Deserialize)]
struct WireContent {
    text: String,
}

#[derive(Deserialize)]
struct WireUsage {
    input_tokens: u32,
    output_tokens: u32,
}

/// Anthropic backend
pub struct AnthropicBackend {
    api_key: String,
    model: String,
    base_url: String,
    cost_per_1k: f64,
    client: reqwest::Client,
}

impl AnthropicBackend {
    pub fn new(api_key: String, model: String) -> Self {
        let cost_per_1k = BackendPricing::for_model("anthropic", &model)
            .map(|p| p.cost_per_1k)
            .unwrap_or(0.009);
        Self {
            api_key,
            model,
            base_url: ANTHROPIC_BASE_URL.to_string(),
            cost_per_1k,
            client: reqwest::Client::new(),
        }
    }

    /// Override the API endpoint (test seam)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

#[async_trait]
impl GenerationBackend for AnthropicBackend {
    fn id(&self) -> &str {
        "anthropic"
    }

    fn name(&self) -> &str {
        "Anthropic"
    }

    fn model(&self) -> &str {
        &self.model
    }

    fn cost_per_1k(&self) -> f64 {
        self.cost_per_1k
    }

    async fn generate(&self, request: &GenerationRequest) -> Result<BackendOutput> {
        let body = MessagesRequest {
            model: self.model.clone(),
            max_tokens: request.max_tokens.unwrap_or(1024),
            messages: vec![WireMessage {
                role: "user",
                content: request.prompt.clone(),
            }],
            temperature: request.temperature,
        };

        let response = self
            .client
            .post(format!(
                "{}/messages",
                self.base_url.trim_end_matches('/')
            ))
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&body)
            .send()
            .await
            .map_err(|e| GenerationError::call_failed("anthropic", e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let detail = response.text().await.unwrap_or_default();
            return Err(GenerationError::call_failed(
                "anthropic",
                format!("HTTP {status}: {detail}"),
            ));
        }

        let parsed: MessagesResponse = response
            .json()
            .await
            .map_err(|e| GenerationError::malformed("anthropic", e.to_string()))?;

        let text = parsed
            .content
            .first()
            .map(|c| c.text.clone())
            .ok_or_else(|| GenerationError::malformed("anthropic", "empty content array"))?;

        Ok(BackendOutput {
            text,
            tokens_used: parsed.usage.map(|u| u.input_tokens + u.output_tokens),
        })
    }
}
