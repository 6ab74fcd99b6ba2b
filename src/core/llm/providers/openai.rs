//! OpenAI-Compatible Backend Implementation
//!
//! Shared adapter for every backend speaking the OpenAI chat-completions
//! wire format, plus the concrete OpenAI and Groq backends built on it.

use crate::core::llm::cost::BackendPricing;
use crate::core::llm::router::{
    BackendOutput, GenerationBackend, GenerationError, GenerationRequest, Result,
};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
const GROQ_BASE_URL: &str = "https://api.groq.com/openai/v1";

// ── Wire types ──────────────────────────────────────────────────────────────

#[derive(Serialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<WireMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

#[derive(Serialize)]
struct WireMessage {
    role: &'static str,
    content: String,
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<WireChoice>,
    usage: Option<WireUsage>,
}

#[derive(Deserialize)]
struct WireChoice {
    message: WireResponseMessage,
}

#[derive(Deserialize)]
struct WireResponseMessage {
    content: String,
}

#[derive(Deserialize)]
struct WireUsage {
    total_tokens: u32,
}

// ── Shared adapter ──────────────────────────────────────────────────────────

/// Backend adapter for any OpenAI-compatible chat-completions endpoint.
pub struct OpenAiCompatibleBackend {
    id: String,
    display_name: String,
    api_key: String,
    model: String,
    base_url: String,
    cost_per_1k: f64,
    client: reqwest::Client,
}

impl OpenAiCompatibleBackend {
    pub fn new(
        id: impl Into<String>,
        display_name: impl Into<String>,
        api_key: String,
        model: String,
        base_url: impl Into<String>,
        cost_per_1k: f64,
    ) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
            api_key,
            model,
            base_url: base_url.into(),
            cost_per_1k,
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl GenerationBackend for OpenAiCompatibleBackend {
    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &str {
        &self.display_name
    }

    fn model(&self) -> &str {
        &self.model
    }

    fn cost_per_1k(&self) -> f64 {
        self.cost_per_1k
    }

    async fn generate(&self, request: &GenerationRequest) -> Result<BackendOutput> {
        let body = ChatCompletionRequest {
            model: self.model.clone(),
            messages: vec![WireMessage {
                role: "user",
                content: request.prompt.clone(),
            }],
            max_tokens: request.max_tokens,
            temperature: request.temperature,
        };

        let response = self
            .client
            .post(format!(
                "{}/chat/completions",
                self.base_url.trim_end_matches('/')
            ))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&body)
            .send()
            .await
            .map_err(|e| GenerationError::call_failed(&self.id, e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let detail = response.text().await.unwrap_or_default();
            return Err(GenerationError::call_failed(
                &self.id,
                format!("HTTP {status}: {detail}"),
            ));
        }

        let parsed: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| GenerationError::malformed(&self.id, e.to_string()))?;

        let text = parsed
            .choices
            .first()
            .map(|c| c.message.content.clone())
            .ok_or_else(|| GenerationError::malformed(&self.id, "empty choices array"))?;

        Ok(BackendOutput {
            text,
            tokens_used: parsed.usage.map(|u| u.total_tokens),
        })
    }
}

// ── Concrete backends ───────────────────────────────────────────────────────

/// OpenAI backend
pub struct OpenAiBackend {
    inner: OpenAiCompatibleBackend,
}

impl OpenAiBackend {
    pub fn new(api_key: String, model: String) -> Self {
        let cost = BackendPricing::for_model("openai", &model)
            .map(|p| p.cost_per_1k)
            .unwrap_or(0.002);
        Self {
            inner: OpenAiCompatibleBackend::new(
                "openai",
                "OpenAI",
                api_key,
                model,
                OPENAI_BASE_URL,
                cost,
            ),
        }
    }
}

#[async_trait]
impl GenerationBackend for OpenAiBackend {
    fn id(&self) -> &str {
        "openai"
    }

    fn name(&self) -> &str {
        "OpenAI"
    }

    fn model(&self) -> &str {
        self.inner.model()
    }

    fn cost_per_1k(&self) -> f64 {
        self.inner.cost_per_1k()
    }

    async fn generate(&self, request: &GenerationRequest) -> Result<BackendOutput> {
        self.inner.generate(request).await
    }
}

/// Groq backend — OpenAI-compatible endpoint, fast cheap inference
pub struct GroqBackend {
    inner: OpenAiCompatibleBackend,
}

impl GroqBackend {
    pub fn new(api_key: String, model: String) -> Self {
        let cost = BackendPricing::for_model("groq", &model)
            .map(|p| p.cost_per_1k)
            .unwrap_or(0.00024);
        Self {
            inner: OpenAiCompatibleBackend::new("groq", "Groq", api_key, model, GROQ_BASE_URL, cost),
        }
    }
}

#[async_trait]
impl GenerationBackend for GroqBackend {
    fn id(&self) -> &str {
        "groq"
    }

    fn name(&self) -> &str {
        "Groq"
    }

    fn model(&self) -> &str {
        self.inner.model()
    }

    fn cost_per_1k(&self) -> f64 {
        self.inner.cost_per_1k()
    }

    async fn generate(&self, request: &GenerationRequest) -> Result<BackendOutput> {
        self.inner.generate(request).await
    }
}
