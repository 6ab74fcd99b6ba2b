//! Generation Request Types
//!
//! Core types for generation requests, responses, and the deterministic
//! task-hint classifier that drives backend preference ordering.

use serde::{Deserialize, Serialize};

// ============================================================================
// Request/Response Types
// ============================================================================

/// Request for a single content generation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationRequest {
    /// Fully rendered prompt sent to the backend
    pub prompt: String,
    /// Free-text hint describing the task ("create a twitter post", "analyze ...")
    pub task_hint: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    /// Optional: request a specific backend to be tried first
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preferred_backend: Option<String>,
}

impl GenerationRequest {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            task_hint: String::new(),
            temperature: None,
            max_tokens: None,
            preferred_backend: None,
        }
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.task_hint = hint.into();
        self
    }

    pub fn with_temperature(mut self, temp: f32) -> Self {
        self.temperature = Some(temp);
        self
    }

    pub fn with_max_tokens(mut self, max: u32) -> Self {
        self.max_tokens = Some(max);
        self
    }

    pub fn with_preferred_backend(mut self, backend: impl Into<String>) -> Self {
        self.preferred_backend = Some(backend.into());
        self
    }
}

/// Normalized output every backend adapter must produce.
///
/// Wire-format differences between backends are isolated at the adapter
/// boundary; the router only ever sees this shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendOutput {
    pub text: String,
    /// Total tokens consumed, when the backend reports them
    pub tokens_used: Option<u32>,
}

/// Successful result of a routed generation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationResponse {
    pub content: String,
    pub provider_used: String,
    pub model: String,
    pub tokens_used: u32,
    pub estimated_cost_usd: f64,
    pub latency_ms: u64,
}

// ============================================================================
// Task Classification
// ============================================================================

/// Broad task category derived from the hint text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskKind {
    /// Net-new content ("create", "generate", "write")
    Creative,
    /// Comparison or evaluation work ("analyze", "compare", "evaluate")
    Analytical,
    General,
}

/// Estimated token need
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskComplexity {
    Simple,
    Standard,
    Complex,
}

/// Deterministic profile of a request, used to order candidate backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaskProfile {
    pub estimated_tokens: u32,
    pub kind: TaskKind,
    pub complexity: TaskComplexity,
}

const CREATIVE_KEYWORDS: &[&str] = &["create", "generate", "write", "draft", "compose"];
const ANALYTICAL_KEYWORDS: &[&str] = &["analyze", "analyse", "compare", "evaluate", "review", "assess"];

impl TaskProfile {
    /// Classify a request by token-count thresholds and hint keywords.
    ///
    /// The heuristic is intentionally deterministic: the same request always
    /// produces the same backend ordering.
    pub fn classify(request: &GenerationRequest) -> Self {
        let hint = request.task_hint.to_lowercase();

        // ~4 characters per token for English text
        let prompt_tokens = (request.prompt.len() as u32) / 4;
        let estimated_tokens = prompt_tokens + request.max_tokens.unwrap_or(500);

        let kind = if ANALYTICAL_KEYWORDS.iter().any(|k| hint.contains(k)) {
            TaskKind::Analytical
        } else if CREATIVE_KEYWORDS.iter().any(|k| hint.contains(k)) {
            TaskKind::Creative
        } else {
            TaskKind::General
        };

        let complexity = if estimated_tokens > 2000 || kind == TaskKind::Analytical {
            TaskComplexity::Complex
        } else if estimated_tokens > 600 {
            TaskComplexity::Standard
        } else {
            TaskComplexity::Simple
        };

        Self {
            estimated_tokens,
            kind,
            complexity,
        }
    }

    /// Preferred backend-class order for this profile.
    ///
    /// Complex/analytical work goes to the strongest models first; simple
    /// general work starts with the cheapest configured class.
    pub fn preferred_order(&self) -> &'static [&'static str] {
        match (self.kind, self.complexity) {
            (TaskKind::Analytical, _) | (_, TaskComplexity::Complex) => {
                &["anthropic", "openai", "groq", "ollama"]
            }
            (TaskKind::Creative, _) => &["openai", "anthropic", "groq", "ollama"],
            (TaskKind::General, TaskComplexity::Simple) => {
                &["groq", "ollama", "openai", "anthropic"]
            }
            (TaskKind::General, _) => &["openai", "groq", "anthropic", "ollama"],
        }
    }
}
