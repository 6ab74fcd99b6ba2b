//! Backend Cost Estimation
//!
//! Per-1k-token pricing for the supported generation backends and the
//! arithmetic shared by the router and the cost-savings report.

use serde::{Deserialize, Serialize};

/// Tokens assumed for an attempt when the backend does not report usage.
pub const DEFAULT_TOKEN_ESTIMATE: u32 = 500;

/// Pricing for a backend/model combination, expressed per 1k tokens.
///
/// Blended input/output rate; the finer split the upstream APIs bill on is
/// below the resolution this subsystem needs for routing and savings
/// accounting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendPricing {
    pub backend_id: String,
    pub model_id: String,
    /// Blended cost per 1k tokens in USD
    pub cost_per_1k: f64,
    /// Whether the model is free to run (local backends)
    pub is_free: bool,
}

impl BackendPricing {
    /// Pricing for a free local model
    pub fn free(backend_id: &str, model_id: &str) -> Self {
        Self {
            backend_id: backend_id.to_string(),
            model_id: model_id.to_string(),
            cost_per_1k: 0.0,
            is_free: true,
        }
    }

    /// Known blended pricing for common models (as of mid 2025)
    pub fn for_model(backend: &str, model: &str) -> Option<Self> {
        let cost_per_1k = match (backend, model) {
            ("anthropic", m) if m.contains("opus") => 0.045,
            ("anthropic", m) if m.contains("sonnet") => 0.009,
            ("anthropic", m) if m.contains("haiku") => 0.0024,
            ("openai", m) if m.contains("gpt-4o-mini") => 0.000375,
            ("openai", m) if m.contains("gpt-4o") => 0.00625,
            ("openai", m) if m.contains("gpt-4") => 0.02,
            ("openai", m) if m.contains("gpt-3.5") => 0.001,
            ("groq", m) if m.contains("70b") => 0.00069,
            ("groq", m) if m.contains("8b") => 0.000065,
            ("groq", _) => 0.00024,
            ("ollama", _) => return Some(Self::free("ollama", model)),
            _ => return None,
        };

        Some(Self {
            backend_id: backend.to_string(),
            model_id: model.to_string(),
            cost_per_1k,
            is_free: false,
        })
    }

    /// Cost of a call that consumed `tokens` tokens
    pub fn cost_for(&self, tokens: u32) -> f64 {
        estimated_cost(tokens, self.cost_per_1k)
    }
}

/// `(tokens / 1000) * cost_per_1k`, the estimate recorded for every attempt.
pub fn estimated_cost(tokens: u32, cost_per_1k: f64) -> f64 {
    (tokens as f64 / 1000.0) * cost_per_1k
}
