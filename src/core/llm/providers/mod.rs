//! Generation Backend Implementations
//!
//! Concrete implementations of the `GenerationBackend` trait for all
//! supported backends, plus the canonical backend metadata table.
//!
//! Adding a new backend requires:
//! 1. A new enum variant in `BackendConfig`
//! 2. A new entry in `BACKENDS`
//! 3. The backend implementation file

mod anthropic;
mod ollama;
mod openai;

pub use anthropic::AnthropicBackend;
pub use ollama::OllamaBackend;
pub use openai::{GroqBackend, OpenAiBackend, OpenAiCompatibleBackend};

use super::router::GenerationBackend;
use std::sync::Arc;

// ── Backend metadata ────────────────────────────────────────────────────────

/// Static metadata for a known backend (credentials source, defaults,
/// fixed fallback priority).
#[derive(Clone, Debug)]
pub struct BackendMeta {
    pub id: &'static str,
    pub display_name: &'static str,
    /// Environment variable holding the credential (API key or host URL)
    pub env_key: &'static str,
    pub default_model: &'static str,
    /// Position in the fixed fallback priority order (lower tries first)
    pub priority: u8,
}

/// Canonical table of all known backends, in fixed fallback priority order.
/// Single source of truth.
pub const BACKENDS: &[BackendMeta] = &[
    BackendMeta {
        id: "openai",
        display_name: "OpenAI",
        env_key: "OPENAI_API_KEY",
        default_model: "gpt-4o-mini",
        priority: 0,
    },
    BackendMeta {
        id: "anthropic",
        display_name: "Anthropic",
        env_key: "ANTHROPIC_API_KEY",
        default_model: "claude-3-5-haiku-latest",
        priority: 1,
    },
    BackendMeta {
        id: "groq",
        display_name: "Groq",
        env_key: "GROQ_API_KEY",
        default_model: "llama-3.1-8b-instant",
        priority: 2,
    },
    BackendMeta {
        id: "ollama",
        display_name: "Ollama (Local)",
        env_key: "OLLAMA_HOST",
        default_model: "llama3.2",
        priority: 3,
    },
];

/// Look up a backend's metadata by ID.
pub fn find_backend_meta(id: &str) -> Option<&'static BackendMeta> {
    BACKENDS.iter().find(|b| b.id == id)
}

// ── BackendConfig ───────────────────────────────────────────────────────────

/// Configuration for creating backends
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub enum BackendConfig {
    OpenAi {
        api_key: String,
        model: String,
    },
    Anthropic {
        api_key: String,
        model: String,
    },
    Groq {
        api_key: String,
        model: String,
    },
    Ollama {
        host: String,
        model: String,
    },
}

impl BackendConfig {
    /// Create a backend from this configuration
    pub fn create_backend(&self) -> Arc<dyn GenerationBackend> {
        match self {
            BackendConfig::OpenAi { api_key, model } => {
                Arc::new(OpenAiBackend::new(api_key.clone(), model.clone()))
            }
            BackendConfig::Anthropic { api_key, model } => {
                Arc::new(AnthropicBackend::new(api_key.clone(), model.clone()))
            }
            BackendConfig::Groq { api_key, model } => {
                Arc::new(GroqBackend::new(api_key.clone(), model.clone()))
            }
            BackendConfig::Ollama { host, model } => {
                Arc::new(OllamaBackend::new(host.clone(), model.clone()))
            }
        }
    }

    /// Get the backend ID for this configuration
    pub fn backend_id(&self) -> &'static str {
        match self {
            BackendConfig::OpenAi { .. } => "openai",
            BackendConfig::Anthropic { .. } => "anthropic",
            BackendConfig::Groq { .. } => "groq",
            BackendConfig::Ollama { .. } => "ollama",
        }
    }

    /// Get the model name for this configuration
    pub fn model_name(&self) -> String {
        match self {
            BackendConfig::OpenAi { model, .. }
            | BackendConfig::Anthropic { model, .. }
            | BackendConfig::Groq { model, .. }
            | BackendConfig::Ollama { model, .. } => model.clone(),
        }
    }

    /// Build a `BackendConfig` from parts (backend ID + credential).
    ///
    /// This is the single id-to-variant mapping point. Returns `None` for an
    /// unknown backend ID.
    pub fn from_parts(backend_id: &str, credential: &str, model: &str) -> Option<Self> {
        match backend_id {
            "openai" => Some(BackendConfig::OpenAi {
                api_key: credential.to_string(),
                model: model.to_string(),
            }),
            "anthropic" => Some(BackendConfig::Anthropic {
                api_key: credential.to_string(),
                model: model.to_string(),
            }),
            "groq" => Some(BackendConfig::Groq {
                api_key: credential.to_string(),
                model: model.to_string(),
            }),
            "ollama" => Some(BackendConfig::Ollama {
                host: credential.to_string(),
                model: model.to_string(),
            }),
            _ => None,
        }
    }

    /// Discover configured backends from the environment, in fixed priority
    /// order. A backend is configured when its credential variable is set and
    /// non-empty; everything else is skipped.
    pub fn discover_from_env() -> Vec<Self> {
        BACKENDS
            .iter()
            .filter_map(|meta| {
                let credential = std::env::var(meta.env_key).ok()?;
                if credential.trim().is_empty() {
                    return None;
                }
                Self::from_parts(meta.id, &credential, meta.default_model)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_table_is_priority_ordered() {
        for pair in BACKENDS.windows(2) {
            assert!(pair[0].priority < pair[1].priority);
        }
    }

    #[test]
    fn test_find_backend_meta() {
        assert!(find_backend_meta("openai").is_some());
        assert!(find_backend_meta("anthropic").is_some());
        assert!(find_backend_meta("nonexistent").is_none());
    }

    #[test]
    fn test_from_parts_known_ids() {
        for meta in BACKENDS {
            let config = BackendConfig::from_parts(meta.id, "credential", meta.default_model)
                .expect("known backend id should map");
            assert_eq!(config.backend_id(), meta.id);
            assert_eq!(config.model_name(), meta.default_model);
        }
    }

    #[test]
    fn test_from_parts_unknown_id() {
        assert!(BackendConfig::from_parts("mystery", "key", "model").is_none());
    }

    #[test]
    fn test_create_backend_ids_match() {
        let config = BackendConfig::OpenAi {
            api_key: "sk-test".to_string(),
            model: "gpt-4o-mini".to_string(),
        };
        assert_eq!(config.create_backend().id(), "openai");

        let config = BackendConfig::Ollama {
            host: "http://localhost:11434".to_string(),
            model: "llama3.2".to_string(),
        };
        assert_eq!(config.create_backend().id(), "ollama");
    }
}
