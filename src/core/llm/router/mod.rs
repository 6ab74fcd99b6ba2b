//! Generation Router
//!
//! Routes a generation request across the configured backends with automatic
//! fallback: candidates are ordered by the deterministic task classifier,
//! deduplicated, and attempted in sequence — each under its own timeout —
//! until one succeeds. Every attempt's outcome is recorded against the
//! backend's usage statistics.

mod builder;
mod stats;
mod types;

pub use builder::FallbackRouterBuilder;
pub use stats::UsageStats;
pub use types::{
    BackendOutput, GenerationRequest, GenerationResponse, TaskComplexity, TaskKind, TaskProfile,
};

use super::cost::{estimated_cost, DEFAULT_TOKEN_ESTIMATE};
use super::registry::ProviderRegistry;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::{Duration, Instant};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, GenerationError>;

// ============================================================================
// Backend Trait
// ============================================================================

/// An interchangeable external generation service.
///
/// Implementations normalize their wire format into [`BackendOutput`]; the
/// router never sees provider-specific response shapes.
#[async_trait]
pub trait GenerationBackend: Send + Sync {
    /// Stable backend identifier ("openai", "anthropic", ...)
    fn id(&self) -> &str;

    /// Human-readable name
    fn name(&self) -> &str;

    /// Model identifier this backend is configured for
    fn model(&self) -> &str;

    /// Blended cost per 1k tokens in USD (0.0 for local backends)
    fn cost_per_1k(&self) -> f64;

    /// Execute one generation attempt
    async fn generate(&self, request: &GenerationRequest) -> Result<BackendOutput>;
}

// ============================================================================
// Errors
// ============================================================================

/// One failed attempt in an exhausted fallback chain
#[derive(Debug, Clone)]
pub struct BackendAttempt {
    pub backend: String,
    pub error: String,
}

fn format_attempts(attempts: &[BackendAttempt]) -> String {
    attempts
        .iter()
        .map(|a| format!("{}: {}", a.backend, a.error))
        .collect::<Vec<_>>()
        .join("; ")
}

/// Errors surfaced by the generation path
#[derive(Error, Debug)]
pub enum GenerationError {
    /// No backend has credentials configured
    #[error("no generation backend is configured")]
    NoBackendAvailable,

    /// A single backend attempt failed (auth, rate limit, transport).
    /// Retried against the next ranked backend; only surfaced if all fail.
    #[error("backend '{backend}' call failed: {message}")]
    BackendCallFailed { backend: String, message: String },

    /// A single backend attempt exceeded its timeout
    #[error("backend '{backend}' timed out after {timeout_ms}ms")]
    Timeout { backend: String, timeout_ms: u64 },

    /// The backend answered but the response could not be parsed
    #[error("backend '{backend}' returned malformed output: {detail}")]
    MalformedOutput { backend: String, detail: String },

    /// Every candidate in the fallback chain failed; carries the last error
    /// observed for each attempted backend.
    #[error("all configured backends failed: [{}]", format_attempts(.attempts))]
    AllBackendsFailed { attempts: Vec<BackendAttempt> },
}

impl GenerationError {
    pub fn call_failed(backend: impl Into<String>, message: impl Into<String>) -> Self {
        Self::BackendCallFailed {
            backend: backend.into(),
            message: message.into(),
        }
    }

    pub fn malformed(backend: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::MalformedOutput {
            backend: backend.into(),
            detail: detail.into(),
        }
    }
}

// ============================================================================
// Router Configuration
// ============================================================================

/// Configuration for the fallback router
#[derive(Debug, Clone)]
pub struct RouterConfig {
    /// Independent timeout per backend attempt. Kept well below any
    /// caller-facing deadline so a hung backend cannot stall the chain.
    pub attempt_timeout: Duration,
    /// Tokens assumed when a backend does not report usage
    pub default_token_estimate: u32,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            attempt_timeout: Duration::from_secs(20),
            default_token_estimate: DEFAULT_TOKEN_ESTIMATE,
        }
    }
}

// ============================================================================
// Fallback Router
// ============================================================================

/// Executes a generation request against the best available backend,
/// falling back through the remaining configured backends on failure.
pub struct FallbackRouter {
    registry: Arc<ProviderRegistry>,
    config: RouterConfig,
}

impl FallbackRouter {
    pub fn new(registry: Arc<ProviderRegistry>, config: RouterConfig) -> Self {
        Self { registry, config }
    }

    /// Build a router over backends discovered from the environment.
    pub fn from_env() -> Self {
        Self::new(
            Arc::new(ProviderRegistry::from_env()),
            RouterConfig::default(),
        )
    }

    pub fn builder() -> FallbackRouterBuilder {
        FallbackRouterBuilder::new()
    }

    /// The registry backing this router
    pub fn registry(&self) -> &Arc<ProviderRegistry> {
        &self.registry
    }

    /// Execute `request`, attempting backends in ranked order until one
    /// succeeds. No backend is tried twice within one request.
    ///
    /// Errors: [`GenerationError::NoBackendAvailable`] when nothing is
    /// configured, [`GenerationError::AllBackendsFailed`] when every
    /// candidate failed (listing the last error per backend).
    pub async fn generate(&self, request: &GenerationRequest) -> Result<GenerationResponse> {
        let configured = self.registry.backends();
        if configured.is_empty() {
            return Err(GenerationError::NoBackendAvailable);
        }

        let profile = TaskProfile::classify(request);
        let chain = self.build_chain(configured, request, &profile);
        log::debug!(
            "routing {:?}/{:?} request across {} candidate backend(s)",
            profile.kind,
            profile.complexity,
            chain.len()
        );

        let mut attempts: Vec<BackendAttempt> = Vec::new();

        for backend in chain {
            let started = Instant::now();
            let attempt = tokio::time::timeout(self.config.attempt_timeout, backend.generate(request));

            let error = match attempt.await {
                Ok(Ok(output)) => {
                    let latency_ms = started.elapsed().as_millis() as u64;
                    let tokens = output
                        .tokens_used
                        .unwrap_or(self.config.default_token_estimate);
                    let cost = estimated_cost(tokens, backend.cost_per_1k());
                    self.registry
                        .record_outcome(backend.id(), tokens, cost, latency_ms, Ok(()))
                        .await;
                    return Ok(GenerationResponse {
                        content: output.text,
                        provider_used: backend.id().to_string(),
                        model: backend.model().to_string(),
                        tokens_used: tokens,
                        estimated_cost_usd: cost,
                        latency_ms,
                    });
                }
                Ok(Err(e)) => e,
                Err(_) => GenerationError::Timeout {
                    backend: backend.id().to_string(),
                    timeout_ms: self.config.attempt_timeout.as_millis() as u64,
                },
            };

            log::warn!("backend '{}' attempt failed: {error}", backend.id());
            self.registry
                .record_outcome(backend.id(), 0, 0.0, 0, Err(error.to_string()))
                .await;
            attempts.push(BackendAttempt {
                backend: backend.id().to_string(),
                error: error.to_string(),
            });
        }

        Err(GenerationError::AllBackendsFailed { attempts })
    }

    /// Order candidates: explicit preference first, then the classifier's
    /// class order, then the remaining configured backends in fixed priority.
    /// Deduplicated so no backend appears twice.
    fn build_chain(
        &self,
        configured: &[Arc<dyn GenerationBackend>],
        request: &GenerationRequest,
        profile: &TaskProfile,
    ) -> Vec<Arc<dyn GenerationBackend>> {
        let mut chain: Vec<Arc<dyn GenerationBackend>> = Vec::with_capacity(configured.len());

        let push = |id: &str, chain: &mut Vec<Arc<dyn GenerationBackend>>| {
            if chain.iter().any(|b| b.id() == id) {
                return;
            }
            if let Some(backend) = configured.iter().find(|b| b.id() == id) {
                chain.push(Arc::clone(backend));
            }
        };

        if let Some(preferred) = &request.preferred_backend {
            push(preferred, &mut chain);
        }
        for id in profile.preferred_order() {
            push(id, &mut chain);
        }
        // Anything configured but outside the known class order still gets a
        // slot at the end of the chain.
        for backend in configured {
            if !chain.iter().any(|b| b.id() == backend.id()) {
                chain.push(Arc::clone(backend));
            }
        }

        chain
    }
}
