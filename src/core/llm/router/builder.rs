//! Fallback Router Builder
//!
//! Builder pattern for constructing a FallbackRouter.

use std::sync::Arc;
use std::time::Duration;

use super::super::registry::ProviderRegistry;
use super::{FallbackRouter, GenerationBackend, RouterConfig};

/// Builder for constructing a FallbackRouter
pub struct FallbackRouterBuilder {
    config: RouterConfig,
    backends: Vec<Arc<dyn GenerationBackend>>,
}

impl FallbackRouterBuilder {
    pub fn new() -> Self {
        Self {
            config: RouterConfig::default(),
            backends: Vec::new(),
        }
    }

    pub fn with_config(mut self, config: RouterConfig) -> Self {
        self.config = config;
        self
    }

    pub fn add_backend(mut self, backend: Arc<dyn GenerationBackend>) -> Self {
        self.backends.push(backend);
        self
    }

    pub fn with_attempt_timeout(mut self, timeout: Duration) -> Self {
        self.config.attempt_timeout = timeout;
        self
    }

    pub fn with_default_token_estimate(mut self, tokens: u32) -> Self {
        self.config.default_token_estimate = tokens;
        self
    }

    pub fn build(self) -> FallbackRouter {
        FallbackRouter::new(Arc::new(ProviderRegistry::new(self.backends)), self.config)
    }
}

impl Default for FallbackRouterBuilder {
    fn default() -> Self {
        Self::new()
    }
}
