//! Test Fixtures
//!
//! Seeded stores, rich brand profiles, and a scriptable backend for driving
//! the facade without network access.

use crate::core::client::{BrandProfile, ClientAdapter, InMemoryProfileStore};
use crate::core::facade::GenerationFacade;
use crate::core::knowledge::TemplateStore;
use crate::core::llm::{
    BackendOutput, FallbackRouter, GenerationBackend, GenerationError, GenerationRequest,
    ProviderRegistry, Result, RouterConfig,
};
use async_trait::async_trait;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

/// Scriptable generation backend: returns a fixed body (as the structured
/// JSON draft the facade expects) or a fixed failure.
pub struct StaticBackend {
    id: String,
    body: String,
    fail: bool,
    calls: AtomicU32,
}

impl StaticBackend {
    pub fn succeeding(id: &str, body: &str) -> Arc<Self> {
        Arc::new(Self {
            id: id.to_string(),
            body: body.to_string(),
            fail: false,
            calls: AtomicU32::new(0),
        })
    }

    pub fn failing(id: &str) -> Arc<Self> {
        Arc::new(Self {
            id: id.to_string(),
            body: String::new(),
            fail: true,
            calls: AtomicU32::new(0),
        })
    }

    pub fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl GenerationBackend for StaticBackend {
    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &str {
        &self.id
    }

    fn model(&self) -> &str {
        "static-model"
    }

    fn cost_per_1k(&self) -> f64 {
        0.002
    }

    async fn generate(&self, _request: &GenerationRequest) -> Result<BackendOutput> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(GenerationError::call_failed(&self.id, "scripted failure"));
        }
        let draft = serde_json::json!({
            "body": self.body,
            "hashtags": ["fresh"],
            "call_to_action": "Learn more",
        });
        Ok(BackendOutput {
            text: draft.to_string(),
            tokens_used: Some(200),
        })
    }
}

/// A brand profile complete enough for full (non-degraded) personalization.
pub fn rich_profile(company: &str, industry: &str) -> BrandProfile {
    BrandProfile::new(company, industry)
        .with_key_features(vec![
            "smart scheduling".to_string(),
            "instant invoicing".to_string(),
        ])
        .with_how_it_works(vec![
            "Sign up".to_string(),
            "Connect your tools".to_string(),
            "Let it run".to_string(),
        ])
        .with_website("https://example.test")
}

/// Fully wired facade over the seed pool, an in-memory profile store, and
/// the given backends. Returns the handles tests need to poke each layer.
pub fn facade_with_backends(
    backends: Vec<Arc<dyn GenerationBackend>>,
) -> (GenerationFacade, Arc<TemplateStore>, Arc<ClientAdapter>, Arc<FallbackRouter>) {
    let store = Arc::new(TemplateStore::with_seed_templates());
    let adapter = Arc::new(ClientAdapter::new(
        Arc::clone(&store),
        Arc::new(InMemoryProfileStore::new()),
    ));
    let router = Arc::new(FallbackRouter::new(
        Arc::new(ProviderRegistry::new(backends)),
        RouterConfig::default(),
    ));
    let facade = GenerationFacade::new(
        Arc::clone(&store),
        Arc::clone(&adapter),
        Arc::clone(&router),
    );
    (facade, store, adapter, router)
}
