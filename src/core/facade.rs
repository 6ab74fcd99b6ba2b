//! Generation Facade
//!
//! The single entry point for content requests: serve from the client's
//! derived template set first, synthesize any deficit through the fallback
//! router, and feed successful backend output back into the template pool so
//! the cache keeps improving.

use crate::core::client::{ClientAdapter, RenderRequest, RenderedContent};
use crate::core::knowledge::store::render_body;
use crate::core::knowledge::{
    find_platform, ContentType, EngagementSample, NewTemplate, PerformanceLearner, TemplateId,
    TemplateStore,
};
use crate::core::llm::{
    estimated_cost, FallbackRouter, GenerationError, GenerationRequest, DEFAULT_TOKEN_ESTIMATE,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

/// Assumed blended rate used to price avoided generations before any real
/// backend spend has been observed.
const ASSUMED_COST_PER_1K: f64 = 0.002;

// ============================================================================
// Facade Types
// ============================================================================

/// Where a served item came from, for cost accounting and telemetry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentSource {
    Cache,
    Generated,
}

/// One item returned to the caller
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratedItem {
    #[serde(flatten)]
    pub content: RenderedContent,
    pub source: ContentSource,
}

/// Cost-accounting summary of the cache
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CostSavingsReport {
    pub total_templates: usize,
    pub high_performing_templates: usize,
    pub total_usage: u64,
    /// Share of all served generations that never touched a backend
    pub cache_hit_rate_estimate: f64,
    pub estimated_cost_savings: f64,
}

/// Facade tunables
#[derive(Debug, Clone)]
pub struct FacadeConfig {
    /// Variants aimed for per request
    pub target_variants: usize,
    /// Successful backend outputs persisted back into the pool per request
    pub persist_generated: usize,
    /// Score floor for counting a template as high-performing in reports
    pub high_performer_threshold: f64,
}

impl Default for FacadeConfig {
    fn default() -> Self {
        Self {
            target_variants: 5,
            persist_generated: 2,
            high_performer_threshold: 0.05,
        }
    }
}

// ============================================================================
// Generation Facade
// ============================================================================

/// Orchestrates the cache-first generation flow.
pub struct GenerationFacade {
    store: Arc<TemplateStore>,
    adapter: Arc<ClientAdapter>,
    router: Arc<FallbackRouter>,
    learner: PerformanceLearner,
    config: FacadeConfig,
}

impl GenerationFacade {
    pub fn new(
        store: Arc<TemplateStore>,
        adapter: Arc<ClientAdapter>,
        router: Arc<FallbackRouter>,
    ) -> Self {
        let learner = PerformanceLearner::new(Arc::clone(&store));
        Self {
            store,
            adapter,
            router,
            learner,
            config: FacadeConfig::default(),
        }
    }

    pub fn with_config(mut self, config: FacadeConfig) -> Self {
        self.config = config;
        self
    }

    /// Generate content for a client on a topic/platform.
    ///
    /// Flow: resolve the client's knowledge base → rank its templates → if
    /// fewer than the target variant count match, widen once to any content
    /// type, then synthesize the remaining deficit through the fallback
    /// router. Up to `persist_generated` backend outputs are persisted back
    /// into the pool. Every candidate is formatted against the platform
    /// profile; items still over the length cap are dropped (and logged),
    /// never silently truncated.
    ///
    /// Backend exhaustion is surfaced as a hard error only when the cache
    /// contributed nothing; otherwise the cached items are returned and the
    /// failure is logged.
    pub async fn generate_for_client(
        &self,
        client_id: &str,
        topic: &str,
        platform: &str,
        content_type: Option<ContentType>,
    ) -> Result<Vec<GeneratedItem>, GenerationError> {
        let profile = match find_platform(platform) {
            Some(profile) => profile,
            None => {
                log::warn!("unknown platform '{platform}' requested by '{client_id}'");
                return Ok(Vec::new());
            }
        };

        // Cache path: exact content type first, widened once if short.
        let mut request = RenderRequest {
            topic: topic.to_string(),
            platform: profile.id.to_string(),
            content_type,
            limit: self.config.target_variants,
        };
        let mut cached = self.adapter.render_for_client(client_id, &request).await;
        if cached.len() < self.config.target_variants && content_type.is_some() {
            request.content_type = None;
            for item in self.adapter.render_for_client(client_id, &request).await {
                if !cached.iter().any(|c| c.template_id == item.template_id) {
                    cached.push(item);
                    if cached.len() == self.config.target_variants {
                        break;
                    }
                }
            }
        }

        let mut items: Vec<GeneratedItem> = cached
            .into_iter()
            .map(|content| GeneratedItem {
                content,
                source: ContentSource::Cache,
            })
            .collect();

        // Generation path: synthesize the deficit through the router.
        let deficit = self.config.target_variants.saturating_sub(items.len());
        if deficit > 0 {
            match self
                .synthesize(client_id, topic, profile.id, content_type, deficit)
                .await
            {
                Ok(generated) => items.extend(generated),
                Err(e) if items.is_empty() => return Err(e),
                Err(e) => {
                    log::warn!("backend synthesis failed, serving cache only: {e}");
                }
            }
        }

        // Platform formatting and validation.
        let mut result = Vec::with_capacity(items.len());
        for mut item in items {
            let formatted = profile.format(&item.content.content, &item.content.hashtags);
            if !profile.validates(&formatted) {
                log::warn!(
                    "dropping item from template '{}': {} chars exceeds {} limit on {}",
                    item.content.template_id,
                    formatted.chars().count(),
                    profile.max_length,
                    profile.id
                );
                continue;
            }
            item.content.character_count = formatted.chars().count();
            item.content.content = formatted;
            result.push(item);
        }

        Ok(result)
    }

    /// Fire-and-forget learning hook for engagement callbacks.
    /// Unknown template IDs are logged and swallowed.
    pub fn record_engagement(&self, template_id: &TemplateId, sample: &EngagementSample) {
        let _ = self.learner.learn(template_id, sample);
    }

    /// Cost-accounting summary: cache size, quality, and the spend avoided
    /// by serving templates instead of calling backends.
    pub async fn cost_savings_report(&self) -> CostSavingsReport {
        let snapshot = self.router.registry().snapshot().await;

        let total_usage = self.store.total_usage();
        let generated = snapshot.totals.success_count;
        let served = total_usage + generated;
        let cache_hit_rate_estimate = if served == 0 {
            0.0
        } else {
            total_usage as f64 / served as f64
        };

        let mut avg_cost = snapshot.totals.avg_cost_per_generation();
        if avg_cost == 0.0 {
            avg_cost = estimated_cost(DEFAULT_TOKEN_ESTIMATE, ASSUMED_COST_PER_1K);
        }

        CostSavingsReport {
            total_templates: self.store.template_count(),
            high_performing_templates: self
                .store
                .high_performing_count(self.config.high_performer_threshold),
            total_usage,
            cache_hit_rate_estimate,
            estimated_cost_savings: total_usage as f64 * avg_cost,
        }
    }

    // ========================================================================
    // Backend Synthesis
    // ========================================================================

    async fn synthesize(
        &self,
        client_id: &str,
        topic: &str,
        platform: &str,
        content_type: Option<ContentType>,
        count: usize,
    ) -> Result<Vec<GeneratedItem>, GenerationError> {
        let kb = self.adapter.resolve(client_id).await;
        let profile = &kb.profile;
        let content_type = content_type.unwrap_or(ContentType::Promotional);
        let max_length = find_platform(platform).map(|p| p.max_length).unwrap_or(280);

        let mut generated = Vec::with_capacity(count);
        let mut persisted = 0usize;

        for variant in 0..count {
            let prompt = format!(
                "Write a {platform} marketing post (variant {n}) for {company}, \
                 a {industry} company, about {topic}. Angle: {angle}. \
                 Keep the body under {max_length} characters. \
                 Respond as JSON: {{\"body\": \"...\", \"hashtags\": [\"...\"], \
                 \"call_to_action\": \"...\"}}",
                n = variant + 1,
                company = profile.company_name,
                industry = profile.industry,
                angle = content_type.as_str(),
            );
            let request = GenerationRequest::new(prompt)
                .with_hint("create social media content")
                .with_max_tokens(400);

            // A failure mid-batch keeps the variants already produced.
            let response = match self.router.generate(&request).await {
                Ok(response) => response,
                Err(e) if generated.is_empty() => return Err(e),
                Err(e) => {
                    log::warn!("synthesis stopped after {} variant(s): {e}", generated.len());
                    break;
                }
            };
            let draft = GeneratedDraft::parse(&response.content);

            // Substitute any slots the backend echoed back verbatim.
            let mut vars = HashMap::new();
            vars.insert("company_name".to_string(), profile.company_name.clone());
            vars.insert("feature".to_string(), topic.to_string());
            let body = render_body(&draft.body, &vars);

            // Close the learning loop: keep the first couple of successful
            // outputs as reusable templates.
            let template_id = if persisted < self.config.persist_generated {
                persisted += 1;
                self.store.add_template(
                    NewTemplate::new(topic, platform, content_type, body.clone())
                        .with_hashtags(draft.hashtags.clone())
                        .with_call_to_action(draft.call_to_action.clone()),
                )
            } else {
                TemplateId::generate()
            };

            generated.push(GeneratedItem {
                content: RenderedContent {
                    id: uuid::Uuid::new_v4().to_string(),
                    template_id,
                    character_count: body.chars().count(),
                    content: body,
                    platform: platform.to_string(),
                    content_type,
                    feature: topic.to_string(),
                    call_to_action: draft.call_to_action,
                    hashtags: draft.hashtags,
                    generated_at: Utc::now(),
                },
                source: ContentSource::Generated,
            });
        }

        Ok(generated)
    }
}

// ============================================================================
// Backend Output Parsing
// ============================================================================

/// Structured draft expected from a backend
#[derive(Debug, Clone, Deserialize)]
struct GeneratedDraft {
    body: String,
    #[serde(default)]
    hashtags: Vec<String>,
    #[serde(default)]
    call_to_action: String,
}

impl GeneratedDraft {
    /// Parse a backend response, recovering locally from malformed output:
    /// anything that isn't the expected JSON shape becomes a plain body with
    /// no hashtags. The failure is never propagated.
    fn parse(text: &str) -> Self {
        let trimmed = strip_code_fences(text);
        match serde_json::from_str::<GeneratedDraft>(trimmed) {
            Ok(draft) => draft,
            Err(e) => {
                log::debug!("backend output not structured ({e}), using raw text");
                Self {
                    body: trimmed.to_string(),
                    hashtags: Vec::new(),
                    call_to_action: String::new(),
                }
            }
        }
    }
}

/// Trim markdown code fences some backends wrap JSON in.
fn strip_code_fences(text: &str) -> &str {
    let trimmed = text.trim();
    trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .and_then(|inner| inner.strip_suffix("```"))
        .map(str::trim)
        .unwrap_or(trimmed)
}
