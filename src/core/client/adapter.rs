//! Client Adapter
//!
//! Derives a client-specific template set from the shared pool plus a brand
//! profile. Derived knowledge bases are cached behind an LRU of `Arc`s;
//! rebuilds construct off-lock and swap the `Arc` in one step, so readers
//! never observe a half-rebuilt set.

use super::personalize::{
    adjust_hashtags, apply_tone, personalize_body, resolve_call_to_action,
};
use super::profile::{BrandProfile, ProfileStore};
use super::ClientError;
use crate::core::knowledge::seeds::match_specialization;
use crate::core::knowledge::store::{rank_templates, render_body, TemplateStore};
use crate::core::knowledge::types::{ContentType, Template, TemplateId};
use chrono::{DateTime, Utc};
use lru::LruCache;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::num::NonZeroUsize;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Derived knowledge bases kept hot per process.
const KB_CACHE_CAPACITY: usize = 256;

// ============================================================================
// Derived State
// ============================================================================

/// Per-client derived state: brand profile plus a private, customized copy
/// of the template pool. Immutable once built — updates replace the whole
/// value.
#[derive(Debug, Clone)]
pub struct ClientKnowledgeBase {
    pub client_id: String,
    pub profile: BrandProfile,
    /// Private customized copies. Each keeps its source template's ID so
    /// usage and engagement accrue to the shared pool.
    pub templates: Vec<Template>,
    /// True when any template fell back to name-only substitution
    pub personalization_degraded: bool,
    /// Mean performance score of the derived set at build time
    pub baseline_score: f64,
    pub built_at: DateTime<Utc>,
}

/// A request to render content for a client
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderRequest {
    pub topic: String,
    pub platform: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_type: Option<ContentType>,
    pub limit: usize,
}

/// One rendered content item, ready for platform formatting
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderedContent {
    /// Fresh per render — serving the same template twice never collides
    pub id: String,
    pub template_id: TemplateId,
    pub content: String,
    pub platform: String,
    pub content_type: ContentType,
    pub feature: String,
    pub call_to_action: String,
    pub hashtags: Vec<String>,
    pub character_count: usize,
    pub generated_at: DateTime<Utc>,
}

// ============================================================================
// Client Adapter
// ============================================================================

/// Resolves, rebuilds, and renders per-client template sets.
pub struct ClientAdapter {
    shared: Arc<TemplateStore>,
    profiles: Arc<dyn ProfileStore>,
    cache: RwLock<LruCache<String, Arc<ClientKnowledgeBase>>>,
}

impl ClientAdapter {
    pub fn new(shared: Arc<TemplateStore>, profiles: Arc<dyn ProfileStore>) -> Self {
        let capacity = NonZeroUsize::new(KB_CACHE_CAPACITY).unwrap_or(NonZeroUsize::MIN);
        Self {
            shared,
            profiles,
            cache: RwLock::new(LruCache::new(capacity)),
        }
    }

    /// Resolve a client's knowledge base, building it lazily on first use.
    ///
    /// A persisted profile is used when present; otherwise a minimal
    /// fallback profile is synthesized from the client ID. Personalization
    /// failures degrade the derived set but never fail the resolve.
    pub async fn resolve(&self, client_id: &str) -> Arc<ClientKnowledgeBase> {
        {
            let mut cache = self.cache.write().await;
            if let Some(kb) = cache.get(client_id) {
                return Arc::clone(kb);
            }
        }

        let profile = match self.profiles.load(client_id) {
            Ok(Some(profile)) => profile,
            Ok(None) => {
                log::debug!("no persisted profile for '{client_id}', synthesizing fallback");
                BrandProfile::fallback_for(client_id)
            }
            Err(e) => {
                log::warn!("profile load failed for '{client_id}': {e} — using fallback profile");
                BrandProfile::fallback_for(client_id)
            }
        };

        let kb = Arc::new(self.build_kb(client_id, profile));
        self.cache
            .write()
            .await
            .put(client_id.to_string(), Arc::clone(&kb));
        kb
    }

    /// Persist a new profile and unconditionally rebuild the derived set.
    ///
    /// The rebuild is a single atomic swap — the derived set is never
    /// incrementally patched, so it cannot drift from the source profile.
    pub async fn update(
        &self,
        client_id: &str,
        profile: BrandProfile,
    ) -> Result<Arc<ClientKnowledgeBase>, ClientError> {
        self.profiles.save(client_id, &profile)?;

        let kb = Arc::new(self.build_kb(client_id, profile));
        self.cache
            .write()
            .await
            .put(client_id.to_string(), Arc::clone(&kb));
        log::info!(
            "rebuilt knowledge base for '{client_id}' ({} templates)",
            kb.templates.len()
        );
        Ok(kb)
    }

    /// Render up to `request.limit` content items for a client.
    ///
    /// Candidates are the client's private templates filtered by platform
    /// (and content type when given); templates whose feature matches the
    /// topic rank ahead of the rest. Each render gets a fresh unique ID.
    pub async fn render_for_client(
        &self,
        client_id: &str,
        request: &RenderRequest,
    ) -> Vec<RenderedContent> {
        let kb = self.resolve(client_id).await;

        let matches_filter = |t: &Template| {
            t.platform == request.platform
                && request.content_type.map_or(true, |ct| t.content_type == ct)
        };

        // Derived copies freeze their metrics at build time; ranking reads
        // the live score and usage from the shared source template so
        // engagement feedback reorders suggestions without a rebuild.
        let with_live_metrics = |t: &Template| {
            let mut t = t.clone();
            if let Some(live) = self.shared.get(&t.id) {
                t.performance_score = live.performance_score;
                t.usage_count = live.usage_count;
            }
            t
        };

        let mut on_topic: Vec<Template> = kb
            .templates
            .iter()
            .filter(|t| matches_filter(t) && t.feature == request.topic)
            .map(with_live_metrics)
            .collect();
        let mut off_topic: Vec<Template> = kb
            .templates
            .iter()
            .filter(|t| matches_filter(t) && t.feature != request.topic)
            .map(with_live_metrics)
            .collect();
        rank_templates(&mut on_topic);
        rank_templates(&mut off_topic);
        on_topic.extend(off_topic);

        on_topic
            .into_iter()
            .take(request.limit)
            .map(|template| self.render_one(&kb, &template, &request.topic))
            .collect()
    }

    fn render_one(
        &self,
        kb: &ClientKnowledgeBase,
        template: &Template,
        topic: &str,
    ) -> RenderedContent {
        let mut vars = HashMap::new();
        vars.insert("feature".to_string(), topic.to_string());
        vars.insert("company_name".to_string(), kb.profile.company_name.clone());
        let content = render_body(&template.body, &vars);

        // The derived copy is an immutable snapshot; the render is recorded
        // against the shared source template.
        self.shared.record_render(&template.id);

        RenderedContent {
            id: uuid::Uuid::new_v4().to_string(),
            template_id: template.id.clone(),
            content: content.clone(),
            platform: template.platform.clone(),
            content_type: template.content_type,
            feature: topic.to_string(),
            call_to_action: template.call_to_action.clone(),
            hashtags: template.hashtags.clone(),
            character_count: content.chars().count(),
            generated_at: Utc::now(),
        }
    }

    // ========================================================================
    // Derivation
    // ========================================================================

    /// Build a client's derived template set from the base pool.
    fn build_kb(&self, client_id: &str, profile: BrandProfile) -> ClientKnowledgeBase {
        let specialization = match_specialization(&profile.industry)
            .or_else(|| match_specialization(&profile.company_name));

        // Industry-specific pool when the profile matches a known
        // specialization, generic cross-industry pool otherwise.
        let mut pool = match specialization {
            Some(key) => self.shared.templates_by_feature(key),
            None => Vec::new(),
        };
        if pool.is_empty() {
            pool = self.shared.templates_by_feature("general");
        }

        let mut degraded = false;
        let templates: Vec<Template> = pool
            .into_iter()
            .map(|base| {
                let personalized = personalize_body(&base.body, &profile);
                degraded |= personalized.is_degraded();

                let mut derived = base.clone();
                derived.set_body(apply_tone(&personalized.into_text(), profile.voice));
                derived.hashtags = adjust_hashtags(&base.hashtags, specialization);
                derived.call_to_action = resolve_call_to_action(&base.call_to_action, &profile);
                derived
            })
            .collect();

        if degraded {
            log::warn!(
                "personalization degraded for '{client_id}': fallback substitution only"
            );
        }

        let baseline_score = if templates.is_empty() {
            0.0
        } else {
            templates.iter().map(|t| t.performance_score).sum::<f64>() / templates.len() as f64
        };

        ClientKnowledgeBase {
            client_id: client_id.to_string(),
            profile,
            templates,
            personalization_degraded: degraded,
            baseline_score,
            built_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::client::profile::{BrandVoice, InMemoryProfileStore};

    fn adapter() -> ClientAdapter {
        ClientAdapter::new(
            Arc::new(TemplateStore::with_seed_templates()),
            Arc::new(InMemoryProfileStore::new()),
        )
    }

    fn rich_profile(name: &str) -> BrandProfile {
        BrandProfile::new(name, "General")
            .with_key_features(vec!["smart scheduling".to_string()])
            .with_how_it_works(vec!["Sign up".to_string(), "Connect".to_string()])
            .with_website("https://example.test")
    }

    #[tokio::test]
    async fn test_resolve_synthesizes_fallback_profile() {
        let adapter = adapter();
        let kb = adapter.resolve("acme-corp").await;
        assert_eq!(kb.profile.company_name, "Acme Corp");
        assert!(!kb.templates.is_empty());
        // Sparse fallback profile → degraded personalization
        assert!(kb.personalization_degraded);
    }

    #[tokio::test]
    async fn test_resolve_is_cached() {
        let adapter = adapter();
        let first = adapter.resolve("acme").await;
        let second = adapter.resolve("acme").await;
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[tokio::test]
    async fn test_full_profile_personalizes_without_degradation() {
        let adapter = adapter();
        let kb = adapter.update("acme", rich_profile("Acme")).await.unwrap();
        assert!(!kb.personalization_degraded);
        assert!(kb
            .templates
            .iter()
            .all(|t| !t.body.contains("{company_name}")));
        assert!(kb.templates.iter().any(|t| t.body.contains("Acme")));
    }

    #[tokio::test]
    async fn test_update_rebuilds_atomically() {
        let adapter = adapter();
        adapter.update("acme", rich_profile("Acme")).await.unwrap();

        let kb = adapter.update("acme", rich_profile("Zenith")).await.unwrap();
        // No template from the old derived set survives
        assert!(kb.templates.iter().all(|t| !t.body.contains("Acme")));
        assert!(kb.templates.iter().any(|t| t.body.contains("Zenith")));

        let resolved = adapter.resolve("acme").await;
        assert!(Arc::ptr_eq(&kb, &resolved));
    }

    #[tokio::test]
    async fn test_specialized_industry_uses_industry_pool() {
        let adapter = adapter();
        let profile = rich_profile("Joe's Place").with_voice(BrandVoice::Friendly);
        let profile = BrandProfile {
            industry: "Restaurant".to_string(),
            ..profile
        };
        let kb = adapter.update("joes", profile).await.unwrap();
        assert!(kb.templates.iter().all(|t| t.feature == "restaurant"));
        // Specialization hashtags injected
        assert!(kb
            .templates
            .iter()
            .any(|t| t.hashtags.iter().any(|h| h == "eatlocal")));
    }

    #[tokio::test]
    async fn test_render_for_client_fresh_ids_per_render() {
        let adapter = adapter();
        adapter.update("acme", rich_profile("Acme")).await.unwrap();

        let request = RenderRequest {
            topic: "scheduling".to_string(),
            platform: "twitter".to_string(),
            content_type: None,
            limit: 3,
        };
        let first = adapter.render_for_client("acme", &request).await;
        let second = adapter.render_for_client("acme", &request).await;

        assert!(!first.is_empty());
        for (a, b) in first.iter().zip(second.iter()) {
            assert_eq!(a.template_id, b.template_id);
            assert_ne!(a.id, b.id);
        }
    }

    #[tokio::test]
    async fn test_render_substitutes_topic_and_counts_chars() {
        let adapter = adapter();
        adapter.update("acme", rich_profile("Acme")).await.unwrap();

        let request = RenderRequest {
            topic: "invoicing".to_string(),
            platform: "twitter".to_string(),
            content_type: None,
            limit: 5,
        };
        let items = adapter.render_for_client("acme", &request).await;
        for item in &items {
            assert!(!item.content.contains('{'));
            assert_eq!(item.character_count, item.content.chars().count());
            assert_eq!(item.feature, "invoicing");
        }
    }

    #[tokio::test]
    async fn test_render_records_usage_on_shared_pool() {
        let shared = Arc::new(TemplateStore::with_seed_templates());
        let adapter = ClientAdapter::new(Arc::clone(&shared), Arc::new(InMemoryProfileStore::new()));
        adapter.update("acme", rich_profile("Acme")).await.unwrap();

        let before = shared.total_usage();
        let request = RenderRequest {
            topic: "scheduling".to_string(),
            platform: "twitter".to_string(),
            content_type: None,
            limit: 2,
        };
        let items = adapter.render_for_client("acme", &request).await;
        assert_eq!(shared.total_usage(), before + items.len() as u64);
    }
}
