//! Template Store
//!
//! The authoritative collection of reusable content templates and extracted
//! patterns, with ranked retrieval. All mutations run under a single write
//! lock so concurrent renders never lose usage updates.

use super::types::{
    NewTemplate, Pattern, PatternType, Template, TemplateId, VARIABLE_RE,
};
use super::{seeds, ContentType, KnowledgeError};
use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::RwLock;

/// Substitute every `{name}` slot in `body` from `variables`.
///
/// Unresolved variables become the empty string — rendered output never
/// carries a literal placeholder.
pub fn render_body(body: &str, variables: &HashMap<String, String>) -> String {
    VARIABLE_RE
        .replace_all(body, |caps: &regex::Captures<'_>| {
            variables.get(&caps[1]).cloned().unwrap_or_default()
        })
        .into_owned()
}

#[derive(Default)]
struct StoreState {
    templates: HashMap<TemplateId, Template>,
    patterns: HashMap<(PatternType, TemplateId), Pattern>,
}

/// Shared pool of templates and extracted patterns.
///
/// Injected wherever template knowledge is needed; there is no process-wide
/// singleton.
pub struct TemplateStore {
    state: RwLock<StoreState>,
}

impl TemplateStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self {
            state: RwLock::new(StoreState::default()),
        }
    }

    /// Create a store bootstrapped with the built-in seed pools.
    pub fn with_seed_templates() -> Self {
        let store = Self::new();
        for data in seeds::seed_templates() {
            store.add_template(data);
        }
        store
    }

    // ========================================================================
    // Retrieval
    // ========================================================================

    /// Ranked template suggestions.
    ///
    /// Filters by exact match on `feature` and `platform` (and `content_type`
    /// when given), keeps only `performance_score >= min_performance`, and
    /// sorts descending by `(performance_score, usage_count)`. The
    /// usage-count tie-break is deliberate: between equally scored templates,
    /// the one proven over more renders ranks first.
    ///
    /// The store never widens its own filter. A caller that gets fewer than
    /// `limit` results may retry once with `content_type = None`.
    pub fn suggest(
        &self,
        feature: &str,
        platform: &str,
        content_type: Option<ContentType>,
        min_performance: f64,
        limit: usize,
    ) -> Vec<Template> {
        let state = self.state.read().unwrap();
        let mut matches: Vec<Template> = state
            .templates
            .values()
            .filter(|t| {
                t.feature == feature
                    && t.platform == platform
                    && content_type.map_or(true, |ct| t.content_type == ct)
                    && t.performance_score >= min_performance
            })
            .cloned()
            .collect();

        matches.sort_by(|a, b| rank_order(a, b));
        matches.truncate(limit);
        matches
    }

    /// All templates carrying the given feature tag (pool selection).
    pub fn templates_by_feature(&self, feature: &str) -> Vec<Template> {
        let state = self.state.read().unwrap();
        let mut matches: Vec<Template> = state
            .templates
            .values()
            .filter(|t| t.feature == feature)
            .cloned()
            .collect();
        matches.sort_by(|a, b| rank_order(a, b));
        matches
    }

    /// Fetch one template by ID.
    pub fn get(&self, id: &TemplateId) -> Option<Template> {
        self.state.read().unwrap().templates.get(id).cloned()
    }

    // ========================================================================
    // Rendering
    // ========================================================================

    /// Render a template with the given variables.
    ///
    /// Side effects, applied atomically with the read: `usage_count` is
    /// incremented by exactly one and `last_used_at` refreshed.
    pub fn render(
        &self,
        id: &TemplateId,
        variables: &HashMap<String, String>,
    ) -> Result<String, KnowledgeError> {
        let mut state = self.state.write().unwrap();
        let template = state
            .templates
            .get_mut(id)
            .ok_or_else(|| KnowledgeError::UnknownTemplate { id: id.clone() })?;
        template.touch_usage();
        Ok(render_body(&template.body, variables))
    }

    /// Record a render that happened against a derived copy of `id`.
    /// Returns false when the template is gone (derived copies may outlive
    /// their source).
    pub fn record_render(&self, id: &TemplateId) -> bool {
        let mut state = self.state.write().unwrap();
        match state.templates.get_mut(id) {
            Some(template) => {
                template.touch_usage();
                true
            }
            None => false,
        }
    }

    // ========================================================================
    // Insertion and Mutation
    // ========================================================================

    /// Insert a new template with zeroed metrics, returning its ID.
    pub fn add_template(&self, data: NewTemplate) -> TemplateId {
        let template = Template::from_new(data);
        let id = template.id.clone();
        self.state
            .write()
            .unwrap()
            .templates
            .insert(id.clone(), template);
        id
    }

    /// Run a closure against one template under the write lock.
    /// Returns `None` when the template does not exist.
    pub(crate) fn with_template_mut<R>(
        &self,
        id: &TemplateId,
        f: impl FnOnce(&mut Template) -> R,
    ) -> Option<R> {
        let mut state = self.state.write().unwrap();
        state.templates.get_mut(id).map(f)
    }

    /// Create or update a pattern keyed by `(pattern_type, template_id)`.
    pub(crate) fn upsert_pattern(&self, pattern: Pattern) {
        let mut state = self.state.write().unwrap();
        let key = (pattern.pattern_type, pattern.template_id.clone());
        state
            .patterns
            .entry(key)
            .and_modify(|existing| {
                existing.performance_score = pattern.performance_score;
                existing.sample_size += 1;
                existing.text = pattern.text.clone();
            })
            .or_insert(pattern);
    }

    /// All extracted patterns.
    pub fn patterns(&self) -> Vec<Pattern> {
        self.state.read().unwrap().patterns.values().cloned().collect()
    }

    // ========================================================================
    // Aggregates
    // ========================================================================

    pub fn template_count(&self) -> usize {
        self.state.read().unwrap().templates.len()
    }

    /// Sum of usage counts across all templates
    pub fn total_usage(&self) -> u64 {
        self.state
            .read()
            .unwrap()
            .templates
            .values()
            .map(|t| t.usage_count)
            .sum()
    }

    /// Templates whose score clears `threshold`
    pub fn high_performing_count(&self, threshold: f64) -> usize {
        self.state
            .read()
            .unwrap()
            .templates
            .values()
            .filter(|t| t.performance_score >= threshold)
            .count()
    }
}

impl Default for TemplateStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Sort templates into suggestion order: descending by
/// `(performance_score, usage_count)`. Shared by the store and the
/// client-adapter ranking over derived template sets.
pub fn rank_templates(templates: &mut [Template]) {
    templates.sort_by(rank_order);
}

/// Descending by score, then usage count, then ID for a stable order.
fn rank_order(a: &Template, b: &Template) -> Ordering {
    b.performance_score
        .partial_cmp(&a.performance_score)
        .unwrap_or(Ordering::Equal)
        .then_with(|| b.usage_count.cmp(&a.usage_count))
        .then_with(|| a.id.cmp(&b.id))
}
