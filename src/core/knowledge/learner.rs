//! Performance Learner
//!
//! Updates template performance scores from observed engagement and extracts
//! reusable patterns from high performers.

use super::store::TemplateStore;
use super::types::{EngagementSample, Pattern, PatternType, Template, TemplateId};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Emoji markers that identify an opening hook worth extracting.
pub const HOOK_MARKERS: &[&str] = &[
    "🚀", "💡", "🔥", "✨", "⚡", "🎯", "💥", "👀", "❗", "🍽️", "🛍️",
];

/// Tunable learning parameters.
///
/// The fixed confidences and the significance floor mirror observed practice
/// rather than a statistical derivation; deriving confidence from sample
/// counts is an open follow-up for real deployments.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LearnerConfig {
    /// Minimum resulting score before any pattern is extracted
    pub significance_floor: f64,
    /// Confidence assigned to extracted hooks
    pub hook_confidence: f64,
    /// Confidence assigned to extracted hashtag combinations
    pub hashtag_confidence: f64,
    /// Characters of body captured for a hook pattern
    pub hook_prefix_chars: usize,
}

impl Default for LearnerConfig {
    fn default() -> Self {
        Self {
            significance_floor: 0.03,
            hook_confidence: 0.8,
            hashtag_confidence: 0.9,
            hook_prefix_chars: 50,
        }
    }
}

/// Result of one learning step
#[derive(Debug, Clone)]
pub struct LearnOutcome {
    pub template_id: TemplateId,
    pub new_score: f64,
    pub extracted: Vec<PatternType>,
}

/// Applies engagement feedback to the shared template pool.
pub struct PerformanceLearner {
    store: Arc<TemplateStore>,
    config: LearnerConfig,
}

impl PerformanceLearner {
    pub fn new(store: Arc<TemplateStore>) -> Self {
        Self::with_config(store, LearnerConfig::default())
    }

    pub fn with_config(store: Arc<TemplateStore>, config: LearnerConfig) -> Self {
        Self { store, config }
    }

    pub fn config(&self) -> &LearnerConfig {
        &self.config
    }

    /// Fold one engagement sample into a template's score.
    ///
    /// The update is an incremental weighted average:
    /// `new = (old * usage_before + engagement_rate) / (usage_before + 1)`.
    /// A template proven over many renders moves less per sample than a
    /// fresh one — intentional smoothing, weighting history over any single
    /// measurement.
    ///
    /// Learning on an unknown template is a logged no-op: engagement
    /// callbacks may arrive after a template has been superseded.
    pub fn learn(&self, id: &TemplateId, sample: &EngagementSample) -> Option<LearnOutcome> {
        let updated = self.store.with_template_mut(id, |template| {
            let usage_before = template.usage_count as f64;
            let new_score = ((template.performance_score * usage_before)
                + sample.engagement_rate)
                / (usage_before + 1.0);
            template.performance_score = new_score.clamp(0.0, 1.0);
            template.engagement_rate = sample.engagement_rate;
            template.conversion_rate = sample.conversion_rate;
            template.clone()
        });

        let template = match updated {
            Some(t) => t,
            None => {
                log::warn!("engagement sample for unknown template '{id}' — ignored");
                return None;
            }
        };

        let mut extracted = Vec::new();
        if template.performance_score >= self.config.significance_floor {
            if let Some(pattern) = self.extract_hook(&template) {
                self.store.upsert_pattern(pattern);
                extracted.push(PatternType::Hook);
            }
            if let Some(pattern) = self.extract_hashtag_pattern(&template) {
                self.store.upsert_pattern(pattern);
                extracted.push(PatternType::HashtagPattern);
            }
        }

        log::debug!(
            "learned template '{id}': score {:.4}, {} pattern(s) extracted",
            template.performance_score,
            extracted.len()
        );

        Some(LearnOutcome {
            template_id: id.clone(),
            new_score: template.performance_score,
            extracted,
        })
    }

    /// Hook pattern: the opening of the body, only when it starts with a
    /// known emoji marker.
    fn extract_hook(&self, template: &Template) -> Option<Pattern> {
        if !HOOK_MARKERS.iter().any(|m| template.body.starts_with(m)) {
            return None;
        }
        let text: String = template
            .body
            .chars()
            .take(self.config.hook_prefix_chars)
            .collect();
        Some(self.pattern_from(template, PatternType::Hook, text, self.config.hook_confidence))
    }

    /// Hashtag pattern: the tag combination, only when at least two tags ride
    /// along.
    fn extract_hashtag_pattern(&self, template: &Template) -> Option<Pattern> {
        if template.hashtags.len() < 2 {
            return None;
        }
        let text = template.hashtags.join(" ");
        Some(self.pattern_from(
            template,
            PatternType::HashtagPattern,
            text,
            self.config.hashtag_confidence,
        ))
    }

    fn pattern_from(
        &self,
        template: &Template,
        pattern_type: PatternType,
        text: String,
        confidence: f64,
    ) -> Pattern {
        Pattern {
            pattern_type,
            template_id: template.id.clone(),
            text,
            feature: template.feature.clone(),
            platform: template.platform.clone(),
            content_type: template.content_type,
            performance_score: template.performance_score,
            confidence,
            sample_size: 1,
        }
    }
}
