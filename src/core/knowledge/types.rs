//! Template Knowledge Types
//!
//! Core types for the template cache: reusable content templates, extracted
//! high-performing patterns, and engagement samples.

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Matches a named variable slot like `{company_name}` in a template body.
pub(crate) static VARIABLE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{([A-Za-z0-9_]+)\}").expect("valid variable regex"));

// ============================================================================
// Identifiers
// ============================================================================

/// Stable template identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TemplateId(String);

impl TemplateId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TemplateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// Content Classification
// ============================================================================

/// Editorial angle of a piece of content
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentType {
    Educational,
    BenefitFocused,
    SocialProof,
    Promotional,
    Engagement,
}

impl ContentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Educational => "educational",
            Self::BenefitFocused => "benefit_focused",
            Self::SocialProof => "social_proof",
            Self::Promotional => "promotional",
            Self::Engagement => "engagement",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "educational" => Some(Self::Educational),
            "benefit_focused" | "benefit" => Some(Self::BenefitFocused),
            "social_proof" | "testimonial" => Some(Self::SocialProof),
            "promotional" | "promo" => Some(Self::Promotional),
            "engagement" => Some(Self::Engagement),
            _ => None,
        }
    }
}

// ============================================================================
// Template
// ============================================================================

/// A reusable, parameterized content unit tied to a
/// feature/platform/content-type triple.
///
/// Templates are never physically deleted: poor performers rank low in
/// `suggest()` results and simply stop being selected.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Template {
    pub id: TemplateId,
    /// Topic or product-capability tag
    pub feature: String,
    pub platform: String,
    pub content_type: ContentType,
    /// Body text with named variable slots (e.g. `{company_name}`)
    pub body: String,
    /// Declared variable names appearing in the body
    pub variables: Vec<String>,
    pub hashtags: Vec<String>,
    pub call_to_action: String,
    /// Engagement-weighted score in [0, 1]
    pub performance_score: f64,
    pub usage_count: u64,
    pub engagement_rate: f64,
    pub conversion_rate: f64,
    /// Length of the body before platform formatting. Recomputed on every
    /// body change.
    pub character_count: usize,
    pub created_at: DateTime<Utc>,
    pub last_used_at: Option<DateTime<Utc>>,
}

impl Template {
    /// Build a fresh template from submitted data (zeroed metrics).
    pub fn from_new(data: NewTemplate) -> Self {
        let variables = scan_variables(&data.body);
        let character_count = data.body.chars().count();
        Self {
            id: TemplateId::generate(),
            feature: data.feature,
            platform: data.platform,
            content_type: data.content_type,
            body: data.body,
            variables,
            hashtags: data.hashtags,
            call_to_action: data.call_to_action,
            performance_score: 0.0,
            usage_count: 0,
            engagement_rate: 0.0,
            conversion_rate: 0.0,
            character_count,
            created_at: Utc::now(),
            last_used_at: None,
        }
    }

    /// Replace the body, keeping the character-count invariant and the
    /// declared-variable list in sync.
    pub fn set_body(&mut self, body: impl Into<String>) {
        self.body = body.into();
        self.variables = scan_variables(&self.body);
        self.character_count = self.body.chars().count();
    }

    /// Record one render against this template.
    pub fn touch_usage(&mut self) {
        self.usage_count += 1;
        self.last_used_at = Some(Utc::now());
    }
}

/// Data for inserting a new template
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewTemplate {
    pub feature: String,
    pub platform: String,
    pub content_type: ContentType,
    pub body: String,
    pub hashtags: Vec<String>,
    pub call_to_action: String,
}

impl NewTemplate {
    pub fn new(
        feature: impl Into<String>,
        platform: impl Into<String>,
        content_type: ContentType,
        body: impl Into<String>,
    ) -> Self {
        Self {
            feature: feature.into(),
            platform: platform.into(),
            content_type,
            body: body.into(),
            hashtags: Vec::new(),
            call_to_action: String::new(),
        }
    }

    pub fn with_hashtags(mut self, hashtags: Vec<String>) -> Self {
        self.hashtags = hashtags;
        self
    }

    pub fn with_call_to_action(mut self, cta: impl Into<String>) -> Self {
        self.call_to_action = cta.into();
        self
    }
}

/// Extract the distinct variable names declared in a body, in first-seen order.
pub fn scan_variables(body: &str) -> Vec<String> {
    let mut seen = Vec::new();
    for capture in VARIABLE_RE.captures_iter(body) {
        let name = capture[1].to_string();
        if !seen.contains(&name) {
            seen.push(name);
        }
    }
    seen
}

// ============================================================================
// Pattern
// ============================================================================

/// Kind of extracted fragment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PatternType {
    /// Opening hook (first ~50 characters behind an emoji marker)
    Hook,
    /// Hashtag combination carried by a high performer
    HashtagPattern,
}

/// A short extracted fragment believed to drive engagement.
///
/// Created only from templates whose score clears the learner's significance
/// floor — never from cold templates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pattern {
    pub pattern_type: PatternType,
    /// Template the fragment was extracted from (part of the pattern key)
    pub template_id: TemplateId,
    pub text: String,
    pub feature: String,
    pub platform: String,
    pub content_type: ContentType,
    pub performance_score: f64,
    /// Fixed per pattern type, not statistically derived
    pub confidence: f64,
    pub sample_size: u64,
}

// ============================================================================
// Engagement
// ============================================================================

/// One observed engagement measurement for a template
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EngagementSample {
    pub engagement_rate: f64,
    pub click_rate: f64,
    pub conversion_rate: f64,
    pub impressions: u64,
    pub clicks: u64,
    pub conversions: u64,
}
