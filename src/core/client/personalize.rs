//! Template Personalization
//!
//! Best-effort rewriting of template bodies for a specific brand, plus the
//! deterministic text touch-ups applied after the rewrite. A failed rewrite
//! degrades to vendor-name substitution only — it never fails the caller.

use super::profile::{BrandProfile, BrandVoice};
use crate::core::knowledge::types::VARIABLE_RE;
use std::collections::HashMap;

/// Result of a personalization attempt. Call sites can distinguish "fully
/// personalized" from "fallback substitution only" instead of losing that
/// signal to a log line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Personalization {
    /// Company name, benefit, how-it-works, and link all injected
    Full(String),
    /// Rewrite inputs were missing; only the company name was substituted
    Fallback(String),
}

impl Personalization {
    pub fn text(&self) -> &str {
        match self {
            Self::Full(text) | Self::Fallback(text) => text,
        }
    }

    pub fn into_text(self) -> String {
        match self {
            Self::Full(text) | Self::Fallback(text) => text,
        }
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self, Self::Fallback(_))
    }
}

/// Substitute only the known variables, leaving unknown slots intact for
/// render time (when e.g. `{feature}` resolves to the requested topic).
fn substitute_known(body: &str, vars: &HashMap<&str, String>) -> String {
    VARIABLE_RE
        .replace_all(body, |caps: &regex::Captures<'_>| {
            vars.get(&caps[1])
                .cloned()
                .unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}

/// Rewrite a template body for a brand.
///
/// The full rewrite needs key features and how-it-works steps from the
/// profile; when either is missing the body falls back to company-name
/// substitution only and the degradation is reported in the return type.
pub fn personalize_body(body: &str, profile: &BrandProfile) -> Personalization {
    let mut vars: HashMap<&str, String> = HashMap::new();
    vars.insert("company_name", profile.company_name.clone());

    let first_feature = match profile.key_features.first() {
        Some(feature) if !profile.company_name.is_empty() && !profile.how_it_works.is_empty() => {
            feature
        }
        _ => return Personalization::Fallback(substitute_known(body, &vars)),
    };

    vars.insert("benefit", format!("{first_feature}, minus the busywork."));
    vars.insert("how_it_works", profile.how_it_works.join(". "));
    vars.insert(
        "link",
        profile
            .website
            .clone()
            .unwrap_or_else(|| "our website".to_string()),
    );

    Personalization::Full(substitute_known(body, &vars))
}

// ============================================================================
// Deterministic Touch-Ups
// ============================================================================

/// Phrase swaps applied per brand voice. Bodies are written in a neutral
/// register; these shift them toward the brand's tone.
const TONE_SWAPS: &[(BrandVoice, &[(&str, &str)])] = &[
    (
        BrandVoice::Professional,
        &[
            ("Real talk:", "In practice:"),
            ("Stop losing", "Reclaim"),
            ("headache", "bottleneck"),
        ],
    ),
    (
        BrandVoice::Friendly,
        &[("Reduce", "Cut down on"), ("utilize", "use")],
    ),
    (
        BrandVoice::Bold,
        &[
            ("Did you know?", "Here's the truth:"),
            ("Quick tip:", "Do this:"),
        ],
    ),
    (
        BrandVoice::Playful,
        &[("Learn more", "Come see"), ("Question for", "Pop quiz for")],
    ),
];

/// Apply the voice's phrase swaps to a body.
pub fn apply_tone(body: &str, voice: BrandVoice) -> String {
    let mut result = body.to_string();
    for (swap_voice, swaps) in TONE_SWAPS {
        if *swap_voice == voice {
            for (from, to) in swaps.iter() {
                result = result.replace(from, to);
            }
        }
    }
    result
}

/// Hashtags injected for matched industry specializations.
const SPECIALIZATION_TAGS: &[(&str, &[&str])] = &[
    ("restaurant", &["foodie", "eatlocal"]),
    ("fitness", &["fitfam", "training"]),
    ("retail", &["shoplocal", "style"]),
];

/// Prune duplicates and inject the specialization's tags (when matched),
/// keeping first-seen order.
pub fn adjust_hashtags(hashtags: &[String], specialization: Option<&str>) -> Vec<String> {
    let mut result: Vec<String> = Vec::new();
    let mut push = |tag: &str| {
        let tag = tag.trim_start_matches('#').to_string();
        if !tag.is_empty() && !result.iter().any(|t| t.eq_ignore_ascii_case(&tag)) {
            result.push(tag);
        }
    };

    for tag in hashtags {
        push(tag);
    }
    if let Some(key) = specialization {
        if let Some((_, tags)) = SPECIALIZATION_TAGS.iter().find(|(k, _)| *k == key) {
            for tag in tags.iter() {
                push(tag);
            }
        }
    }

    result
}

/// Replace a call-to-action's `{link}` slot with the brand's destination.
pub fn resolve_call_to_action(cta: &str, profile: &BrandProfile) -> String {
    let mut vars: HashMap<&str, String> = HashMap::new();
    vars.insert(
        "link",
        profile
            .website
            .clone()
            .unwrap_or_else(|| "our website".to_string()),
    );
    vars.insert("company_name", profile.company_name.clone());
    substitute_known(cta, &vars)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_profile() -> BrandProfile {
        BrandProfile::new("Acme", "General")
            .with_key_features(vec!["automated scheduling".to_string()])
            .with_how_it_works(vec![
                "Connect your calendar".to_string(),
                "Set your rules".to_string(),
            ])
            .with_website("https://acme.example")
    }

    #[test]
    fn test_full_personalization_injects_everything() {
        let result = personalize_body(
            "{company_name} explained: {how_it_works}. {benefit} See {link}",
            &full_profile(),
        );
        assert!(!result.is_degraded());
        let text = result.text();
        assert!(text.contains("Acme"));
        assert!(text.contains("Connect your calendar. Set your rules"));
        assert!(text.contains("automated scheduling, minus the busywork."));
        assert!(text.contains("https://acme.example"));
    }

    #[test]
    fn test_missing_features_degrades_to_name_substitution() {
        let sparse = BrandProfile::new("Acme", "General");
        let result = personalize_body("{company_name} does {benefit}", &sparse);
        assert!(result.is_degraded());
        assert!(result.text().contains("Acme"));
        // Unknown slots survive for render-time resolution
        assert!(result.text().contains("{benefit}"));
    }

    #[test]
    fn test_unknown_slots_survive_full_personalization() {
        let result = personalize_body("{company_name} handles {feature}", &full_profile());
        assert!(!result.is_degraded());
        assert!(result.text().contains("{feature}"));
    }

    #[test]
    fn test_apply_tone_professional() {
        let toned = apply_tone("Real talk: Stop losing hours", BrandVoice::Professional);
        assert_eq!(toned, "In practice: Reclaim hours");
    }

    #[test]
    fn test_apply_tone_leaves_other_voices_untouched() {
        let body = "Real talk: Stop losing hours";
        assert_eq!(apply_tone(body, BrandVoice::Playful), body);
    }

    #[test]
    fn test_adjust_hashtags_injects_and_dedupes() {
        let tags = vec!["foodie".to_string(), "dinner".to_string()];
        let adjusted = adjust_hashtags(&tags, Some("restaurant"));
        assert_eq!(adjusted, vec!["foodie", "dinner", "eatlocal"]);
    }

    #[test]
    fn test_adjust_hashtags_no_specialization() {
        let tags = vec!["#growth".to_string(), "growth".to_string()];
        let adjusted = adjust_hashtags(&tags, None);
        assert_eq!(adjusted, vec!["growth"]);
    }

    #[test]
    fn test_resolve_call_to_action() {
        let cta = resolve_call_to_action("Try it at {link}", &full_profile());
        assert_eq!(cta, "Try it at https://acme.example");
    }
}
