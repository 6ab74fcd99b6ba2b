//! Platform Profiles
//!
//! Static per-platform constraints used to validate and format rendered
//! content. Read-only at runtime. Single source of truth.

use serde::{Deserialize, Serialize};

/// How emoji-heavy content on a platform usually is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmojiDensity {
    None,
    Light,
    Moderate,
    Heavy,
}

/// Static constraints for one publishing platform
#[derive(Debug, Clone)]
pub struct PlatformProfile {
    pub id: &'static str,
    pub max_length: usize,
    pub optimal_hashtag_count: usize,
    pub emoji_density: EmojiDensity,
    /// Local posting-time hints, 24h clock
    pub best_times: &'static [&'static str],
}

/// Canonical table of supported platforms.
pub const PLATFORMS: &[PlatformProfile] = &[
    PlatformProfile {
        id: "twitter",
        max_length: 280,
        optimal_hashtag_count: 2,
        emoji_density: EmojiDensity::Light,
        best_times: &["09:00", "12:00", "17:00"],
    },
    PlatformProfile {
        id: "linkedin",
        max_length: 3000,
        optimal_hashtag_count: 3,
        emoji_density: EmojiDensity::None,
        best_times: &["08:00", "10:00", "12:00"],
    },
    PlatformProfile {
        id: "facebook",
        max_length: 63_206,
        optimal_hashtag_count: 2,
        emoji_density: EmojiDensity::Moderate,
        best_times: &["13:00", "15:00", "19:00"],
    },
    PlatformProfile {
        id: "instagram",
        max_length: 2200,
        optimal_hashtag_count: 8,
        emoji_density: EmojiDensity::Heavy,
        best_times: &["11:00", "14:00", "19:00"],
    },
];

/// Look up a platform profile by ID ("x" is accepted as an alias for twitter).
pub fn find_platform(id: &str) -> Option<&'static PlatformProfile> {
    let id = id.to_lowercase();
    let id = if id == "x" { "twitter" } else { id.as_str() };
    PLATFORMS.iter().find(|p| p.id == id)
}

impl PlatformProfile {
    /// Append at most `optimal_hashtag_count` hashtags to the content.
    /// Tags are normalized to a single leading `#`.
    pub fn format(&self, content: &str, hashtags: &[String]) -> String {
        let tags: Vec<String> = hashtags
            .iter()
            .take(self.optimal_hashtag_count)
            .map(|t| format!("#{}", t.trim_start_matches('#')))
            .collect();

        if tags.is_empty() {
            content.to_string()
        } else {
            format!("{}\n\n{}", content.trim_end(), tags.join(" "))
        }
    }

    /// Whether formatted content fits the platform's hard length cap.
    pub fn validates(&self, content: &str) -> bool {
        content.chars().count() <= self.max_length
    }
}
