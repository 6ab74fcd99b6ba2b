//! Brand Profiles
//!
//! Client brand identity plus the persisted-profile store boundary. The
//! website-summarizer collaborator feeds `SiteSummary` values in; profile
//! persistence is abstracted behind `ProfileStore`.

use super::ClientError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

// ============================================================================
// Brand Voice
// ============================================================================

/// Tone the brand writes in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BrandVoice {
    #[default]
    Professional,
    Friendly,
    Bold,
    Playful,
}

impl BrandVoice {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Professional => "professional",
            Self::Friendly => "friendly",
            Self::Bold => "bold",
            Self::Playful => "playful",
        }
    }

    pub fn from_str(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "friendly" | "casual" => Self::Friendly,
            "bold" | "confident" => Self::Bold,
            "playful" | "fun" => Self::Playful,
            _ => Self::Professional,
        }
    }
}

// ============================================================================
// Brand Profile
// ============================================================================

/// A client's brand identity, the input to template derivation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrandProfile {
    pub company_name: String,
    pub industry: String,
    pub voice: BrandVoice,
    pub key_features: Vec<String>,
    pub how_it_works: Vec<String>,
    pub website: Option<String>,
}

impl BrandProfile {
    pub fn new(company_name: impl Into<String>, industry: impl Into<String>) -> Self {
        Self {
            company_name: company_name.into(),
            industry: industry.into(),
            voice: BrandVoice::default(),
            key_features: Vec::new(),
            how_it_works: Vec::new(),
            website: None,
        }
    }

    pub fn with_voice(mut self, voice: BrandVoice) -> Self {
        self.voice = voice;
        self
    }

    pub fn with_key_features(mut self, features: Vec<String>) -> Self {
        self.key_features = features;
        self
    }

    pub fn with_how_it_works(mut self, steps: Vec<String>) -> Self {
        self.how_it_works = steps;
        self
    }

    pub fn with_website(mut self, website: impl Into<String>) -> Self {
        self.website = Some(website.into());
        self
    }

    /// Minimal fallback profile synthesized from a client ID when nothing is
    /// persisted: the ID's naming convention yields the company name
    /// ("acme-corp" → "Acme Corp"), segments matching a known specialization
    /// yield the industry, and the voice defaults to professional.
    pub fn fallback_for(client_id: &str) -> Self {
        let base = client_id.split('@').next().unwrap_or(client_id);
        let words: Vec<String> = base
            .split(['-', '_', '.'])
            .filter(|w| !w.is_empty())
            .map(title_case)
            .collect();

        let company_name = if words.is_empty() {
            client_id.to_string()
        } else {
            words.join(" ")
        };

        let industry = crate::core::knowledge::seeds::match_specialization(base)
            .unwrap_or("General")
            .to_string();

        Self::new(company_name, industry)
    }

    /// Build a profile from a website-summarizer result.
    pub fn from_site_summary(company_name: impl Into<String>, summary: &SiteSummary) -> Self {
        Self {
            company_name: company_name.into(),
            industry: summary.industry.clone(),
            voice: BrandVoice::default(),
            key_features: summary.key_features.clone(),
            how_it_works: summary.how_it_works.clone(),
            website: None,
        }
    }
}

fn title_case(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

/// Output of the website-scraping summarizer (external collaborator),
/// consumed only as input to brand-profile construction.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteSummary {
    pub industry: String,
    pub mission: String,
    pub key_features: Vec<String>,
    pub how_it_works: Vec<String>,
}

// ============================================================================
// Profile Store
// ============================================================================

/// Persisted client-profile store boundary.
pub trait ProfileStore: Send + Sync {
    fn load(&self, client_id: &str) -> Result<Option<BrandProfile>, ClientError>;
    fn save(&self, client_id: &str, profile: &BrandProfile) -> Result<(), ClientError>;
}

/// In-memory profile store
#[derive(Default)]
pub struct InMemoryProfileStore {
    profiles: RwLock<HashMap<String, BrandProfile>>,
}

impl InMemoryProfileStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ProfileStore for InMemoryProfileStore {
    fn load(&self, client_id: &str) -> Result<Option<BrandProfile>, ClientError> {
        Ok(self.profiles.read().unwrap().get(client_id).cloned())
    }

    fn save(&self, client_id: &str, profile: &BrandProfile) -> Result<(), ClientError> {
        self.profiles
            .write()
            .unwrap()
            .insert(client_id.to_string(), profile.clone());
        Ok(())
    }
}

/// JSON-file profile store, one file per client under `dir`.
pub struct JsonProfileStore {
    dir: PathBuf,
}

impl JsonProfileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Store rooted at the platform data directory.
    pub fn in_data_dir() -> Self {
        let dir = dirs::data_dir()
            .map(|d| d.join("copymill").join("profiles"))
            .unwrap_or_else(|| PathBuf::from("profiles"));
        Self::new(dir)
    }

    fn path_for(&self, client_id: &str) -> PathBuf {
        // Client IDs may contain path-hostile characters
        let safe: String = client_id
            .chars()
            .map(|c| if c.is_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
            .collect();
        self.dir.join(format!("{safe}.json"))
    }
}

impl ProfileStore for JsonProfileStore {
    fn load(&self, client_id: &str) -> Result<Option<BrandProfile>, ClientError> {
        let path = self.path_for(client_id);
        let contents = match std::fs::read_to_string(&path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(ClientError::profile_storage(client_id, e.to_string()));
            }
        };
        let profile = serde_json::from_str(&contents)
            .map_err(|e| ClientError::profile_storage(client_id, e.to_string()))?;
        Ok(Some(profile))
    }

    fn save(&self, client_id: &str, profile: &BrandProfile) -> Result<(), ClientError> {
        std::fs::create_dir_all(&self.dir)
            .map_err(|e| ClientError::profile_storage(client_id, e.to_string()))?;
        let contents = serde_json::to_string_pretty(profile)
            .map_err(|e| ClientError::profile_storage(client_id, e.to_string()))?;
        std::fs::write(self.path_for(client_id), contents)
            .map_err(|e| ClientError::profile_storage(client_id, e.to_string()))
    }
}
