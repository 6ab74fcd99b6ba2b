//! Client Adaptation Module
//!
//! Turns the shared template pool into per-client knowledge bases:
//! - `profile`: brand profiles and the persisted-profile store boundary
//! - `personalize`: best-effort body rewriting and deterministic touch-ups
//! - `adapter`: derived-set lifecycle (resolve, rebuild, render)

pub mod adapter;
pub mod personalize;
pub mod profile;

pub use adapter::{ClientAdapter, ClientKnowledgeBase, RenderRequest, RenderedContent};
pub use personalize::{
    adjust_hashtags, apply_tone, personalize_body, resolve_call_to_action, Personalization,
};
pub use profile::{
    BrandProfile, BrandVoice, InMemoryProfileStore, JsonProfileStore, ProfileStore, SiteSummary,
};

use thiserror::Error;

/// Errors raised by the client layer.
///
/// Personalization failures never appear here — they degrade the derived
/// set (see [`Personalization`]) instead of failing the request.
#[derive(Error, Debug)]
pub enum ClientError {
    /// Profile persistence failed (load or save)
    #[error("profile storage failed for '{client_id}': {message}")]
    ProfileStorage { client_id: String, message: String },
}

impl ClientError {
    pub fn profile_storage(client_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ProfileStorage {
            client_id: client_id.into(),
            message: message.into(),
        }
    }
}
