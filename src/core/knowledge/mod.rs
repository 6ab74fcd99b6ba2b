//! Template Knowledge Module
//!
//! The template cache that serves scored, reusable content before any paid
//! backend is invoked:
//! - `store`: the shared template pool with ranked retrieval and rendering
//! - `learner`: engagement-driven score updates and pattern extraction
//! - `platforms`: static per-platform constraints
//! - `seeds`: built-in bootstrap pools

pub mod learner;
pub mod platforms;
pub mod seeds;
pub mod store;
pub mod types;

pub use learner::{LearnOutcome, LearnerConfig, PerformanceLearner, HOOK_MARKERS};
pub use platforms::{find_platform, EmojiDensity, PlatformProfile, PLATFORMS};
pub use store::{render_body, rank_templates, TemplateStore};
pub use types::{
    scan_variables, ContentType, EngagementSample, NewTemplate, Pattern, PatternType, Template,
    TemplateId,
};

use thiserror::Error;

/// Errors raised by the knowledge layer
#[derive(Error, Debug)]
pub enum KnowledgeError {
    /// A template ID no longer (or never) existed. At the learning edge this
    /// is logged and swallowed — engagement callbacks may arrive after a
    /// template has been superseded.
    #[error("unknown template: {id}")]
    UnknownTemplate { id: TemplateId },
}
