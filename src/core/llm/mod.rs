//! Generation Backend Module
//!
//! Provides the multi-backend generation layer:
//! - Routing with automatic fallback across configured backends
//! - Per-backend usage and cost bookkeeping
//! - Backend adapters normalizing provider wire formats
//!
//! # Module Structure
//!
//! - `router`: `FallbackRouter` and the `GenerationBackend` trait
//! - `registry`: configured backends + live usage statistics
//! - `cost`: per-1k pricing and cost arithmetic
//! - `providers`: individual backend implementations

pub mod cost;
pub mod providers;
pub mod registry;
pub mod router;

// Re-export commonly used types
pub use cost::{estimated_cost, BackendPricing, DEFAULT_TOKEN_ESTIMATE};
pub use registry::{ProviderRegistry, UsageSnapshot, UsageTotals};
pub use router::{
    BackendAttempt, BackendOutput, FallbackRouter, FallbackRouterBuilder, GenerationBackend,
    GenerationError, GenerationRequest, GenerationResponse, Result, RouterConfig, TaskComplexity,
    TaskKind, TaskProfile, UsageStats,
};

// Re-export backend implementations
pub use providers::*;

/// Create a router over backends discovered from the environment
pub fn router_from_env() -> FallbackRouter {
    FallbackRouter::from_env()
}

/// Create a router builder
pub fn router_builder() -> FallbackRouterBuilder {
    FallbackRouterBuilder::new()
}
