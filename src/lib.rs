/// copymill — cost-optimized marketing content generation core
///
/// Core library providing multi-backend LLM routing with fallback, a
/// learning template cache, and per-client content personalization.

pub mod config;
pub mod core;

#[cfg(test)]
mod tests;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
