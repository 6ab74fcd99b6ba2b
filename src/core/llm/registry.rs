//! Provider Registry
//!
//! Holds the configured generation backends in fixed priority order together
//! with their live usage statistics. Pure bookkeeping: recording an outcome
//! can never fail a request.

use super::providers::BackendConfig;
use super::router::{GenerationBackend, UsageStats};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Registry of configured backends plus per-backend usage stats.
///
/// The backend list is fixed at construction; statistics are updated under a
/// single lock so concurrent requests never lose updates.
pub struct ProviderRegistry {
    backends: Vec<Arc<dyn GenerationBackend>>,
    stats: RwLock<HashMap<String, UsageStats>>,
}

impl ProviderRegistry {
    /// Build a registry over an explicit backend list (test seam).
    pub fn new(backends: Vec<Arc<dyn GenerationBackend>>) -> Self {
        let stats = backends
            .iter()
            .map(|b| (b.id().to_string(), UsageStats::default()))
            .collect();
        Self {
            backends,
            stats: RwLock::new(stats),
        }
    }

    /// Discover backends with credentials present in the environment,
    /// in fixed priority order.
    pub fn from_env() -> Self {
        let backends: Vec<Arc<dyn GenerationBackend>> = BackendConfig::discover_from_env()
            .iter()
            .map(BackendConfig::create_backend)
            .collect();
        if backends.is_empty() {
            tracing::warn!("no generation backend credentials found in environment");
        } else {
            tracing::info!(
                "configured backends: {}",
                backends
                    .iter()
                    .map(|b| b.id())
                    .collect::<Vec<_>>()
                    .join(", ")
            );
        }
        Self::new(backends)
    }

    /// Ordered list of configured backends (credentials present).
    pub fn backends(&self) -> &[Arc<dyn GenerationBackend>] {
        &self.backends
    }

    /// Look up a configured backend by ID.
    pub fn get(&self, id: &str) -> Option<&Arc<dyn GenerationBackend>> {
        self.backends.iter().find(|b| b.id() == id)
    }

    /// Record the outcome of one backend attempt. Applied atomically under
    /// the stats lock; never fatal to the request being recorded.
    pub async fn record_outcome(
        &self,
        backend_id: &str,
        tokens: u32,
        cost_usd: f64,
        latency_ms: u64,
        outcome: Result<(), String>,
    ) {
        let mut stats = self.stats.write().await;
        let entry = stats.entry(backend_id.to_string()).or_default();
        match outcome {
            Ok(()) => entry.record_success(tokens, cost_usd, latency_ms),
            Err(error) => entry.record_failure(error),
        }
    }

    /// Stats for one backend.
    pub async fn stats_for(&self, backend_id: &str) -> Option<UsageStats> {
        self.stats.read().await.get(backend_id).cloned()
    }

    /// Point-in-time snapshot of all usage statistics.
    pub async fn snapshot(&self) -> UsageSnapshot {
        let stats = self.stats.read().await;
        let mut totals = UsageTotals::default();
        for s in stats.values() {
            totals.request_count += s.request_count;
            totals.success_count += s.success_count;
            totals.error_count += s.error_count;
            totals.total_tokens += s.total_tokens;
            totals.total_cost_usd += s.total_cost_usd;
        }
        UsageSnapshot {
            per_backend: stats.clone(),
            totals,
        }
    }
}

/// Aggregate counters across all backends
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UsageTotals {
    pub request_count: u64,
    pub success_count: u64,
    pub error_count: u64,
    pub total_tokens: u64,
    pub total_cost_usd: f64,
}

impl UsageTotals {
    /// Average recorded cost of one successful generation
    pub fn avg_cost_per_generation(&self) -> f64 {
        if self.success_count == 0 {
            0.0
        } else {
            self.total_cost_usd / self.success_count as f64
        }
    }
}

/// Snapshot of registry statistics for reporting
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UsageSnapshot {
    pub per_backend: HashMap<String, UsageStats>,
    pub totals: UsageTotals,
}
