//! Backend Usage Statistics
//!
//! Tracks cumulative usage, cost, and error bookkeeping for each backend.

use serde::{Deserialize, Serialize};
use std::time::Instant;

/// Cumulative statistics for a single backend
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UsageStats {
    pub request_count: u64,
    pub success_count: u64,
    pub error_count: u64,
    pub total_tokens: u64,
    pub total_cost_usd: f64,
    pub total_latency_ms: u64,
    /// Message of the most recent failure, kept for fallback-chain reporting
    pub last_error: Option<String>,
    #[serde(skip)]
    pub last_used: Option<Instant>,
}

impl UsageStats {
    pub fn avg_latency_ms(&self) -> u64 {
        if self.success_count == 0 {
            0
        } else {
            self.total_latency_ms / self.success_count
        }
    }

    pub fn success_rate(&self) -> f64 {
        if self.request_count == 0 {
            1.0
        } else {
            self.success_count as f64 / self.request_count as f64
        }
    }

    pub fn avg_cost_per_request(&self) -> f64 {
        if self.success_count == 0 {
            0.0
        } else {
            self.total_cost_usd / self.success_count as f64
        }
    }

    pub fn record_success(&mut self, tokens: u32, cost_usd: f64, latency_ms: u64) {
        self.request_count += 1;
        self.success_count += 1;
        self.total_tokens += tokens as u64;
        self.total_cost_usd += cost_usd;
        self.total_latency_ms += latency_ms;
        self.last_used = Some(Instant::now());
    }

    pub fn record_failure(&mut self, error: impl Into<String>) {
        self.request_count += 1;
        self.error_count += 1;
        self.last_error = Some(error.into());
        self.last_used = Some(Instant::now());
    }
}
