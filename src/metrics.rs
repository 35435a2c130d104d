use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use serde::{Deserialize, Serialize};

/// Pipeline counters for observability.
/// All metrics are atomic counters for thread-safety
#[derive(Clone, Default)]
pub struct PipelineMetrics {
    /// Attempt events folded into some user's state
    pub attempts_processed: Arc<AtomicU64>,
    /// Attempts that produced a submission record
    pub submissions_accepted: Arc<AtomicU64>,
    pub goal_updates: Arc<AtomicU64>,
    /// Updates where inactivity decay actually lowered the skill
    pub decay_applied: Arc<AtomicU64>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    pub attempts_processed: u64,
    pub submissions_accepted: u64,
    pub goal_updates: u64,
    pub decay_applied: u64,
}

impl PipelineMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_attempt(&self, accepted: bool) {
        self.attempts_processed.fetch_add(1, Ordering::Relaxed);
        if accepted {
            self.submissions_accepted.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub fn record_goal_update(&self) {
        self.goal_updates.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_decay(&self) {
        self.decay_applied.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            attempts_processed: self.attempts_processed.load(Ordering::Relaxed),
            submissions_accepted: self.submissions_accepted.load(Ordering::Relaxed),
            goal_updates: self.goal_updates.load(Ordering::Relaxed),
            decay_applied: self.decay_applied.load(Ordering::Relaxed),
        }
    }
}
