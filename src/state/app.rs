use std::collections::HashMap;
use std::sync::Arc;
use parking_lot::{Mutex, RwLock};
use chrono::Utc;
use crate::config::{get_engine_config, EngineConfig};
use crate::error::TrackerError;
use crate::history::AttemptEvent;
use crate::metrics::{MetricsSnapshot, PipelineMetrics};
use crate::profile::ProfileData;
use crate::state::engine::{self, EngineState};

/// Orchestrator owning every user's `EngineState`.
///
/// Each user's state sits behind its own mutex, held for the whole
/// read-recompute-write cycle, so updates for one user are strictly ordered
/// while different users proceed in parallel.
#[derive(Clone)]
pub struct Tracker {
    config: Arc<EngineConfig>,
    users: Arc<RwLock<HashMap<String, Arc<Mutex<EngineState>>>>>,
    metrics: PipelineMetrics,
}

impl Tracker {
    pub fn new(config: EngineConfig) -> Self {
        Tracker {
            config: Arc::new(config),
            users: Arc::new(RwLock::new(HashMap::new())),
            metrics: PipelineMetrics::new(),
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn metrics(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }

    /// Known user ids, sorted.
    pub fn users(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.users.read().keys().cloned().collect();
        ids.sort();
        ids
    }

    /// Snapshot of a user's current state.
    pub fn state(&self, user: &str) -> Result<EngineState, TrackerError> {
        let slot = self
            .users
            .read()
            .get(user)
            .cloned()
            .ok_or_else(|| TrackerError::UnknownUser(user.to_string()))?;
        let state = slot.lock().clone();
        Ok(state)
    }

    /// Snapshot of a user's state, registering the user with an initial state
    /// if they have not been seen yet.
    pub fn state_or_default(&self, user: &str) -> EngineState {
        let slot = self.slot(user);
        let state = slot.lock().clone();
        state
    }

    /// Seed a user with state read back from storage, replacing whatever was held.
    pub fn load_state(&self, user: &str, state: EngineState) {
        let slot = self.slot(user);
        *slot.lock() = state;
        tracing::debug!(user = user, "Loaded user state");
    }

    /// Remove a user, returning the last state held for them.
    pub fn remove_user(&self, user: &str) -> Option<EngineState> {
        let slot = self.users.write().remove(user)?;
        let state = slot.lock().clone();
        Some(state)
    }

    pub fn record_attempt(&self, user: &str, event: &AttemptEvent, now_ms: i64) -> EngineState {
        let slot = self.slot(user);
        let mut guard = slot.lock();

        let before = guard.skill_score;
        let last_active = guard.last_active;
        let next = engine::process_attempt(&guard, event, now_ms, &self.config);

        let accepted = next.submission_history.len() > guard.submission_history.len();
        self.metrics.record_attempt(accepted);
        if crate::skills::apply_decay(before, last_active, now_ms, &self.config) < before {
            self.metrics.record_decay();
        }

        *guard = next.clone();
        tracing::info!(
            user = user,
            slug = %event.slug,
            accepted = accepted,
            skill = next.skill_score,
            streak = next.streak,
            "Processed attempt event"
        );
        next
    }

    pub fn record_attempt_now(&self, user: &str, event: &AttemptEvent) -> EngineState {
        self.record_attempt(user, event, Utc::now().timestamp_millis())
    }

    pub fn update_goals(&self, user: &str, goals: Vec<String>) -> EngineState {
        let slot = self.slot(user);
        let mut guard = slot.lock();
        let next = engine::update_goals(&guard, goals, &self.config);
        *guard = next.clone();

        self.metrics.record_goal_update();
        tracing::info!(user = user, goals = next.goals_list.len(), "Updated goals");
        next
    }

    pub fn set_profile(&self, user: &str, profile: Option<ProfileData>) -> EngineState {
        let slot = self.slot(user);
        let mut guard = slot.lock();
        let next = engine::set_profile(&guard, profile);
        *guard = next.clone();
        tracing::info!(user = user, has_profile = next.profile_data.is_some(), "Updated profile");
        next
    }

    fn slot(&self, user: &str) -> Arc<Mutex<EngineState>> {
        if let Some(slot) = self.users.read().get(user) {
            return slot.clone();
        }
        self.users
            .write()
            .entry(user.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(EngineState::new(&self.config))))
            .clone()
    }
}

impl Default for Tracker {
    fn default() -> Self {
        Self::new(get_engine_config().clone())
    }
}
