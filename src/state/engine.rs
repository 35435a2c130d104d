use chrono::Utc;
use serde::{Deserialize, Serialize};
use crate::analytics::{compute_analytics, AnalyticsPayload};
use crate::config::{get_engine_config, EngineConfig};
use crate::history::{AttemptEvent, AttemptRecord, SubmissionRecord};
use crate::profile::{ProfileData, ProfileSummary};
use crate::skills::{apply_decay, compute_delta};
use crate::streak::{compute_streak_on, utc_date};
use crate::suggestions::{generate_suggestions, Suggestion};
use crate::topics::{compute_topic_stats, TopicStats};

fn default_skill() -> f64 {
    get_engine_config().initial_skill
}

/// Everything derived from one user's history.
/// Transitions below take a snapshot and return a new value; they never
/// mutate their input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EngineState {
    #[serde(default = "default_skill")]
    pub skill_score: f64,
    #[serde(default)]
    pub attempt_history: Vec<AttemptRecord>,
    #[serde(default)]
    pub submission_history: Vec<SubmissionRecord>,
    #[serde(default)]
    pub topic_stats: TopicStats,
    #[serde(default)]
    pub goals_list: Vec<String>,
    #[serde(default)]
    pub suggestions: Vec<Suggestion>,
    #[serde(default)]
    pub last_active: Option<i64>,
    #[serde(default)]
    pub streak: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_data: Option<ProfileData>,
}

impl EngineState {
    pub fn new(config: &EngineConfig) -> Self {
        EngineState {
            skill_score: config.initial_skill,
            attempt_history: Vec::new(),
            submission_history: Vec::new(),
            topic_stats: TopicStats::new(),
            goals_list: Vec::new(),
            suggestions: Vec::new(),
            last_active: None,
            streak: 0,
            profile_data: None,
        }
    }

    pub fn analytics(&self) -> AnalyticsPayload {
        compute_analytics(&self.submission_history)
    }

    pub fn profile_summary(&self, config: &EngineConfig) -> Option<ProfileSummary> {
        self.profile_data
            .as_ref()
            .map(|profile| ProfileSummary::build(profile, self.streak, config))
    }
}

impl Default for EngineState {
    fn default() -> Self {
        EngineState::new(get_engine_config())
    }
}

/// Fold one attempt event into the state.
///
/// Decay is applied first, from `last_active`. Accepted attempts add a skill
/// delta, get a submission record, and move `last_active` to `now_ms`; other
/// results only extend the attempt log. Accepted attempts that arrive without
/// an efficiency carry the computed one on their attempt record.
pub fn process_attempt(
    state: &EngineState,
    event: &AttemptEvent,
    now_ms: i64,
    config: &EngineConfig,
) -> EngineState {
    let mut next = state.clone();

    let decayed = apply_decay(state.skill_score, state.last_active, now_ms, config);
    if decayed < state.skill_score {
        tracing::debug!(
            before = state.skill_score,
            after = decayed,
            last_active = ?state.last_active,
            "Applied inactivity decay"
        );
    }
    next.skill_score = decayed;

    let mut attempt = AttemptRecord::from_event(event, now_ms);

    if attempt.is_accepted() {
        let skill_delta = compute_delta(
            attempt.difficulty,
            attempt.time_taken_minutes,
            &state.submission_history,
            config,
        );
        if attempt.efficiency.is_none() {
            attempt.efficiency = Some(skill_delta.efficiency);
        }
        next.skill_score += skill_delta.delta;

        let submission = SubmissionRecord::new(
            &attempt,
            skill_delta.delta,
            skill_delta.efficiency,
            next.skill_score,
        );
        tracing::info!(
            slug = %attempt.slug,
            difficulty = %attempt.difficulty,
            delta = skill_delta.delta,
            efficiency = skill_delta.efficiency,
            skill = next.skill_score,
            "Recorded accepted attempt"
        );

        next.attempt_history.push(attempt);
        next.submission_history.push(submission);
        next.last_active = Some(now_ms);
    } else {
        tracing::debug!(slug = %attempt.slug, result = ?attempt.result, "Recorded attempt");
        next.attempt_history.push(attempt);
    }

    refresh_derived(next, now_ms, config)
}

/// Recompute topic stats, streak and suggestions from the histories.
pub fn refresh_derived(mut state: EngineState, now_ms: i64, config: &EngineConfig) -> EngineState {
    state.topic_stats =
        compute_topic_stats(&state.attempt_history, &state.submission_history, config);

    let today = utc_date(now_ms).unwrap_or_else(|| Utc::now().date_naive());
    state.streak = compute_streak_on(&state.submission_history, today);

    state.suggestions = generate_suggestions(
        &state.goals_list,
        &state.topic_stats,
        &state.submission_history,
        state.profile_data.as_ref(),
    );

    tracing::debug!(
        topics = state.topic_stats.len(),
        streak = state.streak,
        suggestions = state.suggestions.len(),
        "Recomputed derived state"
    );
    state
}

/// Replace the goal list and regenerate suggestions from recomputed topic stats.
pub fn update_goals(state: &EngineState, goals: Vec<String>, config: &EngineConfig) -> EngineState {
    let mut next = state.clone();
    next.goals_list = goals;
    next.topic_stats = compute_topic_stats(&next.attempt_history, &next.submission_history, config);
    next.suggestions = generate_suggestions(
        &next.goals_list,
        &next.topic_stats,
        &next.submission_history,
        next.profile_data.as_ref(),
    );
    next
}

/// Attach (or clear) profile data; suggestions are regenerated since the
/// empty-candidate fallback depends on it.
pub fn set_profile(state: &EngineState, profile: Option<ProfileData>) -> EngineState {
    let mut next = state.clone();
    next.profile_data = profile;
    next.suggestions = generate_suggestions(
        &next.goals_list,
        &next.topic_stats,
        &next.submission_history,
        next.profile_data.as_ref(),
    );
    next
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::{AttemptResult, Difficulty};
    use crate::topics::Classification;

    const NOW: i64 = 1_710_072_000_000; // 2024-03-10T12:00:00Z
    const DAY: i64 = 86_400_000;

    fn event(
        topics: &[&str],
        difficulty: Difficulty,
        minutes: f64,
        result: AttemptResult,
    ) -> AttemptEvent {
        AttemptEvent {
            slug: "two-sum".into(),
            title: "Two Sum".into(),
            difficulty,
            topics: topics.iter().map(|t| t.to_string()).collect(),
            time_taken: minutes,
            result,
            timestamp: Some(NOW),
            efficiency: None,
        }
    }

    #[test]
    fn test_single_accepted_medium() {
        let config = EngineConfig::default();
        let state = EngineState::new(&config);
        let next = process_attempt(
            &state,
            &event(&["Array"], Difficulty::Medium, 20.0, AttemptResult::Accepted),
            NOW,
            &config,
        );

        let expected_eff = 2.5_f64.ln();
        assert!((next.skill_score - (100.0 + 2.0 * expected_eff)).abs() < 1e-9);
        assert_eq!(next.attempt_history.len(), 1);
        assert_eq!(next.submission_history.len(), 1);
        assert_eq!(next.attempt_history[0].efficiency, Some(expected_eff));
        assert_eq!(next.last_active, Some(NOW));
        assert_eq!(next.streak, 1);

        let array = next.topic_stats.get("Array").unwrap();
        assert_eq!(array.classification, Classification::Weak);
        assert!(array.strength_score < 0.4);

        // Input snapshot untouched
        assert!(state.attempt_history.is_empty());
        assert_eq!(state.skill_score, 100.0);
    }

    #[test]
    fn test_failed_attempt_only_logs() {
        let config = EngineConfig::default();
        let state = EngineState::new(&config);
        let next = process_attempt(
            &state,
            &event(&["Graph"], Difficulty::Hard, 40.0, AttemptResult::Failed),
            NOW,
            &config,
        );
        assert_eq!(next.skill_score, 100.0);
        assert_eq!(next.attempt_history.len(), 1);
        assert!(next.submission_history.is_empty());
        assert_eq!(next.last_active, None);
        assert_eq!(next.topic_stats.get("Graph").unwrap().attempts, 1);
        assert_eq!(next.suggestions[0].title, "Practice: Graph");
    }

    #[test]
    fn test_decay_before_delta() {
        let config = EngineConfig::default();
        let mut state = EngineState::new(&config);
        state.last_active = Some(NOW - 7 * DAY);

        let next = process_attempt(
            &state,
            &event(&["Array"], Difficulty::Easy, 10.0, AttemptResult::Accepted),
            NOW,
            &config,
        );
        // 5 inactive days at 2%: 100 -> 90, Easy adds nothing
        assert!((next.skill_score - 90.0).abs() < 1e-9);
    }

    #[test]
    fn test_event_efficiency_is_kept() {
        let config = EngineConfig::default();
        let mut ev = event(&["Array"], Difficulty::Medium, 20.0, AttemptResult::Accepted);
        ev.efficiency = Some(1.25);
        let next = process_attempt(&EngineState::new(&config), &ev, NOW, &config);
        assert_eq!(next.attempt_history[0].efficiency, Some(1.25));
        assert!((next.submission_history[0].efficiency - 2.5_f64.ln()).abs() < 1e-12);
    }

    #[test]
    fn test_update_goals_regenerates() {
        let config = EngineConfig::default();
        let state = EngineState::new(&config);
        let next = update_goals(&state, vec!["Trie".into()], &config);
        assert_eq!(next.goals_list, vec!["Trie".to_string()]);
        assert_eq!(next.suggestions.len(), 1);
        assert!(state.goals_list.is_empty());
    }

    #[test]
    fn test_set_profile_enables_fallback() {
        let config = EngineConfig::default();
        let state = EngineState::new(&config);
        let next = set_profile(&state, Some(ProfileData::default()));
        assert_eq!(next.suggestions[0].title, "Practice: Array");
        assert!(next.profile_summary(&config).is_some());
    }

    #[test]
    fn test_analytics_follow_submissions() {
        let config = EngineConfig::default();
        let mut state = EngineState::new(&config);
        for minutes in [30.0, 15.0] {
            let ev = event(&["Array"], Difficulty::Medium, minutes, AttemptResult::Accepted);
            state = process_attempt(&state, &ev, NOW, &config);
        }
        let payload = state.analytics();
        assert_eq!(payload.minutes_per_solve, vec![30.0, 15.0]);
        assert_eq!(payload.skill_raw.len(), 2);
        assert_eq!(payload.skill_ema[0], payload.skill_raw[0]);
        assert!(payload.skill_ema[1] < payload.skill_raw[1]);
    }

    #[test]
    fn test_state_json_shape() {
        let config = EngineConfig::default();
        let state = process_attempt(
            &EngineState::new(&config),
            &event(&["Array"], Difficulty::Medium, 20.0, AttemptResult::Accepted),
            NOW,
            &config,
        );
        let json = serde_json::to_value(&state).unwrap();
        assert!(json["skillScore"].is_number());
        assert!(json["topicStats"]["Array"]["strengthScore"].is_number());
        assert_eq!(json["submissionHistory"][0]["result"], "Accepted");

        let back: EngineState = serde_json::from_value(json).unwrap();
        assert_eq!(back.attempt_history.len(), 1);
        assert_eq!(back.submission_history[0].attempt.slug, "two-sum");
        assert_eq!(back.suggestions, state.suggestions);
        assert!((back.skill_score - state.skill_score).abs() < 1e-9);
    }
}
