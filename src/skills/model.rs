use serde::{Deserialize, Serialize};
use crate::config::EngineConfig;
use crate::history::{recent_submissions, Difficulty, SubmissionRecord};

/// Easy solves needed in the recent window before Easy deltas are halved.
const FARMING_EASY_COUNT: usize = 4;
const FARMING_DAMPENER: f64 = 0.5;

/// Skill contribution of one accepted attempt.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SkillDelta {
    pub delta: f64,
    pub efficiency: f64,
}

/// Log-scaled speed relative to the expected solve time, capped at `max_efficiency`.
///
/// Times below `min_solve_time` (including negative or non-finite input) are
/// floored, so the ratio never blows up.
pub fn compute_efficiency(
    difficulty: Difficulty,
    time_taken_minutes: f64,
    config: &EngineConfig,
) -> f64 {
    let t = if time_taken_minutes.is_finite() {
        time_taken_minutes.max(config.min_solve_time)
    } else {
        config.min_solve_time
    };
    let expected = config.expected_time.get(difficulty);
    let efficiency = (expected / t + 1.0).ln();
    efficiency.min(config.max_efficiency)
}

/// Skill delta for an accepted attempt given the submission log *before* it.
///
/// Anti-farming: when at least 4 of the last 5 submissions were Easy and this
/// one is Easy too, the delta is halved. With the default Easy base of 0 this
/// changes nothing numerically; it only bites if the Easy base is configured
/// above zero.
pub fn compute_delta(
    difficulty: Difficulty,
    time_taken_minutes: f64,
    recent: &[SubmissionRecord],
    config: &EngineConfig,
) -> SkillDelta {
    let base = config.difficulty_base.get(difficulty);
    let efficiency = compute_efficiency(difficulty, time_taken_minutes, config);
    let mut delta = base * efficiency;

    if difficulty == Difficulty::Easy && is_farming_easy(recent) {
        delta *= FARMING_DAMPENER;
    }

    SkillDelta { delta, efficiency }
}

fn is_farming_easy(recent: &[SubmissionRecord]) -> bool {
    recent_submissions(recent)
        .iter()
        .filter(|s| s.difficulty() == Difficulty::Easy)
        .count()
        >= FARMING_EASY_COUNT
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::{AttemptRecord, AttemptResult};

    fn submission(difficulty: Difficulty) -> SubmissionRecord {
        let attempt = AttemptRecord {
            slug: "p".into(),
            title: "P".into(),
            difficulty,
            topics: vec![],
            time_taken_minutes: 10.0,
            result: AttemptResult::Accepted,
            timestamp: 0,
            efficiency: None,
        };
        SubmissionRecord::new(&attempt, 0.0, 1.0, 100.0)
    }

    #[test]
    fn test_efficiency_medium_twenty_minutes() {
        let config = EngineConfig::default();
        let eff = compute_efficiency(Difficulty::Medium, 20.0, &config);
        assert!((eff - 2.5_f64.ln()).abs() < 1e-12);
    }

    #[test]
    fn test_efficiency_is_capped() {
        let config = EngineConfig::default();
        // 60/1 + 1 = 61, ln(61) > 3.5
        assert_eq!(compute_efficiency(Difficulty::Hard, 0.0, &config), 3.5);
        assert_eq!(compute_efficiency(Difficulty::Hard, f64::NAN, &config), 3.5);
    }

    #[test]
    fn test_unknown_difficulty_uses_fallback() {
        let config = EngineConfig::default();
        let unknown = compute_delta(Difficulty::Unknown, 20.0, &[], &config);
        let medium = compute_efficiency(Difficulty::Medium, 20.0, &config);
        assert_eq!(unknown.efficiency, medium);
        assert_eq!(unknown.delta, 0.0);
    }

    #[test]
    fn test_hard_delta() {
        let config = EngineConfig::default();
        let d = compute_delta(Difficulty::Hard, 60.0, &[], &config);
        assert!((d.delta - 5.0 * 2.0_f64.ln()).abs() < 1e-12);
    }

    #[test]
    fn test_farming_dampener_is_noop_for_default_easy_base() {
        let config = EngineConfig::default();
        let recent: Vec<_> = (0..5).map(|_| submission(Difficulty::Easy)).collect();
        let d = compute_delta(Difficulty::Easy, 5.0, &recent, &config);
        assert_eq!(d.delta, 0.0);
        assert!(d.efficiency > 0.0);
    }

    #[test]
    fn test_farming_dampener_halves_nonzero_easy_base() {
        let mut config = EngineConfig::default();
        config.difficulty_base.easy = 1.0;

        let mut recent = vec![submission(Difficulty::Hard)];
        recent.extend((0..4).map(|_| submission(Difficulty::Easy)));
        let dampened = compute_delta(Difficulty::Easy, 5.0, &recent, &config);
        let plain = compute_delta(Difficulty::Easy, 5.0, &[], &config);
        assert!((dampened.delta - plain.delta * 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_farming_only_looks_at_last_five() {
        let mut config = EngineConfig::default();
        config.difficulty_base.easy = 1.0;

        // Four Easy followed by two Medium: only 3 Easy in the last five.
        let mut recent: Vec<_> = (0..4).map(|_| submission(Difficulty::Easy)).collect();
        recent.push(submission(Difficulty::Medium));
        recent.push(submission(Difficulty::Medium));
        let d = compute_delta(Difficulty::Easy, 5.0, &recent, &config);
        let plain = compute_delta(Difficulty::Easy, 5.0, &[], &config);
        assert_eq!(d.delta, plain.delta);
    }

    #[test]
    fn test_farming_ignores_medium_attempts() {
        let config = EngineConfig::default();
        let recent: Vec<_> = (0..5).map(|_| submission(Difficulty::Easy)).collect();
        let d = compute_delta(Difficulty::Medium, 30.0, &recent, &config);
        assert!((d.delta - 2.0 * 2.0_f64.ln()).abs() < 1e-12);
    }
}
