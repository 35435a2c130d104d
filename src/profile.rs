use serde::{Deserialize, Serialize};
use crate::config::{DifficultyTable, EngineConfig};

/// Public profile snapshot supplied by whoever fetches it from the platform.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileData {
    pub username: String,
    #[serde(default)]
    pub ranking: Option<u64>,
    #[serde(default)]
    pub avatar_url: Option<String>,
    #[serde(default)]
    pub solved: SolvedCounts,
    #[serde(default)]
    pub contest_rating: Option<f64>,
    #[serde(default)]
    pub contests_attended: Option<u32>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolvedCounts {
    pub all: u32,
    pub easy: u32,
    pub medium: u32,
    pub hard: u32,
}

/// Headline numbers for a profile card, each on a 0–10 scale.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileSummary {
    pub total_solved: u32,
    pub ratio_score: f64,
    pub contest_score: f64,
    pub streak_score: f64,
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// How close the Easy/Medium/Hard mix is to the ideal split: 10 for an exact
/// match, 0 for a completely disjoint one (half the L1 distance).
pub fn ratio_score(easy: u32, medium: u32, hard: u32, ideal: &DifficultyTable) -> f64 {
    let total = (easy + medium + hard) as f64;
    if total == 0.0 {
        return 0.0;
    }
    let l1 = (easy as f64 / total - ideal.easy).abs()
        + (medium as f64 / total - ideal.medium).abs()
        + (hard as f64 / total - ideal.hard).abs();
    let similarity = 1.0 - l1 / 2.0;
    round2(similarity * 10.0).max(0.0)
}

pub fn contest_score(rating: f64, contest_max: f64) -> f64 {
    scaled_to_ten(rating, contest_max)
}

pub fn streak_score(streak: u32, streak_max_days: f64) -> f64 {
    scaled_to_ten(streak as f64, streak_max_days)
}

fn scaled_to_ten(value: f64, max: f64) -> f64 {
    let scaled = value / max * 10.0;
    if !scaled.is_finite() || scaled < 0.0 {
        return 0.0;
    }
    round2(scaled.min(10.0))
}

impl ProfileSummary {
    pub fn build(profile: &ProfileData, streak: u32, config: &EngineConfig) -> Self {
        let solved = profile.solved;
        ProfileSummary {
            total_solved: solved.all,
            ratio_score: ratio_score(solved.easy, solved.medium, solved.hard, &config.ideal_ratio),
            contest_score: contest_score(profile.contest_rating.unwrap_or(0.0), config.contest_max),
            streak_score: streak_score(streak, config.streak_max_days),
        }
    }
}
