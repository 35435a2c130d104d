use serde::{Serialize, Deserialize};
use crate::history::SubmissionRecord;

/// Smoothing factor for the skill trajectory.
pub const SKILL_EMA_ALPHA: f64 = 0.3;
/// Trailing window for the efficiency rolling average.
pub const EFFICIENCY_WINDOW: usize = 5;

/// Chart-ready series over the submission log, one point per accepted submission.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsPayload {
    pub skill_raw: Vec<f64>,
    pub skill_ema: Vec<f64>,
    pub efficiency_raw: Vec<f64>,
    pub efficiency_rolling: Vec<f64>,
    pub minutes_per_solve: Vec<f64>,
}

pub fn compute_analytics(submissions: &[SubmissionRecord]) -> AnalyticsPayload {
    let skill_raw: Vec<f64> = submissions.iter().map(|s| s.skill_after).collect();
    let efficiency_raw: Vec<f64> = submissions.iter().map(|s| s.efficiency).collect();
    let minutes_per_solve = submissions
        .iter()
        .map(|s| s.attempt.time_taken_minutes)
        .collect();

    AnalyticsPayload {
        skill_ema: exponential_moving_average(&skill_raw, SKILL_EMA_ALPHA),
        efficiency_rolling: rolling_average(&efficiency_raw, EFFICIENCY_WINDOW),
        skill_raw,
        efficiency_raw,
        minutes_per_solve,
    }
}

/// EMA seeded with the first value.
pub fn exponential_moving_average(values: &[f64], alpha: f64) -> Vec<f64> {
    let mut out: Vec<f64> = Vec::with_capacity(values.len());
    for &v in values {
        let next = match out.last() {
            Some(&prev) => alpha * v + (1.0 - alpha) * prev,
            None => v,
        };
        out.push(next);
    }
    out
}

/// Mean of the trailing `window` values at each point (shorter at the start).
pub fn rolling_average(values: &[f64], window: usize) -> Vec<f64> {
    let window = window.max(1);
    (0..values.len())
        .map(|i| {
            let start = (i + 1).saturating_sub(window);
            let slice = &values[start..=i];
            slice.iter().sum::<f64>() / slice.len() as f64
        })
        .collect()
}
