use crate::config::EngineConfig;

pub const MS_PER_DAY: f64 = 86_400_000.0;

/// Linear inactivity decay, proportional to the current skill.
///
/// Nothing happens without a `last_active` timestamp or inside the grace
/// window of `decay_start_days`. The result never goes below zero.
pub fn apply_decay(
    skill: f64,
    last_active: Option<i64>,
    now_ms: i64,
    config: &EngineConfig,
) -> f64 {
    let Some(last_active) = last_active else {
        return skill;
    };

    let elapsed_days = now_ms.saturating_sub(last_active) as f64 / MS_PER_DAY;
    if elapsed_days <= config.decay_start_days {
        return skill;
    }

    let inactive_days = elapsed_days - config.decay_start_days;
    let decay_amount = skill * config.decay_rate * inactive_days;
    (skill - decay_amount).max(0.0)
}
