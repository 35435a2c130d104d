use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use lazy_static::lazy_static;
use crate::error::TrackerError;
use crate::history::Difficulty;

/// Environment variable pointing at an optional TOML config file.
pub const CONFIG_ENV_VAR: &str = "PRACTICE_TRACKER_CONFIG";

/// Per-difficulty constants. `fallback` is what an `Unknown` difficulty reads.
/// A table given in a config file must list all four keys.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DifficultyTable {
    pub easy: f64,
    pub medium: f64,
    pub hard: f64,
    pub fallback: f64,
}

impl DifficultyTable {
    pub const fn new(easy: f64, medium: f64, hard: f64, fallback: f64) -> Self {
        DifficultyTable { easy, medium, hard, fallback }
    }

    pub fn get(&self, difficulty: Difficulty) -> f64 {
        match difficulty {
            Difficulty::Easy => self.easy,
            Difficulty::Medium => self.medium,
            Difficulty::Hard => self.hard,
            Difficulty::Unknown => self.fallback,
        }
    }
}

/// Every tunable constant of the scoring pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub initial_skill: f64,
    /// Skill gained per unit of efficiency.
    pub difficulty_base: DifficultyTable,
    /// Expected solve time in minutes.
    pub expected_time: DifficultyTable,
    pub min_solve_time: f64,
    pub max_efficiency: f64,
    pub decay_start_days: f64,
    pub decay_rate: f64,
    pub weak_topic_threshold: f64,
    pub strong_topic_threshold: f64,
    /// Target share of solved problems per difficulty (profile ratio score).
    pub ideal_ratio: DifficultyTable,
    pub contest_max: f64,
    pub streak_max_days: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            initial_skill: 100.0,
            difficulty_base: DifficultyTable::new(0.0, 2.0, 5.0, 0.0),
            expected_time: DifficultyTable::new(15.0, 30.0, 60.0, 30.0),
            min_solve_time: 1.0,
            max_efficiency: 3.5,
            decay_start_days: 2.0,
            decay_rate: 0.02,
            weak_topic_threshold: 0.4,
            strong_topic_threshold: 0.7,
            ideal_ratio: DifficultyTable::new(0.2, 0.5, 0.3, 0.0),
            contest_max: 3000.0,
            streak_max_days: 30.0,
        }
    }
}

impl EngineConfig {
    /// Parse a (possibly partial) TOML document; missing keys keep their defaults.
    pub fn from_toml_str(content: &str) -> Result<Self, TrackerError> {
        let config: EngineConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, TrackerError> {
        let content = fs::read_to_string(path)
            .map_err(|e| TrackerError::io(format!("Failed to read config {:?}", path), e))?;
        Self::from_toml_str(&content)
    }

    pub fn validate(&self) -> Result<(), TrackerError> {
        let non_negative = [
            ("initial_skill", self.initial_skill),
            ("decay_start_days", self.decay_start_days),
            ("decay_rate", self.decay_rate),
            ("difficulty_base.easy", self.difficulty_base.easy),
            ("difficulty_base.medium", self.difficulty_base.medium),
            ("difficulty_base.hard", self.difficulty_base.hard),
            ("difficulty_base.fallback", self.difficulty_base.fallback),
        ];
        for (name, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(TrackerError::InvalidConfig(format!(
                    "{} must be a non-negative number, got {}",
                    name, value
                )));
            }
        }

        let positive = [
            ("min_solve_time", self.min_solve_time),
            ("max_efficiency", self.max_efficiency),
            ("expected_time.easy", self.expected_time.easy),
            ("expected_time.medium", self.expected_time.medium),
            ("expected_time.hard", self.expected_time.hard),
            ("expected_time.fallback", self.expected_time.fallback),
            ("contest_max", self.contest_max),
            ("streak_max_days", self.streak_max_days),
        ];
        for (name, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(TrackerError::InvalidConfig(format!(
                    "{} must be positive, got {}",
                    name, value
                )));
            }
        }

        if !(0.0..=1.0).contains(&self.weak_topic_threshold)
            || !(0.0..=1.0).contains(&self.strong_topic_threshold)
            || self.weak_topic_threshold > self.strong_topic_threshold
        {
            return Err(TrackerError::InvalidConfig(format!(
                "topic thresholds must satisfy 0 <= weak ({}) <= strong ({}) <= 1",
                self.weak_topic_threshold, self.strong_topic_threshold
            )));
        }

        Ok(())
    }
}

fn get_config_path() -> Option<PathBuf> {
    std::env::var_os(CONFIG_ENV_VAR).map(PathBuf::from)
}

fn load_engine_config_internal() -> EngineConfig {
    let Some(config_path) = get_config_path() else {
        tracing::debug!("Using default engine configuration");
        return EngineConfig::default();
    };

    match EngineConfig::load(&config_path) {
        Ok(config) => {
            tracing::info!(path = ?config_path, "Loaded engine config");
            config
        }
        Err(e) => {
            tracing::warn!(
                path = ?config_path,
                error = %e,
                "Failed to load engine config, using defaults"
            );
            EngineConfig::default()
        }
    }
}

lazy_static! {
    static ref ENGINE_CONFIG: EngineConfig = load_engine_config_internal();
}

/// Get the cached engine configuration (loaded once per process)
pub fn get_engine_config() -> &'static EngineConfig {
    &ENGINE_CONFIG
}
