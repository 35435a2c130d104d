pub mod analytics;
pub mod config;
pub mod error;
pub mod history;
pub mod logging;
pub mod metrics;
pub mod profile;
pub mod skills;
pub mod state;
pub mod streak;
pub mod suggestions;
pub mod topics;

pub use config::{get_engine_config, EngineConfig};
pub use error::TrackerError;
pub use history::{AttemptEvent, AttemptRecord, AttemptResult, Difficulty, SubmissionRecord};
pub use state::{EngineState, Tracker};
