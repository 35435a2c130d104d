pub mod app;
pub mod engine;

pub use app::Tracker;
pub use engine::{process_attempt, refresh_derived, set_profile, update_goals, EngineState};
