pub mod decay;
pub mod model;

pub use decay::apply_decay;
pub use model::{compute_delta, compute_efficiency, SkillDelta};
