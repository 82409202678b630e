pub mod executor;
pub mod gate;
pub mod matcher;

pub use executor::{execute, RunReport};
pub use gate::Gate;
pub use matcher::{build_decisions, dedupe_watched, MatchPolicy};
