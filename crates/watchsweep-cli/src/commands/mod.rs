pub mod prompts;
pub mod prune;
