pub mod config;
pub mod credentials;
pub mod paths;

pub use config::Settings;
pub use credentials::{ConfigError, Credentials};
pub use paths::PathManager;
