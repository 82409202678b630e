use thiserror::Error;

pub const PLEX_URL_VAR: &str = "PLEX_URL";
pub const PLEX_TOKEN_VAR: &str = "PLEX_TOKEN";
pub const RADARR_URL_VAR: &str = "RADARR_URL";
pub const RADARR_API_KEY_VAR: &str = "RADARR_API_KEY";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("required environment variable {0} is not set or empty")]
    MissingVar(&'static str),
    #[error("failed to read settings file {path}: {source}")]
    UnreadableSettings {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid settings file {path}: {source}")]
    InvalidSettings {
        path: String,
        #[source]
        source: toml::de::Error,
    },
}

/// Connection settings for both collaborators, loaded from the process
/// environment. All four are required; absence aborts before any network
/// call is made.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub plex_url: String,
    pub plex_token: String,
    pub radarr_url: String,
    pub radarr_api_key: String,
}

impl Credentials {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let require = |var: &'static str| -> Result<String, ConfigError> {
            match lookup(var) {
                Some(value) if !value.trim().is_empty() => Ok(value.trim_end_matches('/').to_string()),
                _ => Err(ConfigError::MissingVar(var)),
            }
        };

        Ok(Self {
            plex_url: require(PLEX_URL_VAR)?,
            plex_token: require(PLEX_TOKEN_VAR)?,
            radarr_url: require(RADARR_URL_VAR)?,
            radarr_api_key: require(RADARR_API_KEY_VAR)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_all_vars_present() {
        let vars = env(&[
            (PLEX_URL_VAR, "https://plex.local:32400/"),
            (PLEX_TOKEN_VAR, "token"),
            (RADARR_URL_VAR, "http://radarr.local:7878"),
            (RADARR_API_KEY_VAR, "key"),
        ]);

        let creds = Credentials::from_lookup(|var| vars.get(var).cloned()).unwrap();
        // Trailing slashes are stripped so URL joins stay clean.
        assert_eq!(creds.plex_url, "https://plex.local:32400");
        assert_eq!(creds.radarr_url, "http://radarr.local:7878");
    }

    #[test]
    fn test_missing_var_is_fatal() {
        let vars = env(&[
            (PLEX_URL_VAR, "https://plex.local:32400"),
            (PLEX_TOKEN_VAR, "token"),
            (RADARR_URL_VAR, "http://radarr.local:7878"),
        ]);

        let err = Credentials::from_lookup(|var| vars.get(var).cloned()).unwrap_err();
        assert!(matches!(err, ConfigError::MissingVar(RADARR_API_KEY_VAR)));
    }

    #[test]
    fn test_empty_var_is_missing() {
        let vars = env(&[
            (PLEX_URL_VAR, "  "),
            (PLEX_TOKEN_VAR, "token"),
            (RADARR_URL_VAR, "http://radarr.local:7878"),
            (RADARR_API_KEY_VAR, "key"),
        ]);

        let err = Credentials::from_lookup(|var| vars.get(var).cloned()).unwrap_err();
        assert!(matches!(err, ConfigError::MissingVar(PLEX_URL_VAR)));
    }
}
