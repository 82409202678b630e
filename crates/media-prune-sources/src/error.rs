use thiserror::Error;

/// Failures talking to a collaborator. `Connection` and `Auth` abort the run
/// before anything destructive happens; an error from a per-movie delete or
/// exclusion call is reported and the run continues.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("could not connect to {service} at {url}: {source}")]
    Connection {
        service: &'static str,
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{service} authentication failed: {hint}")]
    Auth { service: &'static str, hint: String },

    #[error("{service} request to {endpoint} failed with status {status}: {body}")]
    Api {
        service: &'static str,
        endpoint: String,
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("unexpected {service} response from {endpoint}: {detail}")]
    Parse {
        service: &'static str,
        endpoint: String,
        detail: String,
    },

    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

impl SourceError {
    /// Map an HTTP auth-check status to the guidance the user needs.
    pub fn auth_hint(service: &'static str, status: reqwest::StatusCode) -> Self {
        let hint = match status.as_u16() {
            401 => "401 Unauthorized - check your API key/token".to_string(),
            403 => "403 Forbidden - check your API key permissions".to_string(),
            other => format!("unexpected status {}", other),
        };
        SourceError::Auth { service, hint }
    }
}
