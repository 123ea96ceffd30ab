//! OpenEMR records backend: OAuth2 token handling and authenticated JSON GETs.
//!
//! Tools depend on the [`RecordsApi`] trait; [`RecordsClient`] is the HTTP
//! implementation.

mod auth;
mod client;

pub use auth::OAuthAuthenticator;
pub use client::{RecordsApi, RecordsClient, RecordsConfig};

/// Errors from the records backend.
#[derive(Debug, thiserror::Error)]
pub enum RecordsError {
    #[error("records request timed out")]
    Timeout,
    #[error("records API returned HTTP {status}: {body}")]
    Http { status: u16, body: String },
    #[error("records transport error: {0}")]
    Transport(String),
    #[error("authentication failed: {0}")]
    Auth(String),
    #[error("OAuth client_id is not configured")]
    MissingClientId,
    #[error("invalid records response: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for RecordsError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            RecordsError::Timeout
        } else if e.is_decode() {
            RecordsError::Decode(e.to_string())
        } else {
            RecordsError::Transport(e.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_error_display() {
        assert!(RecordsError::Timeout.to_string().contains("timed out"));
        let e = RecordsError::Http {
            status: 500,
            body: "oops".into(),
        };
        assert_eq!(e.to_string(), "records API returned HTTP 500: oops");
        assert!(RecordsError::MissingClientId.to_string().contains("client_id"));
    }
}
