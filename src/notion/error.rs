//! # Database Client Errors

use std::path::PathBuf;
use thiserror::Error;

/// Errors produced by [`NotionClient`](super::NotionClient) operations.
#[derive(Error, Debug)]
pub enum NotionError {
    /// The service answered with a non-success status.
    #[error("request failed with status {status}: {body}")]
    Http { status: u16, body: String },

    /// The request never produced a response (DNS, connect, TLS, timeout).
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The response body was not the JSON shape we expected.
    #[error("failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),

    /// Writing the schema snapshot failed.
    #[error("failed to write `{path}`: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A schema update needs the current schema first.
    #[error("cannot update schema without fetching the current schema: {0}")]
    SchemaUnavailable(#[source] Box<NotionError>),

    /// Every requested schema change was skipped.
    #[error("no valid updates found to apply")]
    NoValidUpdates,

    /// The credential or API version cannot be sent as a header value.
    #[error("invalid header value for `{0}`")]
    InvalidHeader(&'static str),
}

impl NotionError {
    /// HTTP status for service-side failures.
    pub fn status(&self) -> Option<u16> {
        match self {
            NotionError::Http { status, .. } => Some(*status),
            NotionError::Transport(e) => e.status().map(|s| s.as_u16()),
            NotionError::SchemaUnavailable(inner) => inner.status(),
            _ => None,
        }
    }

    /// Response body for service-side failures.
    pub fn body(&self) -> Option<&str> {
        match self {
            NotionError::Http { body, .. } => Some(body),
            NotionError::SchemaUnavailable(inner) => inner.body(),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, NotionError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn http_error_should_expose_status_and_body() {
        let err = NotionError::Http {
            status: 404,
            body: "{\"code\":\"object_not_found\"}".to_string(),
        };
        assert_eq!(err.status(), Some(404));
        assert_eq!(err.body(), Some("{\"code\":\"object_not_found\"}"));
        assert!(err.to_string().contains("404"));
    }

    #[test]
    fn schema_unavailable_should_forward_inner_status() {
        let err = NotionError::SchemaUnavailable(Box::new(NotionError::Http {
            status: 401,
            body: "unauthorized".to_string(),
        }));
        assert_eq!(err.status(), Some(401));
        assert_eq!(err.body(), Some("unauthorized"));
    }

    #[test]
    fn no_valid_updates_should_have_no_status() {
        assert_eq!(NotionError::NoValidUpdates.status(), None);
        assert_eq!(NotionError::NoValidUpdates.body(), None);
    }
}
