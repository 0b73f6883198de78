//! ============================================================================
//! Error Types for the CiviTrack Client
//! ============================================================================
//! Every failure a view can see collapses into one of these variants, and
//! the Display string is the message the view renders inline. Validation
//! failures are raised before any network call is made.
//! ============================================================================

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    /// Network/transport failure before an HTTP status was obtained.
    #[error("Network error: {0}")]
    Transport(String),

    /// Non-success HTTP status; the message is whatever the backend put in
    /// its error body (`detail`, then `message`, then the raw text).
    #[error("{message}")]
    Api { status: u16, message: String },

    /// Client-side validation failure. Never reaches the network.
    #[error("{0}")]
    Validation(String),

    /// Session storage failure that could not be degraded away.
    #[error("Session storage error: {0}")]
    Storage(String),

    /// A response body that matches none of the accepted shapes.
    #[error("Unrecognized response shape: {0}")]
    Shape(String),
}

impl ClientError {
    pub fn validation(msg: impl Into<String>) -> Self {
        ClientError::Validation(msg.into())
    }

    /// True when the error never left the client.
    pub fn is_local(&self) -> bool {
        matches!(self, ClientError::Validation(_) | ClientError::Storage(_))
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(e: reqwest::Error) -> Self {
        ClientError::Transport(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ClientError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_is_the_inline_message() {
        let e = ClientError::Api {
            status: 403,
            message: "Forbidden".to_string(),
        };
        assert_eq!(e.to_string(), "Forbidden");

        let e = ClientError::validation("Please enter a description.");
        assert_eq!(e.to_string(), "Please enter a description.");
        assert!(e.is_local());
    }
}
