// src/error.rs
// Standardized error types for codecoach

use thiserror::Error;

/// Main error type for the chat session engine
#[derive(Error, Debug)]
pub enum CoachError {
    #[error("no API credential configured")]
    MissingCredential,

    #[error("authentication rejected by provider: {0}")]
    Auth(String),

    #[error("provider error {status}: {body}")]
    Provider { status: u16, body: String },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("provider returned an empty completion")]
    EmptyCompletion,

    #[error("reply is not valid JSON: {0}")]
    MalformedReply(#[from] serde_json::Error),

    #[error("reply has no top-level `output` field")]
    MissingOutput,

    #[error("invalid selector `{0}`")]
    Selector(String),

    #[error("configuration error: {0}")]
    Config(String),
}

/// Convenience type alias for Result using CoachError
pub type Result<T> = std::result::Result<T, CoachError>;

impl CoachError {
    /// True for failures the user can fix by supplying a valid credential
    pub fn is_auth(&self) -> bool {
        matches!(self, CoachError::Auth(_))
    }

    /// True for replies the engine drops silently (no assistant entry,
    /// no error surfaced)
    pub fn is_silent_drop(&self) -> bool {
        matches!(
            self,
            CoachError::EmptyCompletion
                | CoachError::MalformedReply(_)
                | CoachError::MissingOutput
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_classification() {
        assert!(CoachError::Auth("bad key".into()).is_auth());
        assert!(!CoachError::EmptyCompletion.is_auth());
    }

    #[test]
    fn test_silent_drop_classification() {
        assert!(CoachError::EmptyCompletion.is_silent_drop());
        assert!(CoachError::MissingOutput.is_silent_drop());
        assert!(!CoachError::MissingCredential.is_silent_drop());
        assert!(!CoachError::Provider { status: 500, body: "oops".into() }.is_silent_drop());
    }
}
