use std::fmt;

/// Failure delivering a notification to one target. Hand-written `Display`
/// rather than `thiserror`, matching the style of a small, self-contained
/// delivery-session error type.
#[derive(Debug)]
pub enum NotifierError {
    Request(reqwest::Error),
    Status(u16),
}

impl fmt::Display for NotifierError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NotifierError::Request(e) => write!(f, "request failed: {e}"),
            NotifierError::Status(code) => write!(f, "non-2xx response: {code}"),
        }
    }
}

impl std::error::Error for NotifierError {}

impl From<reqwest::Error> for NotifierError {
    fn from(e: reqwest::Error) -> Self {
        NotifierError::Request(e)
    }
}
