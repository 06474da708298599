//! Library error type.
//!
//! Most failures never reach a listener: the resolver absorbs transport and
//! payload errors and fails open to an "unrecognized" link. The variants below
//! still carry those failures between layers (transport → resolver) and report
//! caller misuse through [`crate::domain::LinkResult::Failed`].

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LinkLabError {
    #[error("Invalid argument: {message}")]
    InvalidArgument { message: String },

    #[error("Transport error: {message}")]
    Transport { message: String },

    #[error("LinkLab API returned status {status}")]
    Status { status: u16 },

    #[error("LinkLab API returned an empty body")]
    EmptyBody,

    #[error("Failed to decode link payload: {message}")]
    Decode { message: String },

    #[error("Settings store error: {message}")]
    Settings { message: String },

    #[error("Install referrer error: {message}")]
    Referrer { message: String },
}

impl LinkLabError {
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }
    pub fn settings(message: impl Into<String>) -> Self {
        Self::Settings {
            message: message.into(),
        }
    }
    pub fn referrer(message: impl Into<String>) -> Self {
        Self::Referrer {
            message: message.into(),
        }
    }

    /// Short label used for log fields and metric outcomes.
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidArgument { .. } => "invalid_argument",
            Self::Transport { .. } => "transport",
            Self::Status { .. } => "status",
            Self::EmptyBody => "empty_body",
            Self::Decode { .. } => "decode",
            Self::Settings { .. } => "settings",
            Self::Referrer { .. } => "referrer",
        }
    }
}

impl From<reqwest::Error> for LinkLabError {
    fn from(e: reqwest::Error) -> Self {
        match e.status() {
            Some(status) => Self::Status {
                status: status.as_u16(),
            },
            None => Self::transport(e.to_string()),
        }
    }
}

impl From<serde_json::Error> for LinkLabError {
    fn from(e: serde_json::Error) -> Self {
        Self::decode(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, LinkLabError>;
