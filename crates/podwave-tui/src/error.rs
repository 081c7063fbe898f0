//! Failures a user action can end in. Each one becomes a notice; none of
//! them is retried.

use podwave_proto::error::ApiError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PodwaveError {
    #[error(transparent)]
    Api(#[from] ApiError),

    /// Caught before any network call.
    #[error("{0}")]
    Validation(&'static str),

    /// The import file is not a JSON document.
    #[error("invalid JSON: {0}")]
    ImportParse(String),

    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}

impl PodwaveError {
    pub fn user_message(&self) -> String {
        match self {
            Self::Api(e) => e.user_message(),
            Self::Validation(msg) => (*msg).to_string(),
            Self::ImportParse(_) => "Invalid JSON file".to_string(),
            Self::Io(e) => e.to_string(),
        }
    }
}
