use ordview::{CommitError, ConfigError, ItemId, StoreError};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, HarnessError>;

#[derive(Debug, Error)]
pub enum HarnessError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("store error: {0}")]
    Store(#[from] StoreError),

    #[error("{0}")]
    Commit(#[from] CommitError),

    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    #[error("invalid argument: {message}")]
    InvalidArgument { message: String },

    #[error("dropping {dragged} onto {target} under an active filter needs --yes")]
    ConfirmationRequired { dragged: ItemId, target: ItemId },
}

impl HarnessError {
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::InvalidArgument { .. } => 2,
            Self::ConfirmationRequired { .. } => 3,
            _ => 1,
        }
    }

    #[must_use]
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }
}
