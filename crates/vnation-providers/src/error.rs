//! Provider error types.

use thiserror::Error;

pub type ProviderResult<T> = Result<T, ProviderError>;

pub type OrchestratorResult<T> = Result<T, OrchestratorError>;

#[derive(Debug, Error)]
pub enum ProviderError {
    /// Credential or client missing. Expected in local setups.
    #[error("{0}")]
    Unavailable(String),

    /// The remote call failed or returned malformed data.
    #[error("{provider} API Error: {message}")]
    Remote {
        provider: &'static str,
        message: String,
    },

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ProviderError {
    pub fn unavailable(msg: impl Into<String>) -> Self {
        Self::Unavailable(msg.into())
    }

    pub fn remote(provider: &'static str, msg: impl ToString) -> Self {
        Self::Remote {
            provider,
            message: msg.to_string(),
        }
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Whether this error only reflects missing configuration.
    pub fn is_unavailable(&self) -> bool {
        matches!(self, ProviderError::Unavailable(_))
    }
}

#[derive(Debug, Error)]
pub enum OrchestratorError {
    #[error("Refine failed: {0}")]
    RefineFailed(String),
}
