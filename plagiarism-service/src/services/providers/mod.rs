//! Completion provider abstractions and implementations.
//!
//! The checker only needs "send a system instruction and a user message, get
//! text back"; providers hide the wire format of a particular vendor.

pub mod mock;
pub mod openai;

use async_trait::async_trait;
use service_core::retry::Retryable;
use thiserror::Error;

/// Error code the upstream uses when the account has run out of credit.
pub const INSUFFICIENT_QUOTA_CODE: &str = "insufficient_quota";

/// Error type for provider operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProviderError {
    #[error("Provider not configured: {0}")]
    NotConfigured(String),

    #[error("Quota exhausted")]
    QuotaExhausted,

    #[error("Rate limited")]
    RateLimited,

    #[error("API error {status}: {message}")]
    ApiError {
        status: u16,
        code: Option<String>,
        message: String,
    },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Network error: {0}")]
    NetworkError(String),
}

impl Retryable for ProviderError {
    fn is_retryable(&self) -> bool {
        match self {
            ProviderError::NetworkError(_) | ProviderError::RateLimited => true,
            ProviderError::ApiError { status, .. } => *status >= 500,
            ProviderError::NotConfigured(_)
            | ProviderError::QuotaExhausted
            | ProviderError::InvalidResponse(_) => false,
        }
    }
}

/// One completion call: a system instruction, the user message, and an
/// output budget.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionRequest {
    pub system: String,
    pub user: String,
    pub max_tokens: u32,
}

/// Trait for text completion providers (e.g., OpenAI chat completions).
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Return the model's reply text.
    async fn complete(&self, request: &CompletionRequest) -> Result<String, ProviderError>;

    /// Model identifier, for logging.
    fn model(&self) -> &str;
}
