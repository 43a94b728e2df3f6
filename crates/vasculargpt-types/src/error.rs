use thiserror::Error;

use crate::llm::LlmError;

/// Errors from binding to or querying the remote vector index, including
/// embedding the query text.
#[derive(Debug, Error)]
pub enum RetrievalError {
    #[error("vector index service unreachable: {0}")]
    Connection(String),

    #[error("vector index '{0}' does not exist")]
    IndexNotFound(String),

    #[error("authentication failed for {service}")]
    AuthenticationFailed { service: String },

    #[error("embedding error: {0}")]
    Embedding(String),

    #[error("query error: {0}")]
    Query(String),

    #[error("deserialization error: {0}")]
    Deserialization(String),
}

impl RetrievalError {
    /// Whether this failure stems from missing credentials or a missing
    /// index rather than a transient service fault.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            RetrievalError::IndexNotFound(_) | RetrievalError::AuthenticationFailed { .. }
        )
    }
}

/// Errors from one answering-pipeline invocation.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("retrieval failed: {0}")]
    Retrieval(#[from] RetrievalError),

    #[error("chat completion failed: {0}")]
    Llm(#[from] LlmError),
}

impl PipelineError {
    /// Whether the failure is a configuration problem (credentials, index).
    pub fn is_configuration(&self) -> bool {
        match self {
            PipelineError::Retrieval(e) => e.is_configuration(),
            PipelineError::Llm(LlmError::AuthenticationFailed) => true,
            PipelineError::Llm(_) => false,
        }
    }
}

/// Errors loading configuration at startup.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {message}")]
    Read { path: String, message: String },

    #[error("failed to parse {path}: {message}")]
    Parse { path: String, message: String },
}
