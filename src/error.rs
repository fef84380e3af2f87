//! Error types for massive-claims
//!
//! Every failure is fatal: the sequencer stops at the first error and the
//! binary exits non-zero. The variants only exist to make the message useful.

use thiserror::Error;

/// Unified error type
#[derive(Error, Debug)]
pub enum Error {
    // =========================================================================
    // Configuration Errors
    // =========================================================================
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Kubeconfig error: {0}")]
    Kubeconfig(String),

    // =========================================================================
    // Kubernetes Errors
    // =========================================================================
    #[error("Kubernetes API error: {0}")]
    Kube(#[from] kube::Error),

    #[error("Resource not found: {kind}/{name}")]
    ResourceNotFound { kind: String, name: String },

    #[error("Resource already exists: {kind}/{name}")]
    ResourceExists { kind: String, name: String },

    // =========================================================================
    // Rendering / IO Errors
    // =========================================================================
    #[error("YAML render error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Whether the failure came back from a cluster call
    /// (create, list or delete) rather than from local setup.
    pub fn is_external(&self) -> bool {
        matches!(
            self,
            Error::Kube(_) | Error::ResourceNotFound { .. } | Error::ResourceExists { .. }
        )
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
