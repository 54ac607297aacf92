//! Error types for certificate-manager calls.

use thiserror::Error;

/// Errors returned by a [`CertificateManager`](super::CertificateManager).
#[derive(Debug, Clone, Error, PartialEq)]
pub enum AcmError {
    /// The certificate does not exist in the addressed region.
    #[error("ResourceNotFoundException: Could not find certificate {0}")]
    NotFound(String),

    /// The service rejected the call.
    #[error("{code}: {message}")]
    Api { code: String, message: String },
}

impl AcmError {
    pub fn api(code: impl Into<String>, message: impl Into<String>) -> Self {
        AcmError::Api {
            code: code.into(),
            message: message.into(),
        }
    }
}
