//! Error types for the certificate resources.

use crate::acm::{AcmError, CertificateStatus};
use thiserror::Error;

/// Errors that can occur while converging a certificate resource.
#[derive(Debug, Error)]
pub enum CertificateError {
    /// The certificate reached a state it will never leave towards `ISSUED`.
    #[error("Invalid status of certificate: {0}")]
    InvalidStatus(CertificateStatus),

    /// The certificate-manager call failed.
    #[error(transparent)]
    Acm(#[from] AcmError),

    /// Validated properties did not have the expected shape.
    #[error("Invalid resource properties: {0}")]
    InvalidProperties(#[from] serde_json::Error),
}
