//! # Certificate Manager Contract
//!
//! The subset of the ACM API the certificate resources need, expressed as a trait so the
//! resources never construct SDK clients themselves. A production binary plugs in an
//! SDK-backed [`AcmClientFactory`]; tests and the local driver use [`InMemoryAcm`].

pub mod arn;
pub mod error;
pub mod memory;

pub use arn::region_from_arn;
pub use error::AcmError;
pub use memory::InMemoryAcm;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Lifecycle status of an ACM certificate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CertificateStatus {
    PendingValidation,
    Issued,
    Inactive,
    Expired,
    ValidationTimedOut,
    Revoked,
    Failed,
}

impl CertificateStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CertificateStatus::PendingValidation => "PENDING_VALIDATION",
            CertificateStatus::Issued => "ISSUED",
            CertificateStatus::Inactive => "INACTIVE",
            CertificateStatus::Expired => "EXPIRED",
            CertificateStatus::ValidationTimedOut => "VALIDATION_TIMED_OUT",
            CertificateStatus::Revoked => "REVOKED",
            CertificateStatus::Failed => "FAILED",
        }
    }
}

impl fmt::Display for CertificateStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A certificate tag, in the `{Key, Value}` shape CloudFormation templates use.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Tag {
    pub key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

impl Tag {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: Some(value.into()),
        }
    }
}

/// DNS record proving control of a domain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceRecord {
    pub name: String,
    pub record_type: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomainValidation {
    pub domain_name: String,
    /// Not available until ACM has generated it.
    pub resource_record: Option<ResourceRecord>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CertificateDetail {
    pub arn: String,
    pub domain_name: String,
    pub subject_alternative_names: Vec<String>,
    pub status: CertificateStatus,
    /// `None` while ACM is still preparing validation.
    pub domain_validation_options: Option<Vec<DomainValidation>>,
    pub transparency_logging: Option<String>,
    pub tags: Vec<Tag>,
}

/// Parameters of a certificate request.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CertificateRequest {
    pub domain_name: String,
    pub subject_alternative_names: Vec<String>,
    pub validation_method: String,
    pub certificate_authority_arn: Option<String>,
    pub transparency_logging: Option<String>,
    pub tags: Vec<Tag>,
}

/// Region-bound certificate-manager client.
#[async_trait]
pub trait CertificateManager: Send + Sync {
    /// Returns the ARN of the new certificate.
    async fn request_certificate(&self, request: CertificateRequest) -> Result<String, AcmError>;

    /// `Ok(None)` when the certificate is not (yet) known.
    async fn describe_certificate(&self, arn: &str)
        -> Result<Option<CertificateDetail>, AcmError>;

    async fn update_certificate_options(
        &self,
        arn: &str,
        transparency_logging: &str,
    ) -> Result<(), AcmError>;

    async fn add_tags(&self, arn: &str, tags: &[Tag]) -> Result<(), AcmError>;

    async fn remove_tags(&self, arn: &str, tags: &[Tag]) -> Result<(), AcmError>;

    async fn delete_certificate(&self, arn: &str) -> Result<(), AcmError>;
}

/// Builds clients per region; `None` selects the default region.
pub trait AcmClientFactory: Send + Sync {
    fn client(&self, region: Option<&str>) -> Arc<dyn CertificateManager>;
}
