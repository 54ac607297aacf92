//! # Framework Errors
//!
//! This module defines the error types shared by every resource type. Whatever goes wrong
//! during an invocation ends up as a [`FrameworkError`], and its `Display` output is exactly
//! the `Reason` reported back to CloudFormation.

use crate::validation::ValidationError;

/// Boxed error raised by a concrete resource implementation.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Errors that terminate a single custom-resource invocation.
#[derive(Debug, thiserror::Error)]
pub enum FrameworkError {
    /// The request properties violate the resource schema.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// No registered resource answers to the requested type name.
    #[error("Unsupported resource type: {0}")]
    UnknownResourceType(String),

    /// The request type is not one of Create, Update or Delete.
    #[error("Unsupported request type: {0}")]
    UnsupportedOperation(String),

    /// Update and Delete requests must carry the physical id of the existing resource.
    #[error("The {0} request is missing a PhysicalResourceId")]
    MissingPhysicalId(String),

    /// The resource implementation reported a failure.
    #[error("{0}")]
    Lifecycle(#[source] BoxError),

    /// The resource was still pending after the last allowed attempt.
    #[error("Operation on {resource_type} did not complete after {attempts} attempts")]
    RetryBudgetExhausted {
        resource_type: String,
        attempts: u32,
    },
}

impl FrameworkError {
    /// Wraps any resource-level error.
    pub fn lifecycle(error: impl Into<BoxError>) -> Self {
        FrameworkError::Lifecycle(error.into())
    }

    /// True for the timeout classification of the retry loop.
    pub fn is_timeout(&self) -> bool {
        matches!(self, FrameworkError::RetryBudgetExhausted { .. })
    }
}

/// Errors raised while building a [`ValidationSchema`](crate::validation::ValidationSchema).
#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    #[error("Invalid pattern for property {property}: {source}")]
    InvalidPattern {
        property: String,
        #[source]
        source: regex::Error,
    },
    #[error("Property {0} is declared twice")]
    DuplicateProperty(String),
}

/// Errors delivering a response to the callback URL.
///
/// These never reach CloudFormation; the reporter logs and drops them.
#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("Failed to encode response: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("Failed to send response: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("Callback endpoint answered with status {0}")]
    Rejected(u16),
}
