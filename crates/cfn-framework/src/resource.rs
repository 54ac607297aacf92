//! # CustomResource Trait
//!
//! The `CustomResource` trait is the contract every resource type (certificate, DNS
//! record, issuance blocker, …) implements to be driven by the [`Dispatcher`]. A resource
//! supplies a type name, a [`ValidationSchema`] and three operations; the fixed
//! validate/route/replace algorithm lives in [`handle_lifecycle`] and is written *once*.
//!
//! # Three-way outcome
//! Create and Update return `Result<LifecycleOutcome, BoxError>`:
//! - `Ok(Ready(result))` the operation is done.
//! - `Ok(Pending)` nothing failed, but the external state has not settled yet.
//! - `Err(e)` the operation failed and must not be retried.
//!
//! Delete always settles in one call.
//!
//! [`Dispatcher`]: crate::dispatcher::Dispatcher

use crate::error::{BoxError, FrameworkError};
use crate::request::{CustomResourceRequest, RequestType};
use crate::validation::{Properties, ValidationSchema};
use async_trait::async_trait;
use tracing::{debug, info};

/// The settled state of a resource.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LifecycleResult {
    /// Becomes the `PhysicalResourceId` of the response.
    pub physical_id: String,
    /// Attributes readable with `Fn::GetAtt`.
    pub data: Properties,
}

impl LifecycleResult {
    pub fn new(physical_id: impl Into<String>) -> Self {
        Self {
            physical_id: physical_id.into(),
            data: Properties::new(),
        }
    }

    pub fn with_data(mut self, data: Properties) -> Self {
        self.data = data;
        self
    }
}

/// Outcome of a lifecycle operation that did not fail.
#[derive(Debug, Clone, PartialEq)]
pub enum LifecycleOutcome {
    Ready(LifecycleResult),
    Pending,
}

impl From<LifecycleResult> for LifecycleOutcome {
    fn from(result: LifecycleResult) -> Self {
        LifecycleOutcome::Ready(result)
    }
}

/// Contract implemented by every custom resource type.
///
/// Operations receive properties that already passed the schema, so implementations may
/// rely on required properties being present.
#[async_trait]
pub trait CustomResource: Send + Sync {
    /// The `ResourceType` this implementation answers to, e.g. `Custom::Certificate`.
    fn resource_type(&self) -> &str;

    fn schema(&self) -> &ValidationSchema;

    async fn create(
        &self,
        logical_id: &str,
        properties: &Properties,
    ) -> Result<LifecycleOutcome, BoxError>;

    async fn update(
        &self,
        logical_id: &str,
        physical_id: &str,
        properties: &Properties,
        old_properties: &Properties,
    ) -> Result<LifecycleOutcome, BoxError>;

    async fn delete(&self, physical_id: &str) -> Result<LifecycleResult, BoxError>;
}

/// Runs one attempt of the request against `resource`.
///
/// Validation errors are returned before any operation runs. An Update whose replacing
/// properties changed is executed as a Create; CloudFormation deletes the old physical
/// resource in a later request.
pub async fn handle_lifecycle(
    resource: &dyn CustomResource,
    request: &CustomResourceRequest,
) -> Result<LifecycleOutcome, FrameworkError> {
    let schema = resource.schema();
    let properties = schema.validate(&request.resource_properties)?;
    debug!(?properties, "Validated properties");

    let outcome = match &request.request_type {
        RequestType::Create => resource.create(&request.logical_resource_id, &properties).await,
        RequestType::Delete => {
            let physical_id = physical_id(request)?;
            resource.delete(physical_id).await.map(LifecycleOutcome::from)
        }
        RequestType::Update => {
            let physical_id = physical_id(request)?;
            let old_properties = request
                .old_resource_properties
                .as_ref()
                .map(|old| schema.normalize(old))
                .unwrap_or_default();

            let changed: Vec<_> = schema.replacing_changes(&properties, &old_properties).collect();
            if changed.is_empty() {
                resource
                    .update(
                        &request.logical_resource_id,
                        physical_id,
                        &properties,
                        &old_properties,
                    )
                    .await
            } else {
                info!(?changed, %physical_id, "Replacing resource");
                resource.create(&request.logical_resource_id, &properties).await
            }
        }
        RequestType::Unsupported(other) => {
            return Err(FrameworkError::UnsupportedOperation(other.clone()));
        }
    };

    outcome.map_err(FrameworkError::Lifecycle)
}

fn physical_id(request: &CustomResourceRequest) -> Result<&str, FrameworkError> {
    request
        .physical_resource_id
        .as_deref()
        .ok_or_else(|| FrameworkError::MissingPhysicalId(request.request_type.to_string()))
}
