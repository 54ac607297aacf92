//! # CloudFormation Custom Resource Framework
//!
//! This crate provides the generic lifecycle machinery behind a CloudFormation
//! custom-resource provider. A provider is invoked once per stack operation
//! (Create, Update, Delete), must converge some external state, and then report SUCCESS or
//! FAILED to a pre-signed callback URL.
//!
//! ## Architecture Overview
//!
//! 1. **Validation** ([`validation`]): a declarative, ordered allow-list of properties per
//!    resource type. It checks input contracts and decides when an Update needs replacement.
//! 2. **Lifecycle** ([`CustomResource`], [`handle_lifecycle`]): the contract each resource
//!    type implements, plus the fixed validate/route/replace algorithm.
//! 3. **Dispatch** ([`Dispatcher`]): resolves the resource by type name and polls while it
//!    reports `Pending`, within a per-invocation attempt budget.
//! 4. **Reporting** ([`reporter`]): best-effort PUT of the response to the `ResponseURL`.
//!
//! [`CustomResourceHandler`] ties dispatch and reporting into one call per invocation.
//!
//! ## Example
//!
//! ```rust
//! use async_trait::async_trait;
//! use cfn_framework::validation::{Properties, PropertyRule, ValidationSchema};
//! use cfn_framework::{BoxError, CustomResource, LifecycleOutcome, LifecycleResult};
//!
//! struct Bucket {
//!     schema: ValidationSchema,
//! }
//!
//! #[async_trait]
//! impl CustomResource for Bucket {
//!     fn resource_type(&self) -> &str {
//!         "Custom::Bucket"
//!     }
//!
//!     fn schema(&self) -> &ValidationSchema {
//!         &self.schema
//!     }
//!
//!     async fn create(&self, _: &str, props: &Properties) -> Result<LifecycleOutcome, BoxError> {
//!         let name = props["Name"].as_str().unwrap_or_default();
//!         Ok(LifecycleResult::new(name).into())
//!     }
//!
//!     async fn update(
//!         &self,
//!         _: &str,
//!         physical_id: &str,
//!         _: &Properties,
//!         _: &Properties,
//!     ) -> Result<LifecycleOutcome, BoxError> {
//!         Ok(LifecycleResult::new(physical_id).into())
//!     }
//!
//!     async fn delete(&self, physical_id: &str) -> Result<LifecycleResult, BoxError> {
//!         Ok(LifecycleResult::new(physical_id))
//!     }
//! }
//!
//! let schema = ValidationSchema::builder()
//!     .property("Name", PropertyRule::required().forces_replacement().pattern("^[a-z-]+$"))
//!     .build()
//!     .unwrap();
//! let registry = cfn_framework::ResourceRegistry::new().with(Bucket { schema });
//! assert!(registry.resolve("Custom::Bucket").is_ok());
//! ```
//!
//! ## Testing
//!
//! The [`mock`] module provides a scripted resource and a recording reporter.

pub mod config;
pub mod dispatcher;
pub mod error;
pub mod handler;
pub mod mock;
pub mod registry;
pub mod reporter;
pub mod request;
pub mod resource;
pub mod response;
pub mod tracing;
pub mod validation;

pub use config::HandlerConfig;
pub use dispatcher::{Dispatcher, RetryBudget};
pub use error::{BoxError, FrameworkError, ReportError, SchemaError};
pub use handler::CustomResourceHandler;
pub use registry::ResourceRegistry;
pub use reporter::{HttpReporter, ResponseReporter};
pub use request::{CustomResourceRequest, RequestType};
pub use resource::{handle_lifecycle, CustomResource, LifecycleOutcome, LifecycleResult};
pub use response::{CustomResourceResponse, ResponseStatus};
pub use validation::{Properties, PropertyRule, ValidationError, ValidationSchema};
