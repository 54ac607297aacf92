//! # Test Doubles
//!
//! In-memory stand-ins for the two seams of the framework, so dispatch and reporting can be
//! tested without a cloud account or a callback endpoint.
//!
//! | Double | Replaces | Typical use |
//! |---|---|---|
//! | [`ScriptedResource`] | a concrete [`CustomResource`] | drive the retry loop with a fixed script |
//! | [`RecordingReporter`] | [`HttpReporter`](crate::reporter::HttpReporter) | assert on the delivered response |
//!
//! ```rust
//! use cfn_framework::mock::{ScriptedResource, Step};
//! use cfn_framework::validation::ValidationSchema;
//!
//! let schema = ValidationSchema::builder().build().unwrap();
//! let resource = ScriptedResource::new("Custom::Thing", schema)
//!     .script([Step::Pending, Step::Pending, Step::ready("thing-1")]);
//! let calls = resource.calls();
//! assert!(calls.is_empty());
//! # let _ = resource;
//! ```

use crate::error::{BoxError, ReportError};
use crate::reporter::ResponseReporter;
use crate::resource::{CustomResource, LifecycleOutcome, LifecycleResult};
use crate::response::CustomResourceResponse;
use crate::validation::{Properties, ValidationSchema};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// One scripted answer of a [`ScriptedResource`].
#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    Ready(LifecycleResult),
    Pending,
    Fail(String),
}

impl Step {
    pub fn ready(physical_id: impl Into<String>) -> Self {
        Step::Ready(LifecycleResult::new(physical_id))
    }

    pub fn fail(message: impl Into<String>) -> Self {
        Step::Fail(message.into())
    }
}

/// A lifecycle operation as observed by a [`ScriptedResource`].
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Create {
        logical_id: String,
        properties: Properties,
    },
    Update {
        logical_id: String,
        physical_id: String,
        properties: Properties,
        old_properties: Properties,
    },
    Delete {
        physical_id: String,
    },
}

#[derive(Debug, thiserror::Error)]
#[error("{0}")]
struct ScriptedFailure(String);

/// Resource whose create and update answers follow a queue of [`Step`]s.
///
/// Once the script runs dry every further call answers with `fallback` (Pending unless
/// changed). Delete always succeeds with the given physical id.
#[derive(Clone)]
pub struct ScriptedResource {
    resource_type: String,
    schema: ValidationSchema,
    script: Arc<Mutex<VecDeque<Step>>>,
    fallback: Step,
    calls: Arc<Mutex<Vec<Call>>>,
}

impl ScriptedResource {
    pub fn new(resource_type: impl Into<String>, schema: ValidationSchema) -> Self {
        Self {
            resource_type: resource_type.into(),
            schema,
            script: Arc::new(Mutex::new(VecDeque::new())),
            fallback: Step::Pending,
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn script(self, steps: impl IntoIterator<Item = Step>) -> Self {
        self.script.lock().unwrap().extend(steps);
        self
    }

    /// Answers `pending` times with Pending, then with `then`.
    pub fn pending_then(self, pending: usize, then: Step) -> Self {
        let steps = std::iter::repeat(Step::Pending)
            .take(pending)
            .chain(std::iter::once(then));
        self.script(steps)
    }

    pub fn fallback(mut self, step: Step) -> Self {
        self.fallback = step;
        self
    }

    /// Shared view of the recorded calls; stays valid after the resource moves into a registry.
    pub fn calls(&self) -> CallLog {
        CallLog(self.calls.clone())
    }

    fn next_step(&self, call: Call) -> Result<LifecycleOutcome, BoxError> {
        self.calls.lock().unwrap().push(call);
        let step = self
            .script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| self.fallback.clone());
        match step {
            Step::Ready(result) => Ok(LifecycleOutcome::Ready(result)),
            Step::Pending => Ok(LifecycleOutcome::Pending),
            Step::Fail(message) => Err(Box::new(ScriptedFailure(message))),
        }
    }
}

#[async_trait]
impl CustomResource for ScriptedResource {
    fn resource_type(&self) -> &str {
        &self.resource_type
    }

    fn schema(&self) -> &ValidationSchema {
        &self.schema
    }

    async fn create(
        &self,
        logical_id: &str,
        properties: &Properties,
    ) -> Result<LifecycleOutcome, BoxError> {
        self.next_step(Call::Create {
            logical_id: logical_id.to_string(),
            properties: properties.clone(),
        })
    }

    async fn update(
        &self,
        logical_id: &str,
        physical_id: &str,
        properties: &Properties,
        old_properties: &Properties,
    ) -> Result<LifecycleOutcome, BoxError> {
        self.next_step(Call::Update {
            logical_id: logical_id.to_string(),
            physical_id: physical_id.to_string(),
            properties: properties.clone(),
            old_properties: old_properties.clone(),
        })
    }

    async fn delete(&self, physical_id: &str) -> Result<LifecycleResult, BoxError> {
        self.calls.lock().unwrap().push(Call::Delete {
            physical_id: physical_id.to_string(),
        });
        Ok(LifecycleResult::new(physical_id))
    }
}

/// Calls recorded by a [`ScriptedResource`].
#[derive(Debug, Clone)]
pub struct CallLog(Arc<Mutex<Vec<Call>>>);

impl CallLog {
    pub fn len(&self) -> usize {
        self.0.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn snapshot(&self) -> Vec<Call> {
        self.0.lock().unwrap().clone()
    }
}

/// Reporter that keeps every response instead of sending it.
#[derive(Debug, Clone, Default)]
pub struct RecordingReporter {
    delivered: Arc<Mutex<Vec<(String, CustomResourceResponse)>>>,
    reject_with: Option<u16>,
}

impl RecordingReporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records responses but answers every report with `ReportError::Rejected(status)`.
    pub fn rejecting(status: u16) -> Self {
        Self {
            reject_with: Some(status),
            ..Self::default()
        }
    }

    pub fn delivered(&self) -> Vec<(String, CustomResourceResponse)> {
        self.delivered.lock().unwrap().clone()
    }
}

#[async_trait]
impl ResponseReporter for RecordingReporter {
    async fn report(
        &self,
        url: &str,
        response: &CustomResourceResponse,
    ) -> Result<(), ReportError> {
        self.delivered
            .lock()
            .unwrap()
            .push((url.to_string(), response.clone()));
        match self.reject_with {
            Some(status) => Err(ReportError::Rejected(status)),
            None => Ok(()),
        }
    }
}
