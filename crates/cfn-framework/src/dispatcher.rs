//! # Dispatcher & Retry Loop
//!
//! The dispatcher resolves a request to its resource implementation and drives
//! [`handle_lifecycle`] until the resource settles.
//!
//! ## Retry policy
//!
//! - The first attempt runs immediately.
//! - `Pending` suspends the invocation for `retry_delay`, then the whole lifecycle step
//!   (validation included) runs again.
//! - At most `max_attempts` attempts per invocation. Still pending after the last one is a
//!   [`FrameworkError::RetryBudgetExhausted`] failure.
//! - Any error ends the loop at once. Errors and `Pending` never mix.
//!
//! The budget is a local [`RetryBudget`] value created by each [`Dispatcher::dispatch`]
//! call, so concurrent invocations never share a counter.

use crate::config::HandlerConfig;
use crate::error::FrameworkError;
use crate::registry::ResourceRegistry;
use crate::request::CustomResourceRequest;
use crate::resource::{handle_lifecycle, LifecycleOutcome, LifecycleResult};
use crate::response::CustomResourceResponse;
use std::time::Duration;
use tracing::{debug, info, info_span, warn, Instrument};

/// Attempts left in a single invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryBudget {
    max_attempts: u32,
    used: u32,
}

impl RetryBudget {
    pub fn new(max_attempts: u32) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            used: 0,
        }
    }

    /// Claims the next attempt, returning its 1-based number.
    pub fn next_attempt(&mut self) -> Option<u32> {
        (self.used < self.max_attempts).then(|| {
            self.used += 1;
            self.used
        })
    }

    pub fn used(&self) -> u32 {
        self.used
    }

    pub fn remaining(&self) -> u32 {
        self.max_attempts - self.used
    }
}

#[derive(Debug, Clone)]
pub struct Dispatcher {
    registry: ResourceRegistry,
    max_attempts: u32,
    retry_delay: Duration,
}

impl Dispatcher {
    pub fn new(registry: ResourceRegistry, config: &HandlerConfig) -> Self {
        Self {
            registry,
            max_attempts: config.max_attempts,
            retry_delay: config.retry_delay,
        }
    }

    pub fn registry(&self) -> &ResourceRegistry {
        &self.registry
    }

    /// Runs the request to completion and returns the settled result.
    pub async fn dispatch(
        &self,
        request: &CustomResourceRequest,
    ) -> Result<LifecycleResult, FrameworkError> {
        let span = info_span!(
            "dispatch",
            resource_type = %request.resource_type,
            request_type = %request.request_type,
            logical_id = %request.logical_resource_id,
        );
        self.run(request).instrument(span).await
    }

    /// Like [`dispatch`](Self::dispatch), folded into the response to report.
    pub async fn process(&self, request: &CustomResourceRequest) -> CustomResourceResponse {
        match self.dispatch(request).await {
            Ok(result) => {
                info!(physical_id = %result.physical_id, "Request succeeded");
                CustomResourceResponse::success(request, result)
            }
            Err(e) => {
                warn!(
                    resource_type = %request.resource_type,
                    logical_id = %request.logical_resource_id,
                    error = %e,
                    "Request failed"
                );
                CustomResourceResponse::failure(request, &e)
            }
        }
    }

    async fn run(&self, request: &CustomResourceRequest) -> Result<LifecycleResult, FrameworkError> {
        let resource = self.registry.resolve(&request.resource_type)?;
        let mut budget = RetryBudget::new(self.max_attempts);

        while let Some(attempt) = budget.next_attempt() {
            if attempt > 1 {
                tokio::time::sleep(self.retry_delay).await;
            }
            debug!(attempt, "Invoking lifecycle");

            match handle_lifecycle(resource.as_ref(), request).await {
                Ok(LifecycleOutcome::Ready(result)) => {
                    debug!(attempt, "Settled");
                    return Ok(result);
                }
                Ok(LifecycleOutcome::Pending) => {
                    info!(attempt, remaining = budget.remaining(), "Pending");
                }
                Err(e) => {
                    warn!(attempt, error = %e, "Attempt failed");
                    return Err(e);
                }
            }
        }

        Err(FrameworkError::RetryBudgetExhausted {
            resource_type: request.resource_type.clone(),
            attempts: budget.used(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn budget_counts_attempts() {
        let mut budget = RetryBudget::new(3);
        assert_eq!(budget.next_attempt(), Some(1));
        assert_eq!(budget.next_attempt(), Some(2));
        assert_eq!(budget.remaining(), 1);
        assert_eq!(budget.next_attempt(), Some(3));
        assert_eq!(budget.next_attempt(), None);
        assert_eq!(budget.used(), 3);
    }

    #[test]
    fn budget_allows_at_least_one_attempt() {
        let mut budget = RetryBudget::new(0);
        assert_eq!(budget.next_attempt(), Some(1));
        assert_eq!(budget.next_attempt(), None);
    }
}
