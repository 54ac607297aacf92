//! # Invocation Handler
//!
//! The single entry point per invocation: dispatch, then report. Never fails; every
//! error path has already been folded into a FAILED response by the time it returns.

use crate::config::HandlerConfig;
use crate::dispatcher::Dispatcher;
use crate::registry::ResourceRegistry;
use crate::reporter::{deliver, HttpReporter, ResponseReporter};
use crate::request::CustomResourceRequest;
use crate::response::CustomResourceResponse;
use std::sync::Arc;
use tracing::info;

#[derive(Clone)]
pub struct CustomResourceHandler {
    dispatcher: Dispatcher,
    reporter: Arc<dyn ResponseReporter>,
}

impl CustomResourceHandler {
    /// Handler reporting over HTTP.
    pub fn new(registry: ResourceRegistry, config: &HandlerConfig) -> Self {
        Self::with_reporter(
            registry,
            config,
            Arc::new(HttpReporter::new(config.report_timeout)),
        )
    }

    pub fn with_reporter(
        registry: ResourceRegistry,
        config: &HandlerConfig,
        reporter: Arc<dyn ResponseReporter>,
    ) -> Self {
        Self {
            dispatcher: Dispatcher::new(registry, config),
            reporter,
        }
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    /// Processes the request and reports the outcome to its `ResponseURL`.
    ///
    /// The response is returned whether or not delivery succeeded.
    pub async fn handle(&self, request: &CustomResourceRequest) -> CustomResourceResponse {
        info!(
            request_id = %request.request_id,
            resource_type = %request.resource_type,
            request_type = %request.request_type,
            "Handling request"
        );
        let response = self.dispatcher.process(request).await;
        deliver(self.reporter.as_ref(), &request.response_url, &response).await;
        response
    }
}
