//! # Response Reporter
//!
//! Delivers the final [`CustomResourceResponse`] to the pre-signed `ResponseURL`.
//! Delivery is a single best-effort PUT: if it fails, CloudFormation times the resource
//! out on its own, so failures are logged and never retried.

use crate::error::ReportError;
use crate::response::CustomResourceResponse;
use async_trait::async_trait;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Sends a response to a callback address.
#[async_trait]
pub trait ResponseReporter: Send + Sync {
    async fn report(&self, url: &str, response: &CustomResourceResponse)
        -> Result<(), ReportError>;
}

/// Reports over HTTP with `reqwest`.
#[derive(Debug, Clone)]
pub struct HttpReporter {
    client: reqwest::Client,
    timeout: Duration,
}

impl HttpReporter {
    pub fn new(timeout: Duration) -> Self {
        Self {
            client: reqwest::Client::new(),
            timeout,
        }
    }
}

#[async_trait]
impl ResponseReporter for HttpReporter {
    async fn report(
        &self,
        url: &str,
        response: &CustomResourceResponse,
    ) -> Result<(), ReportError> {
        let body = serde_json::to_vec(response)?;
        debug!(bytes = body.len(), "Sending response");

        let reply = self
            .client
            .put(url)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .timeout(self.timeout)
            .body(body)
            .send()
            .await?;

        let status = reply.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(ReportError::Rejected(status.as_u16()))
        }
    }
}

/// Fire-and-forget delivery. Returns whether the callback accepted the response.
pub async fn deliver(
    reporter: &dyn ResponseReporter,
    url: &str,
    response: &CustomResourceResponse,
) -> bool {
    match reporter.report(url, response).await {
        Ok(()) => {
            info!(status = ?response.status, "Response delivered");
            true
        }
        Err(e) => {
            warn!(error = %e, "Response delivery failed");
            false
        }
    }
}
