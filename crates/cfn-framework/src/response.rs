//! # Outbound Response
//!
//! The JSON document PUT to the request's `ResponseURL`. It is derived deterministically
//! from the request and the dispatch outcome; identifying fields are always echoed.

use crate::error::FrameworkError;
use crate::request::CustomResourceRequest;
use crate::resource::LifecycleResult;
use crate::validation::Properties;
use serde::{Deserialize, Serialize};

/// Physical id reported when a failed request carries none.
pub const FAILED_PHYSICAL_ID: &str = "error";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResponseStatus {
    #[serde(rename = "SUCCESS")]
    Success,
    #[serde(rename = "FAILED")]
    Failed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CustomResourceResponse {
    pub status: ResponseStatus,
    /// Only set on failure.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    pub physical_resource_id: String,
    pub stack_id: String,
    pub request_id: String,
    pub logical_resource_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub no_echo: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Properties>,
}

impl CustomResourceResponse {
    pub fn success(request: &CustomResourceRequest, result: LifecycleResult) -> Self {
        Self {
            status: ResponseStatus::Success,
            reason: None,
            physical_resource_id: result.physical_id,
            stack_id: request.stack_id.clone(),
            request_id: request.request_id.clone(),
            logical_resource_id: request.logical_resource_id.clone(),
            no_echo: None,
            data: Some(result.data),
        }
    }

    /// Keeps the request's physical id so a failed Update never looks like a replacement.
    pub fn failure(request: &CustomResourceRequest, error: &FrameworkError) -> Self {
        Self {
            status: ResponseStatus::Failed,
            reason: Some(error.to_string()),
            physical_resource_id: request
                .physical_resource_id
                .clone()
                .unwrap_or_else(|| FAILED_PHYSICAL_ID.to_string()),
            stack_id: request.stack_id.clone(),
            request_id: request.request_id.clone(),
            logical_resource_id: request.logical_resource_id.clone(),
            no_echo: None,
            data: None,
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == ResponseStatus::Success
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::RequestType;
    use serde_json::json;

    fn request(physical_id: Option<&str>) -> CustomResourceRequest {
        CustomResourceRequest {
            request_type: RequestType::Create,
            response_url: "http://localhost/cb".into(),
            stack_id: "stack-1".into(),
            request_id: "req-1".into(),
            resource_type: "Custom::Thing".into(),
            logical_resource_id: "Thing".into(),
            physical_resource_id: physical_id.map(Into::into),
            resource_properties: Properties::new(),
            old_resource_properties: None,
        }
    }

    #[test]
    fn success_serializes_without_reason() {
        let mut data = Properties::new();
        data.insert("Name".into(), json!("_x.example.com."));
        let response = CustomResourceResponse::success(
            &request(None),
            LifecycleResult::new("phys-1").with_data(data),
        );

        assert_eq!(
            serde_json::to_value(&response).unwrap(),
            json!({
                "Status": "SUCCESS",
                "PhysicalResourceId": "phys-1",
                "StackId": "stack-1",
                "RequestId": "req-1",
                "LogicalResourceId": "Thing",
                "Data": { "Name": "_x.example.com." }
            })
        );
    }

    #[test]
    fn failure_uses_sentinel_only_without_physical_id() {
        let error = FrameworkError::UnknownResourceType("Custom::Nope".into());

        let fresh = CustomResourceResponse::failure(&request(None), &error);
        assert_eq!(fresh.physical_resource_id, FAILED_PHYSICAL_ID);
        assert_eq!(
            fresh.reason.as_deref(),
            Some("Unsupported resource type: Custom::Nope")
        );
        assert!(fresh.data.is_none());

        let existing = CustomResourceResponse::failure(&request(Some("phys-9")), &error);
        assert_eq!(existing.physical_resource_id, "phys-9");
        assert_eq!(existing.status, ResponseStatus::Failed);
    }
}
