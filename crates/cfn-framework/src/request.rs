//! # Inbound Request
//!
//! The event CloudFormation sends for every custom-resource operation. It is
//! deserialized once per invocation and never mutated afterwards.

use crate::validation::Properties;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// The stack operation being performed.
///
/// Unknown request types deserialize into [`RequestType::Unsupported`] so that the
/// invocation still produces a FAILED response instead of an unparsable event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestType {
    Create,
    Update,
    Delete,
    Unsupported(String),
}

impl RequestType {
    pub fn as_str(&self) -> &str {
        match self {
            RequestType::Create => "Create",
            RequestType::Update => "Update",
            RequestType::Delete => "Delete",
            RequestType::Unsupported(other) => other,
        }
    }
}

impl fmt::Display for RequestType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<String> for RequestType {
    fn from(value: String) -> Self {
        match value.as_str() {
            "Create" => RequestType::Create,
            "Update" => RequestType::Update,
            "Delete" => RequestType::Delete,
            _ => RequestType::Unsupported(value),
        }
    }
}

impl Serialize for RequestType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for RequestType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer).map(RequestType::from)
    }
}

/// A CloudFormation custom-resource request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CustomResourceRequest {
    pub request_type: RequestType,
    #[serde(rename = "ResponseURL")]
    pub response_url: String,
    pub stack_id: String,
    pub request_id: String,
    pub resource_type: String,
    pub logical_resource_id: String,
    /// Present for Update and Delete.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub physical_resource_id: Option<String>,
    #[serde(default)]
    pub resource_properties: Properties,
    /// Present for Update.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub old_resource_properties: Option<Properties>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_update_event() {
        let event = json!({
            "RequestType": "Update",
            "ServiceToken": "arn:aws:lambda:eu-west-1:123456789012:function:acm",
            "ResponseURL": "https://cloudformation-custom-resource-response.s3.amazonaws.com/x",
            "StackId": "arn:aws:cloudformation:eu-west-1:123456789012:stack/demo/guid",
            "RequestId": "req-1",
            "LogicalResourceId": "Certificate",
            "PhysicalResourceId": "arn:aws:acm:eu-west-1:123456789012:certificate/abc",
            "ResourceType": "Custom::Certificate",
            "ResourceProperties": { "DomainName": "example.com" },
            "OldResourceProperties": { "DomainName": "example.org" }
        });

        let request: CustomResourceRequest = serde_json::from_value(event).unwrap();
        assert_eq!(request.request_type, RequestType::Update);
        assert_eq!(request.resource_properties["DomainName"], json!("example.com"));
        assert_eq!(
            request.old_resource_properties.unwrap()["DomainName"],
            json!("example.org")
        );
    }

    #[test]
    fn unknown_request_type_and_missing_properties_still_parse() {
        let event = json!({
            "RequestType": "Import",
            "ResponseURL": "http://localhost/cb",
            "StackId": "stack",
            "RequestId": "req",
            "ResourceType": "Custom::Certificate",
            "LogicalResourceId": "Cert"
        });

        let request: CustomResourceRequest = serde_json::from_value(event).unwrap();
        assert_eq!(
            request.request_type,
            RequestType::Unsupported("Import".to_string())
        );
        assert!(request.resource_properties.is_empty());
        assert!(request.physical_resource_id.is_none());
    }
}
