use cfn_framework::mock::{RecordingReporter, ScriptedResource, Step};
use cfn_framework::reporter::{deliver, HttpReporter, ResponseReporter};
use cfn_framework::{
    CustomResourceHandler, CustomResourceRequest, CustomResourceResponse, HandlerConfig,
    ReportError, RequestType, ResourceRegistry, ResponseStatus, ValidationSchema,
};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn request(url: String) -> CustomResourceRequest {
    CustomResourceRequest {
        request_type: RequestType::Create,
        response_url: url,
        stack_id: "stack-1".into(),
        request_id: "req-1".into(),
        resource_type: "Custom::Thing".into(),
        logical_resource_id: "Thing".into(),
        physical_resource_id: None,
        resource_properties: Default::default(),
        old_resource_properties: None,
    }
}

fn empty_schema() -> ValidationSchema {
    ValidationSchema::builder().build().unwrap()
}

fn config() -> HandlerConfig {
    HandlerConfig::default().with_retry_delay(Duration::ZERO)
}

#[tokio::test]
async fn test_http_reporter_puts_json() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/callback"))
        .and(header("content-type", "application/json"))
        .and(body_json(json!({
            "Status": "SUCCESS",
            "PhysicalResourceId": "thing-1",
            "StackId": "stack-1",
            "RequestId": "req-1",
            "LogicalResourceId": "Thing",
            "Data": {}
        })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let resource = ScriptedResource::new("Custom::Thing", empty_schema())
        .script([Step::ready("thing-1")]);
    let handler = CustomResourceHandler::new(ResourceRegistry::new().with(resource), &config());

    let response = handler
        .handle(&request(format!("{}/callback", server.uri())))
        .await;

    assert!(response.is_success());
}

#[tokio::test]
async fn test_rejected_delivery_is_reported_but_not_retried() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .respond_with(ResponseTemplate::new(403))
        .expect(1)
        .mount(&server)
        .await;

    let reporter = HttpReporter::new(Duration::from_secs(5));
    let response = CustomResourceResponse::failure(
        &request(server.uri()),
        &cfn_framework::FrameworkError::UnsupportedOperation("Import".into()),
    );

    let err = reporter.report(&server.uri(), &response).await.unwrap_err();
    assert!(matches!(err, ReportError::Rejected(403)));
    assert!(!deliver(&reporter, &server.uri(), &response).await);
}

#[tokio::test]
async fn test_unreachable_callback_does_not_fail_the_handler() {
    let resource = ScriptedResource::new("Custom::Thing", empty_schema())
        .script([Step::ready("thing-1")]);
    let handler = CustomResourceHandler::new(ResourceRegistry::new().with(resource), &config());

    let response = handler
        .handle(&request("http://127.0.0.1:9/unreachable".into()))
        .await;

    assert_eq!(response.status, ResponseStatus::Success);
}

#[tokio::test]
async fn test_handler_reports_failures_to_the_callback() {
    let reporter = RecordingReporter::new();
    let handler = CustomResourceHandler::with_reporter(
        ResourceRegistry::new(),
        &config(),
        Arc::new(reporter.clone()),
    );
    let req = request("https://example.invalid/cb".into());

    let response = handler.handle(&req).await;

    let delivered = reporter.delivered();
    assert_eq!(delivered.len(), 1);
    assert_eq!(delivered[0].0, "https://example.invalid/cb");
    assert_eq!(delivered[0].1, response);
    assert_eq!(response.status, ResponseStatus::Failed);
    assert_eq!(
        response.reason.as_deref(),
        Some("Unsupported resource type: Custom::Thing")
    );
}

#[tokio::test]
async fn test_rejecting_reporter_still_returns_response() {
    let reporter = RecordingReporter::rejecting(500);
    let resource = ScriptedResource::new("Custom::Thing", empty_schema())
        .script([Step::ready("thing-1")]);
    let handler = CustomResourceHandler::with_reporter(
        ResourceRegistry::new().with(resource),
        &config(),
        Arc::new(reporter.clone()),
    );

    let response = handler.handle(&request("http://localhost/cb".into())).await;

    assert!(response.is_success());
    assert_eq!(reporter.delivered().len(), 1);
}
