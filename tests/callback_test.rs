use acm_custom_resource::acm::{AcmClientFactory, CertificateRequest, InMemoryAcm};
use acm_custom_resource::lifecycle::CertificateProvider;
use cfn_framework::{CustomResourceRequest, HandlerConfig};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn request(response_url: String, body: Value) -> CustomResourceRequest {
    let mut event = json!({
        "RequestType": "Create",
        "ResponseURL": response_url,
        "StackId": "arn:aws:cloudformation:us-east-1:123456789012:stack/web/1",
        "RequestId": "3f6c2b3e-req",
        "ResourceType": "Custom::IssuedCertificate",
        "LogicalResourceId": "IssuedCertificate"
    });
    event["ResourceProperties"] = body;
    serde_json::from_value(event).unwrap()
}

#[tokio::test]
async fn test_issued_certificate_reports_success_over_http() {
    let server = MockServer::start().await;
    let acm = InMemoryAcm::new("us-east-1", "123456789012")
        .with_record_delay(2)
        .with_issue_after(3);
    let arn = acm
        .client(None)
        .request_certificate(CertificateRequest {
            domain_name: "example.com".into(),
            validation_method: "DNS".into(),
            ..Default::default()
        })
        .await
        .unwrap();

    Mock::given(method("PUT"))
        .and(path("/callback"))
        .and(body_partial_json(json!({
            "Status": "SUCCESS",
            "PhysicalResourceId": arn,
            "RequestId": "3f6c2b3e-req",
            "LogicalResourceId": "IssuedCertificate"
        })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let config = HandlerConfig::default().with_retry_delay(Duration::ZERO);
    let provider = CertificateProvider::new(Arc::new(acm), &config).unwrap();

    let response = provider
        .handle(&request(
            format!("{}/callback", server.uri()),
            json!({"CertificateArn": arn}),
        ))
        .await;

    assert!(response.is_success());
}

#[tokio::test]
async fn test_validation_failure_reported_over_http() {
    let server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path("/callback"))
        .and(body_partial_json(json!({
            "Status": "FAILED",
            "PhysicalResourceId": "error"
        })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let provider = CertificateProvider::new(
        Arc::new(InMemoryAcm::new("us-east-1", "123456789012")),
        &HandlerConfig::default(),
    )
    .unwrap();

    let response = provider
        .handle(&request(format!("{}/callback", server.uri()), json!({})))
        .await;

    assert_eq!(
        response.reason.as_deref(),
        Some("Error: The property 'CertificateArn' is required.")
    );
}
