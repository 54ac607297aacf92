//! # Local Driver
//!
//! Runs one custom-resource event through the provider, backed by the in-memory certificate
//! manager. The event is read from the file given as first argument, or from stdin.
//!
//! ```bash
//! RUST_LOG=info CFN_RETRY_DELAY_SECS=1 cargo run -- event.json
//! ```
//!
//! The response is delivered to the event's `ResponseURL` and printed to stdout.

use acm_custom_resource::acm::InMemoryAcm;
use acm_custom_resource::lifecycle::CertificateProvider;
use cfn_framework::tracing::setup_tracing;
use cfn_framework::{CustomResourceRequest, HandlerConfig};
use std::sync::Arc;
use tokio::io::AsyncReadExt;
use tracing::info;

const DEFAULT_REGION: &str = "us-east-1";
const ACCOUNT_ID: &str = "123456789012";

async fn read_event(path: Option<String>) -> std::io::Result<String> {
    match path {
        Some(path) => tokio::fs::read_to_string(path).await,
        None => {
            let mut raw = String::new();
            tokio::io::stdin().read_to_string(&mut raw).await?;
            Ok(raw)
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    setup_tracing();

    let config = HandlerConfig::from_env();
    info!(?config, "Starting provider");

    let raw = read_event(std::env::args().nth(1)).await?;
    let request: CustomResourceRequest = serde_json::from_str(&raw)?;

    // Validation records appear on the second describe, issuance on the third.
    let acm = InMemoryAcm::new(DEFAULT_REGION, ACCOUNT_ID)
        .with_record_delay(2)
        .with_issue_after(3);
    let provider = CertificateProvider::new(Arc::new(acm), &config)?;

    let response = provider.handle(&request).await;
    println!("{}", serde_json::to_string_pretty(&response)?);
    Ok(())
}
