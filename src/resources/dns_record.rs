//! `Custom::CertificateDNSRecord`: exposes the DNS validation record of one domain.
//!
//! The record is returned as `Name`, `Type` and `Value` attributes so a template can feed
//! it straight into a Route 53 record set.

use super::{parse_properties, patterns};
use crate::acm::{region_from_arn, AcmClientFactory, ResourceRecord};
use crate::resources::error::CertificateError;
use async_trait::async_trait;
use cfn_framework::{
    BoxError, CustomResource, LifecycleOutcome, LifecycleResult, Properties, PropertyRule,
    SchemaError, ValidationSchema,
};
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::debug;

pub const RESOURCE_TYPE: &str = "Custom::CertificateDNSRecord";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct DnsRecordProperties {
    certificate_arn: String,
    domain_name: String,
}

pub struct CertificateDnsRecord {
    acm: Arc<dyn AcmClientFactory>,
    schema: ValidationSchema,
}

fn record_data(name: &str, record_type: &str, value: &str) -> Properties {
    let mut data = Properties::new();
    data.insert("Name".into(), Value::from(name));
    data.insert("Type".into(), Value::from(record_type));
    data.insert("Value".into(), Value::from(value));
    data
}

impl CertificateDnsRecord {
    pub fn new(acm: Arc<dyn AcmClientFactory>) -> Result<Self, SchemaError> {
        let schema = ValidationSchema::builder()
            .property(
                "CertificateArn",
                PropertyRule::required()
                    .forces_replacement()
                    .pattern(patterns::ACM_CERTIFICATE_ARN),
            )
            .property(
                "DomainName",
                PropertyRule::required()
                    .forces_replacement()
                    .pattern(patterns::DOMAIN_NAME),
            )
            .build()?;
        Ok(Self { acm, schema })
    }

    async fn lookup(&self, properties: &Properties) -> Result<LifecycleOutcome, BoxError> {
        let props: DnsRecordProperties = parse_properties(properties)?;
        let acm = self.acm.client(region_from_arn(&props.certificate_arn));

        let record = acm
            .describe_certificate(&props.certificate_arn)
            .await
            .map_err(CertificateError::from)?
            .and_then(|c| c.domain_validation_options)
            .and_then(|options| {
                options
                    .into_iter()
                    .find(|o| o.domain_name == props.domain_name)
            })
            .and_then(|option| option.resource_record);

        match record {
            Some(ResourceRecord {
                name,
                record_type,
                value,
            }) => Ok(LifecycleResult::new(props.certificate_arn)
                .with_data(record_data(&name, &record_type, &value))
                .into()),
            None => {
                debug!(domain = %props.domain_name, "Validation record not available yet");
                Ok(LifecycleOutcome::Pending)
            }
        }
    }
}

#[async_trait]
impl CustomResource for CertificateDnsRecord {
    fn resource_type(&self) -> &str {
        RESOURCE_TYPE
    }

    fn schema(&self) -> &ValidationSchema {
        &self.schema
    }

    async fn create(
        &self,
        _logical_id: &str,
        properties: &Properties,
    ) -> Result<LifecycleOutcome, BoxError> {
        self.lookup(properties).await
    }

    async fn update(
        &self,
        _logical_id: &str,
        _physical_id: &str,
        properties: &Properties,
        _old_properties: &Properties,
    ) -> Result<LifecycleOutcome, BoxError> {
        self.lookup(properties).await
    }

    async fn delete(&self, physical_id: &str) -> Result<LifecycleResult, BoxError> {
        Ok(LifecycleResult::new(physical_id).with_data(record_data("", "", "")))
    }
}
