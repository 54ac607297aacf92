//! `Custom::IssuedCertificate`: blocks the stack until a certificate is issued.
//!
//! Templates make resources that need a usable certificate depend on this one. It never
//! changes anything in ACM; it only reports Pending while validation is in progress.

use super::error::CertificateError;
use super::{parse_properties, patterns};
use crate::acm::{region_from_arn, AcmClientFactory, CertificateStatus};
use async_trait::async_trait;
use cfn_framework::{
    BoxError, CustomResource, LifecycleOutcome, LifecycleResult, Properties, PropertyRule,
    SchemaError, ValidationSchema,
};
use serde::Deserialize;
use std::sync::Arc;
use tracing::debug;

pub const RESOURCE_TYPE: &str = "Custom::IssuedCertificate";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct IssuedCertificateProperties {
    certificate_arn: String,
}

pub struct IssuedCertificate {
    acm: Arc<dyn AcmClientFactory>,
    schema: ValidationSchema,
}

impl IssuedCertificate {
    pub fn new(acm: Arc<dyn AcmClientFactory>) -> Result<Self, SchemaError> {
        let schema = ValidationSchema::builder()
            .property(
                "CertificateArn",
                PropertyRule::required()
                    .forces_replacement()
                    .pattern(patterns::ACM_CERTIFICATE_ARN),
            )
            .build()?;
        Ok(Self { acm, schema })
    }

    async fn wait_for_issue(&self, properties: &Properties) -> Result<LifecycleOutcome, BoxError> {
        let props: IssuedCertificateProperties = parse_properties(properties)?;
        let arn = props.certificate_arn;
        let acm = self.acm.client(region_from_arn(&arn));

        let Some(certificate) = acm
            .describe_certificate(&arn)
            .await
            .map_err(CertificateError::from)?
        else {
            debug!(%arn, "Certificate not visible yet");
            return Ok(LifecycleOutcome::Pending);
        };

        match certificate.status {
            CertificateStatus::Issued => Ok(LifecycleResult::new(arn).into()),
            CertificateStatus::PendingValidation => {
                debug!(%arn, "Waiting for validation");
                Ok(LifecycleOutcome::Pending)
            }
            other => Err(CertificateError::InvalidStatus(other).into()),
        }
    }
}

#[async_trait]
impl CustomResource for IssuedCertificate {
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
        self.wait_for_issue(properties).await
    }

    async fn update(
        &self,
        _logical_id: &str,
        _physical_id: &str,
        properties: &Properties,
        _old_properties: &Properties,
    ) -> Result<LifecycleOutcome, BoxError> {
        self.wait_for_issue(properties).await
    }

    async fn delete(&self, physical_id: &str) -> Result<LifecycleResult, BoxError> {
        Ok(LifecycleResult::new(physical_id))
    }
}
