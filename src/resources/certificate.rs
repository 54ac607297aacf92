//! `Custom::Certificate`: requests, updates and deletes an ACM certificate.
//!
//! Only the transparency-logging preference and the tags can change in place; every other
//! property replaces the certificate.

use super::error::CertificateError;
use super::{parse_properties, patterns};
use crate::acm::{region_from_arn, AcmClientFactory, CertificateRequest, Tag};
use async_trait::async_trait;
use cfn_framework::{
    BoxError, CustomResource, LifecycleOutcome, LifecycleResult, Properties, PropertyRule,
    SchemaError, ValidationSchema,
};
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::info;

pub const RESOURCE_TYPE: &str = "Custom::Certificate";

/// ACM applies this preference when none is given.
const DEFAULT_TRANSPARENCY_LOGGING: &str = "ENABLED";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CertificateProperties {
    pub certificate_authority_arn: Option<String>,
    pub certificate_transparency_logging_preference: Option<String>,
    pub domain_name: String,
    #[serde(default)]
    pub subject_alternative_names: Vec<String>,
    pub validation_method: String,
    pub region: Option<String>,
    #[serde(default)]
    pub tags: Vec<Tag>,
}

pub struct Certificate {
    acm: Arc<dyn AcmClientFactory>,
    schema: ValidationSchema,
}

impl Certificate {
    pub fn new(acm: Arc<dyn AcmClientFactory>) -> Result<Self, SchemaError> {
        let schema = ValidationSchema::builder()
            .property(
                "CertificateAuthorityArn",
                PropertyRule::optional()
                    .forces_replacement()
                    .pattern(patterns::ACM_PCA_ARN),
            )
            .property(
                "CertificateTransparencyLoggingPreference",
                PropertyRule::optional().one_of(["ENABLED", "DISABLED"]),
            )
            .property(
                "DomainName",
                PropertyRule::required()
                    .forces_replacement()
                    .pattern(patterns::DOMAIN_NAME),
            )
            .property(
                "SubjectAlternativeNames",
                PropertyRule::optional().forces_replacement(),
            )
            .property(
                "ValidationMethod",
                PropertyRule::required()
                    .forces_replacement()
                    .default_value("DNS")
                    .one_of(["DNS", "EMAIL"]),
            )
            .property(
                "Region",
                PropertyRule::optional()
                    .forces_replacement()
                    .transform(|value| value.filter(|v| v != &Value::String(String::new()))),
            )
            .property("Tags", PropertyRule::optional())
            .build()?;
        Ok(Self { acm, schema })
    }
}

/// Tags to add (new or changed value) and to remove (key dropped).
fn tag_changes(new: &[Tag], old: &[Tag]) -> (Vec<Tag>, Vec<Tag>) {
    let added = new.iter().filter(|t| !old.contains(t)).cloned().collect();
    let removed = old
        .iter()
        .filter(|t| !new.iter().any(|n| n.key == t.key))
        .cloned()
        .collect();
    (added, removed)
}

#[async_trait]
impl CustomResource for Certificate {
    fn resource_type(&self) -> &str {
        RESOURCE_TYPE
    }

    fn schema(&self) -> &ValidationSchema {
        &self.schema
    }

    async fn create(
        &self,
        logical_id: &str,
        properties: &Properties,
    ) -> Result<LifecycleOutcome, BoxError> {
        let props: CertificateProperties = parse_properties(properties)?;
        let acm = self.acm.client(props.region.as_deref());

        let arn = acm
            .request_certificate(CertificateRequest {
                domain_name: props.domain_name,
                subject_alternative_names: props.subject_alternative_names,
                validation_method: props.validation_method,
                certificate_authority_arn: props.certificate_authority_arn,
                transparency_logging: props.certificate_transparency_logging_preference,
                tags: props.tags,
            })
            .await
            .map_err(CertificateError::from)?;

        info!(logical_id, %arn, "Certificate requested");
        Ok(LifecycleResult::new(arn).into())
    }

    async fn update(
        &self,
        _logical_id: &str,
        physical_id: &str,
        properties: &Properties,
        old_properties: &Properties,
    ) -> Result<LifecycleOutcome, BoxError> {
        let props: CertificateProperties = parse_properties(properties)?;
        let old: CertificateProperties = parse_properties(old_properties)?;
        let acm = self.acm.client(region_from_arn(physical_id));

        if props.certificate_transparency_logging_preference
            != old.certificate_transparency_logging_preference
        {
            let preference = props
                .certificate_transparency_logging_preference
                .as_deref()
                .unwrap_or(DEFAULT_TRANSPARENCY_LOGGING);
            acm.update_certificate_options(physical_id, preference)
                .await
                .map_err(CertificateError::from)?;
            info!(%physical_id, preference, "Updated transparency logging");
        }

        let (added, removed) = tag_changes(&props.tags, &old.tags);
        if !added.is_empty() {
            acm.add_tags(physical_id, &added)
                .await
                .map_err(CertificateError::from)?;
        }
        if !removed.is_empty() {
            acm.remove_tags(physical_id, &removed)
                .await
                .map_err(CertificateError::from)?;
        }

        Ok(LifecycleResult::new(physical_id).into())
    }

    async fn delete(&self, physical_id: &str) -> Result<LifecycleResult, BoxError> {
        let acm = self.acm.client(region_from_arn(physical_id));
        acm.delete_certificate(physical_id)
            .await
            .map_err(CertificateError::from)?;
        info!(%physical_id, "Certificate deleted");
        Ok(LifecycleResult::new(physical_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tag_changes_split_added_and_removed() {
        let old = vec![Tag::new("env", "dev"), Tag::new("team", "web")];
        let new = vec![Tag::new("env", "prod"), Tag::new("owner", "ops")];

        let (added, removed) = tag_changes(&new, &old);
        assert_eq!(added, new);
        assert_eq!(removed, vec![Tag::new("team", "web")]);
    }

    #[test]
    fn unchanged_tags_produce_no_calls() {
        let tags = vec![Tag::new("env", "dev")];
        let (added, removed) = tag_changes(&tags, &tags);
        assert!(added.is_empty());
        assert!(removed.is_empty());
    }
}
