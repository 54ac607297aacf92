//! In-memory certificate manager.
//!
//! Behaves like a tiny ACM: certificates are region-scoped, start in
//! `PENDING_VALIDATION`, and get DNS validation records. Knobs let tests decide how many
//! `describe_certificate` calls pass before records appear or the certificate is issued,
//! which is exactly what the polling resources wait for.

use super::{
    AcmClientFactory, AcmError, CertificateDetail, CertificateManager, CertificateRequest,
    CertificateStatus, DomainValidation, ResourceRecord, Tag,
};
use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::debug;
use uuid::Uuid;

#[derive(Debug)]
struct StoredCertificate {
    region: String,
    detail: CertificateDetail,
    validations: Vec<DomainValidation>,
    describes: u32,
}

#[derive(Debug, Default)]
struct Store {
    certificates: HashMap<String, StoredCertificate>,
    issue_after: Option<u32>,
    record_delay: u32,
    failures: VecDeque<AcmError>,
}

/// Shared in-memory ACM; also acts as its own [`AcmClientFactory`].
#[derive(Debug, Clone)]
pub struct InMemoryAcm {
    store: Arc<Mutex<Store>>,
    default_region: String,
    account_id: String,
}

impl InMemoryAcm {
    pub fn new(default_region: impl Into<String>, account_id: impl Into<String>) -> Self {
        Self {
            store: Arc::new(Mutex::new(Store::default())),
            default_region: default_region.into(),
            account_id: account_id.into(),
        }
    }

    /// Issues pending certificates on their `describes`-th describe call.
    pub fn with_issue_after(self, describes: u32) -> Self {
        self.store().issue_after = Some(describes);
        self
    }

    /// Hides validation options until the `describes`-th describe call.
    pub fn with_record_delay(self, describes: u32) -> Self {
        self.store().record_delay = describes;
        self
    }

    /// Makes the next API call of any client fail with `error`.
    pub fn fail_next(&self, error: AcmError) {
        self.store().failures.push_back(error);
    }

    pub fn set_status(&self, arn: &str, status: CertificateStatus) -> bool {
        match self.store().certificates.get_mut(arn) {
            Some(stored) => {
                stored.detail.status = status;
                true
            }
            None => false,
        }
    }

    pub fn issue(&self, arn: &str) -> bool {
        self.set_status(arn, CertificateStatus::Issued)
    }

    /// Current state, without counting as a describe call.
    pub fn certificate(&self, arn: &str) -> Option<CertificateDetail> {
        self.store().certificates.get(arn).map(|c| c.detail.clone())
    }

    pub fn arns(&self) -> Vec<String> {
        let mut arns: Vec<_> = self.store().certificates.keys().cloned().collect();
        arns.sort();
        arns
    }

    pub fn len(&self) -> usize {
        self.store().certificates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn store(&self) -> MutexGuard<'_, Store> {
        self.store.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl AcmClientFactory for InMemoryAcm {
    fn client(&self, region: Option<&str>) -> Arc<dyn CertificateManager> {
        Arc::new(RegionalClient {
            acm: self.clone(),
            region: region.unwrap_or(&self.default_region).to_string(),
        })
    }
}

/// View of the shared store bound to one region.
struct RegionalClient {
    acm: InMemoryAcm,
    region: String,
}

impl RegionalClient {
    /// Locks the store, consuming an injected failure if one is queued.
    fn begin(&self) -> Result<MutexGuard<'_, Store>, AcmError> {
        let mut store = self.acm.store();
        match store.failures.pop_front() {
            Some(error) => Err(error),
            None => Ok(store),
        }
    }

    fn certificate<'a>(
        &self,
        store: &'a mut Store,
        arn: &str,
    ) -> Result<&'a mut StoredCertificate, AcmError> {
        store
            .certificates
            .get_mut(arn)
            .filter(|c| c.region == self.region)
            .ok_or_else(|| AcmError::NotFound(arn.to_string()))
    }
}

fn validation_for(domain: &str, dns: bool) -> DomainValidation {
    let token = Uuid::new_v4().simple().to_string();
    let base = domain.strip_prefix("*.").unwrap_or(domain);
    DomainValidation {
        domain_name: domain.to_string(),
        resource_record: dns.then(|| ResourceRecord {
            name: format!("_{}.{base}.", &token[..16]),
            record_type: "CNAME".to_string(),
            value: format!("_{}.acm-validations.aws.", &token[16..]),
        }),
    }
}

#[async_trait]
impl CertificateManager for RegionalClient {
    async fn request_certificate(&self, request: CertificateRequest) -> Result<String, AcmError> {
        let mut store = self.begin()?;
        let arn = format!(
            "arn:aws:acm:{}:{}:certificate/{}",
            self.region,
            self.acm.account_id,
            Uuid::new_v4()
        );

        let dns = request.validation_method == "DNS";
        let mut domains = vec![request.domain_name.clone()];
        for name in &request.subject_alternative_names {
            if !domains.contains(name) {
                domains.push(name.clone());
            }
        }
        let validations = domains.iter().map(|d| validation_for(d, dns)).collect();

        let detail = CertificateDetail {
            arn: arn.clone(),
            domain_name: request.domain_name,
            subject_alternative_names: domains,
            status: CertificateStatus::PendingValidation,
            domain_validation_options: None,
            transparency_logging: Some(
                request
                    .transparency_logging
                    .unwrap_or_else(|| "ENABLED".to_string()),
            ),
            tags: request.tags,
        };
        store.certificates.insert(
            arn.clone(),
            StoredCertificate {
                region: self.region.clone(),
                detail,
                validations,
                describes: 0,
            },
        );
        debug!(%arn, "Requested certificate");
        Ok(arn)
    }

    async fn describe_certificate(
        &self,
        arn: &str,
    ) -> Result<Option<CertificateDetail>, AcmError> {
        let mut store = self.begin()?;
        let issue_after = store.issue_after;
        let record_delay = store.record_delay;
        let Ok(stored) = self.certificate(&mut store, arn) else {
            return Ok(None);
        };

        stored.describes += 1;
        if issue_after.is_some_and(|n| stored.describes >= n)
            && stored.detail.status == CertificateStatus::PendingValidation
        {
            stored.detail.status = CertificateStatus::Issued;
        }

        let mut detail = stored.detail.clone();
        if stored.describes >= record_delay {
            detail.domain_validation_options = Some(stored.validations.clone());
        }
        Ok(Some(detail))
    }

    async fn update_certificate_options(
        &self,
        arn: &str,
        transparency_logging: &str,
    ) -> Result<(), AcmError> {
        let mut store = self.begin()?;
        let stored = self.certificate(&mut store, arn)?;
        stored.detail.transparency_logging = Some(transparency_logging.to_string());
        Ok(())
    }

    async fn add_tags(&self, arn: &str, tags: &[Tag]) -> Result<(), AcmError> {
        let mut store = self.begin()?;
        let stored = self.certificate(&mut store, arn)?;
        for tag in tags {
            stored.detail.tags.retain(|t| t.key != tag.key);
            stored.detail.tags.push(tag.clone());
        }
        Ok(())
    }

    async fn remove_tags(&self, arn: &str, tags: &[Tag]) -> Result<(), AcmError> {
        let mut store = self.begin()?;
        let stored = self.certificate(&mut store, arn)?;
        stored.detail.tags.retain(|t| {
            !tags
                .iter()
                .any(|r| r.key == t.key && (r.value.is_none() || r.value == t.value))
        });
        Ok(())
    }

    async fn delete_certificate(&self, arn: &str) -> Result<(), AcmError> {
        let mut store = self.begin()?;
        self.certificate(&mut store, arn)?;
        store.certificates.remove(arn);
        debug!(%arn, "Deleted certificate");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(domain: &str) -> CertificateRequest {
        CertificateRequest {
            domain_name: domain.to_string(),
            validation_method: "DNS".to_string(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_certificates_are_region_scoped() {
        let acm = InMemoryAcm::new("us-east-1", "123456789012");
        let arn = acm
            .client(Some("eu-west-1"))
            .request_certificate(request("example.com"))
            .await
            .unwrap();

        assert!(arn.starts_with("arn:aws:acm:eu-west-1:123456789012:certificate/"));
        assert!(acm.client(None).describe_certificate(&arn).await.unwrap().is_none());
        assert!(acm
            .client(Some("eu-west-1"))
            .describe_certificate(&arn)
            .await
            .unwrap()
            .is_some());
    }

    #[tokio::test]
    async fn test_issue_after_and_record_delay() {
        let acm = InMemoryAcm::new("us-east-1", "123456789012")
            .with_record_delay(2)
            .with_issue_after(3);
        let client = acm.client(None);
        let arn = client
            .request_certificate(request("*.example.com"))
            .await
            .unwrap();

        let first = client.describe_certificate(&arn).await.unwrap().unwrap();
        assert!(first.domain_validation_options.is_none());
        assert_eq!(first.status, CertificateStatus::PendingValidation);

        let second = client.describe_certificate(&arn).await.unwrap().unwrap();
        let options = second.domain_validation_options.unwrap();
        let record = options[0].resource_record.as_ref().unwrap();
        assert!(record.name.ends_with(".example.com."));
        assert_eq!(record.record_type, "CNAME");

        let third = client.describe_certificate(&arn).await.unwrap().unwrap();
        assert_eq!(third.status, CertificateStatus::Issued);
    }

    #[tokio::test]
    async fn test_injected_failure_hits_next_call_only() {
        let acm = InMemoryAcm::new("us-east-1", "123456789012");
        acm.fail_next(AcmError::api("ThrottlingException", "Rate exceeded"));
        let client = acm.client(None);

        let err = client.request_certificate(request("example.com")).await.unwrap_err();
        assert_eq!(err.to_string(), "ThrottlingException: Rate exceeded");
        assert!(client.request_certificate(request("example.com")).await.is_ok());
    }

    #[tokio::test]
    async fn test_tags_merge_and_remove() {
        let acm = InMemoryAcm::new("us-east-1", "123456789012");
        let client = acm.client(None);
        let arn = client
            .request_certificate(CertificateRequest {
                tags: vec![Tag::new("env", "dev"), Tag::new("team", "web")],
                ..request("example.com")
            })
            .await
            .unwrap();

        client.add_tags(&arn, &[Tag::new("env", "prod")]).await.unwrap();
        client.remove_tags(&arn, &[Tag::new("team", "web")]).await.unwrap();

        assert_eq!(acm.certificate(&arn).unwrap().tags, vec![Tag::new("env", "prod")]);
    }

    #[tokio::test]
    async fn test_delete_unknown_certificate_fails() {
        let acm = InMemoryAcm::new("us-east-1", "123456789012");
        let err = acm
            .client(None)
            .delete_certificate("arn:aws:acm:us-east-1:123456789012:certificate/nope")
            .await
            .unwrap_err();
        assert!(matches!(err, AcmError::NotFound(_)));
    }
}
