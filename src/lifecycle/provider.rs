//! Wiring of the certificate provider.

use crate::acm::AcmClientFactory;
use crate::resources::{Certificate, CertificateDnsRecord, IssuedCertificate};
use cfn_framework::{
    CustomResourceHandler, CustomResourceRequest, CustomResourceResponse, HandlerConfig,
    ResourceRegistry, ResponseReporter, SchemaError,
};
use std::sync::Arc;
use tracing::info;

/// Registry with every certificate resource type, sharing one client factory.
pub fn certificate_registry(
    acm: Arc<dyn AcmClientFactory>,
) -> Result<ResourceRegistry, SchemaError> {
    Ok(ResourceRegistry::new()
        .with(Certificate::new(acm.clone())?)
        .with(IssuedCertificate::new(acm.clone())?)
        .with(CertificateDnsRecord::new(acm)?))
}

/// The provider as deployed: certificate resources behind an HTTP-reporting handler.
#[derive(Clone)]
pub struct CertificateProvider {
    handler: CustomResourceHandler,
}

impl CertificateProvider {
    pub fn new(acm: Arc<dyn AcmClientFactory>, config: &HandlerConfig) -> Result<Self, SchemaError> {
        let registry = certificate_registry(acm)?;
        info!(?registry, "Certificate provider ready");
        Ok(Self {
            handler: CustomResourceHandler::new(registry, config),
        })
    }

    /// Same provider, reporting through `reporter` instead of HTTP.
    pub fn with_reporter(
        acm: Arc<dyn AcmClientFactory>,
        config: &HandlerConfig,
        reporter: Arc<dyn ResponseReporter>,
    ) -> Result<Self, SchemaError> {
        Ok(Self {
            handler: CustomResourceHandler::with_reporter(
                certificate_registry(acm)?,
                config,
                reporter,
            ),
        })
    }

    pub async fn handle(&self, request: &CustomResourceRequest) -> CustomResourceResponse {
        self.handler.handle(request).await
    }
}
