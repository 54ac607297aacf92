//! # Provider Lifecycle
//!
//! Builds the running provider: one client factory, the three certificate resources in a
//! registry, and a handler that dispatches and reports.
//!
//! ```rust,ignore
//! let acm: Arc<dyn AcmClientFactory> = Arc::new(sdk_factory);
//! let provider = CertificateProvider::new(acm, &HandlerConfig::from_env())?;
//! let response = provider.handle(&request).await;
//! ```
//!
//! The registry is immutable once built and every invocation gets its own retry budget, so
//! a single provider can serve concurrent invocations.

pub mod provider;

pub use provider::*;
