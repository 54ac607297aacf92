//! # ACM Custom Resource Provider
//!
//! > **CloudFormation custom resources for ACM certificates.**
//!
//! The provider lets a stack request a certificate, publish its DNS validation record and
//! wait until it is issued, all inside one template:
//!
//! ```yaml
//! Certificate:
//!   Type: Custom::Certificate
//!   Properties:
//!     ServiceToken: !GetAtt Provider.Arn
//!     DomainName: example.com
//!     Region: us-east-1
//! ValidationRecord:
//!   Type: Custom::CertificateDNSRecord
//!   Properties:
//!     ServiceToken: !GetAtt Provider.Arn
//!     CertificateArn: !Ref Certificate
//!     DomainName: example.com
//! IssuedCertificate:
//!   Type: Custom::IssuedCertificate
//!   DependsOn: ValidationRecordSet
//!   Properties:
//!     ServiceToken: !GetAtt Provider.Arn
//!     CertificateArn: !Ref Certificate
//! ```
//!
//! ## Module Tour
//!
//! ### 1. The Engine ([`cfn_framework`])
//! Validation, lifecycle routing, the polling retry loop and response reporting. Nothing in
//! it knows about certificates.
//!
//! ### 2. The Resources ([`resources`])
//! Concrete implementations of [`CustomResource`](cfn_framework::CustomResource), one per
//! resource type.
//!
//! ### 3. The Client Contract ([`acm`])
//! The certificate-manager calls the resources make, behind a region-aware factory, plus an
//! in-memory implementation.
//!
//! ### 4. The Orchestrator ([`lifecycle`])
//! Wires factory, registry and handler into a [`CertificateProvider`](lifecycle::CertificateProvider).
//!
//! ## Running locally
//!
//! ```bash
//! RUST_LOG=info cargo run -- event.json
//! ```

pub mod acm;
pub mod lifecycle;
pub mod resources;
