//! Certificate resource types.
//!
//! | Resource type | Implementation |
//! |---|---|
//! | `Custom::Certificate` | [`Certificate`] |
//! | `Custom::IssuedCertificate` | [`IssuedCertificate`] |
//! | `Custom::CertificateDNSRecord` | [`CertificateDnsRecord`] |

pub mod certificate;
pub mod dns_record;
pub mod error;
pub mod issued_certificate;
pub mod patterns;

pub use certificate::Certificate;
pub use dns_record::CertificateDnsRecord;
pub use error::CertificateError;
pub use issued_certificate::IssuedCertificate;

use cfn_framework::Properties;
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Reads validated properties into the resource's typed view.
fn parse_properties<T: DeserializeOwned>(properties: &Properties) -> Result<T, CertificateError> {
    Ok(serde_json::from_value(Value::Object(properties.clone()))?)
}
