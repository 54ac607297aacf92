//! Property patterns shared by the certificate resources.

/// A fully qualified domain name, optionally with a leading `*.` wildcard label.
pub const DOMAIN_NAME: &str = r"^(\*\.)?(?:[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?\.)+[A-Za-z0-9][A-Za-z0-9-]{0,61}[A-Za-z0-9]$";

/// ARN of an ACM certificate.
pub const ACM_CERTIFICATE_ARN: &str =
    r"arn:[\w+=/,.@-]+:acm:[\w+=/,.@-]*:[0-9]+:[\w+=,.@-]+(/[\w+=,.@-]+)*";

/// ARN of an ACM private certificate authority.
pub const ACM_PCA_ARN: &str =
    r"arn:[\w+=/,.@-]+:acm-pca:[\w+=/,.@-]*:[0-9]+:[\w+=,.@-]+(/[\w+=,.@-]+)*";

#[cfg(test)]
mod tests {
    use super::*;
    use regex::Regex;

    #[test]
    fn domain_name_pattern() {
        let re = Regex::new(DOMAIN_NAME).unwrap();
        for ok in ["example.com", "*.example.com", "a.b-c.example.co.uk", "x1.io"] {
            assert!(re.is_match(ok), "{ok}");
        }
        for bad in ["example", "-a.example.com", "a-.example.com", "*.*.example.com", "a..com"] {
            assert!(!re.is_match(bad), "{bad}");
        }
    }

    #[test]
    fn arn_patterns() {
        let acm = Regex::new(ACM_CERTIFICATE_ARN).unwrap();
        let pca = Regex::new(ACM_PCA_ARN).unwrap();
        let cert = "arn:aws:acm:eu-west-1:123456789012:certificate/0a1b2c3d-1111-2222-3333-444455556666";
        let ca = "arn:aws:acm-pca:eu-west-1:123456789012:certificate-authority/0a1b2c3d";

        assert!(acm.is_match(cert));
        assert!(!acm.is_match(ca));
        assert!(pca.is_match(ca));
        assert!(!pca.is_match(cert));
    }
}
