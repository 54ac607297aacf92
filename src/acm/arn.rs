//! ARN helpers.

/// Extracts the region segment of an ARN (`arn:partition:service:region:account:resource`).
///
/// Returns `None` for global resources (empty region) and strings with too few segments.
pub fn region_from_arn(arn: &str) -> Option<&str> {
    arn.split(':').nth(3).filter(|region| !region.is_empty())
}
