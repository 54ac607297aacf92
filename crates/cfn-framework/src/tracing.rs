//! # Observability & Tracing
//!
//! Structured logging for the whole provider, configured through `RUST_LOG`.
//!
//! ```bash
//! RUST_LOG=info acm-custom-resource event.json    # one line per attempt and outcome
//! RUST_LOG=debug acm-custom-resource event.json   # validated properties, payload sizes
//! ```
//!
//! Every dispatch runs inside a `dispatch` span carrying `resource_type`, `request_type`
//! and `logical_id`, so retry lines read like:
//!
//! ```text
//! INFO dispatch: Pending attempt=3 remaining=52 resource_type=Custom::IssuedCertificate ...
//! ```
pub fn setup_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .compact()
        .init();
}
