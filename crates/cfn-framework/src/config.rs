//! # Handler Configuration
//!
//! Tunables for the retry loop and the response reporter. The defaults keep the whole
//! polling window just under five minutes.
//!
//! | Variable | Default | Meaning |
//! |---|---|---|
//! | `CFN_MAX_ATTEMPTS` | 55 | Lifecycle attempts per invocation, first call included |
//! | `CFN_RETRY_DELAY_SECS` | 5 | Fixed wait between attempts |
//! | `CFN_REPORT_TIMEOUT_SECS` | 10 | Timeout of the callback PUT |

use std::str::FromStr;
use std::time::Duration;
use tracing::warn;

pub const DEFAULT_MAX_ATTEMPTS: u32 = 55;
pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_secs(5);
pub const DEFAULT_REPORT_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandlerConfig {
    pub max_attempts: u32,
    pub retry_delay: Duration,
    pub report_timeout: Duration,
}

impl Default for HandlerConfig {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            retry_delay: DEFAULT_RETRY_DELAY,
            report_timeout: DEFAULT_REPORT_TIMEOUT,
        }
    }
}

impl HandlerConfig {
    /// Reads overrides from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from any key lookup. Unparsable values keep their default.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let max_attempts: u32 = parse_or(&lookup, "CFN_MAX_ATTEMPTS", defaults.max_attempts);
        let delay_secs = parse_or(
            &lookup,
            "CFN_RETRY_DELAY_SECS",
            defaults.retry_delay.as_secs(),
        );
        let timeout_secs = parse_or(
            &lookup,
            "CFN_REPORT_TIMEOUT_SECS",
            defaults.report_timeout.as_secs(),
        );

        Self {
            max_attempts: max_attempts.max(1),
            retry_delay: Duration::from_secs(delay_secs),
            report_timeout: Duration::from_secs(timeout_secs),
        }
    }

    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts.max(1);
        self
    }

    pub fn with_retry_delay(mut self, retry_delay: Duration) -> Self {
        self.retry_delay = retry_delay;
        self
    }
}

fn parse_or<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> T
where
    T: FromStr + Copy,
{
    match lookup(key) {
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            warn!(key, value = %raw, "Ignoring unparsable setting");
            default
        }),
        None => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_match_the_polling_window() {
        let config = HandlerConfig::from_lookup(|_| None);
        assert_eq!(config, HandlerConfig::default());
        assert_eq!(config.max_attempts, 55);
        assert_eq!(config.retry_delay, Duration::from_secs(5));
    }

    #[test]
    fn overrides_and_fallbacks() {
        let config = HandlerConfig::from_lookup(lookup(&[
            ("CFN_MAX_ATTEMPTS", "3"),
            ("CFN_RETRY_DELAY_SECS", "soon"),
            ("CFN_REPORT_TIMEOUT_SECS", " 2 "),
        ]));
        assert_eq!(config.max_attempts, 3);
        assert_eq!(config.retry_delay, DEFAULT_RETRY_DELAY);
        assert_eq!(config.report_timeout, Duration::from_secs(2));
    }

    #[test]
    fn attempts_never_drop_below_one() {
        let config = HandlerConfig::from_lookup(lookup(&[("CFN_MAX_ATTEMPTS", "0")]));
        assert_eq!(config.max_attempts, 1);
        assert_eq!(HandlerConfig::default().with_max_attempts(0).max_attempts, 1);
    }
}
