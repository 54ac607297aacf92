//! # Property Validation
//!
//! Every resource type declares a [`ValidationSchema`]: an ordered allow-list of the
//! properties it reads, each with a [`PropertyRule`]. Applying the schema to the raw
//! `ResourceProperties` of a request does three things at once:
//!
//! - **Filtering**: properties the schema does not mention are dropped.
//! - **Completion**: transforms and default values are applied.
//! - **Checking**: required properties, allowed values and patterns are enforced, and *all*
//!   violations are collected into one [`ValidationError`].
//!
//! The same schema also answers the question an Update asks first: did any property that
//! forces replacement change?
//!
//! ```rust
//! use cfn_framework::validation::{PropertyRule, ValidationSchema};
//! use serde_json::json;
//!
//! let schema = ValidationSchema::builder()
//!     .property("Name", PropertyRule::required().pattern("^[a-z]+$"))
//!     .build()
//!     .unwrap();
//!
//! let raw = json!({ "Name": "abc", "ServiceToken": "arn:..." });
//! let validated = schema.validate(raw.as_object().unwrap()).unwrap();
//! assert_eq!(validated.len(), 1);
//! ```

use crate::error::SchemaError;
use regex::Regex;
use serde_json::Value;
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

/// A flat property map as carried by CloudFormation requests.
pub type Properties = serde_json::Map<String, Value>;

/// Value rewrite applied before any other rule. Receives `None` when the property is absent.
pub type Transform = Arc<dyn Fn(Option<Value>) -> Option<Value> + Send + Sync>;

/// Declarative constraints for a single property.
#[derive(Clone, Default)]
pub struct PropertyRule {
    required: bool,
    forces_replacement: bool,
    allowed_values: Option<Vec<String>>,
    pattern: Option<String>,
    default_value: Option<Value>,
    transform: Option<Transform>,
}

impl PropertyRule {
    pub fn required() -> Self {
        Self {
            required: true,
            ..Self::default()
        }
    }

    pub fn optional() -> Self {
        Self::default()
    }

    /// A changed value on Update replaces the resource instead of updating it in place.
    pub fn forces_replacement(mut self) -> Self {
        self.forces_replacement = true;
        self
    }

    /// Restricts string values to a fixed set.
    pub fn one_of<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allowed_values = Some(values.into_iter().map(Into::into).collect());
        self
    }

    /// String values must match this regular expression. Compiled by [`SchemaBuilder::build`].
    pub fn pattern(mut self, pattern: impl Into<String>) -> Self {
        self.pattern = Some(pattern.into());
        self
    }

    pub fn default_value(mut self, value: impl Into<Value>) -> Self {
        self.default_value = Some(value.into());
        self
    }

    pub fn transform<F>(mut self, f: F) -> Self
    where
        F: Fn(Option<Value>) -> Option<Value> + Send + Sync + 'static,
    {
        self.transform = Some(Arc::new(f));
        self
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    pub fn is_replacing(&self) -> bool {
        self.forces_replacement
    }
}

impl fmt::Debug for PropertyRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PropertyRule")
            .field("required", &self.required)
            .field("forces_replacement", &self.forces_replacement)
            .field("allowed_values", &self.allowed_values)
            .field("pattern", &self.pattern)
            .field("default_value", &self.default_value)
            .field("transform", &self.transform.is_some())
            .finish()
    }
}

#[derive(Debug, Clone)]
struct SchemaEntry {
    name: String,
    rule: PropertyRule,
    pattern: Option<Regex>,
}

/// Collects property declarations; see [`ValidationSchema::builder`].
#[derive(Debug, Default)]
pub struct SchemaBuilder {
    entries: Vec<(String, PropertyRule)>,
}

impl SchemaBuilder {
    pub fn property(mut self, name: impl Into<String>, rule: PropertyRule) -> Self {
        self.entries.push((name.into(), rule));
        self
    }

    /// Compiles all patterns. Fails on an invalid pattern or a name declared twice.
    pub fn build(self) -> Result<ValidationSchema, SchemaError> {
        let mut seen = HashSet::new();
        let mut entries = Vec::with_capacity(self.entries.len());
        for (name, rule) in self.entries {
            if !seen.insert(name.clone()) {
                return Err(SchemaError::DuplicateProperty(name));
            }
            let pattern = match &rule.pattern {
                Some(source) => Some(Regex::new(source).map_err(|source| {
                    SchemaError::InvalidPattern {
                        property: name.clone(),
                        source,
                    }
                })?),
                None => None,
            };
            entries.push(SchemaEntry {
                name,
                rule,
                pattern,
            });
        }
        Ok(ValidationSchema { entries })
    }
}

/// Ordered allow-list of the properties a resource type accepts.
#[derive(Debug, Clone)]
pub struct ValidationSchema {
    entries: Vec<SchemaEntry>,
}

impl ValidationSchema {
    pub fn builder() -> SchemaBuilder {
        SchemaBuilder::default()
    }

    /// Property names in declaration order.
    pub fn property_names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.name.as_str())
    }

    pub fn rule(&self, name: &str) -> Option<&PropertyRule> {
        self.entries.iter().find(|e| e.name == name).map(|e| &e.rule)
    }

    /// Applies the schema to raw request properties.
    ///
    /// Returns only schema properties. Fails with every violation found, in declaration order.
    pub fn validate(&self, raw: &Properties) -> Result<Properties, ValidationError> {
        let mut output = Properties::new();
        let mut violations = Vec::new();

        for entry in &self.entries {
            let Some(value) = entry.resolve(raw) else {
                if entry.rule.required {
                    violations.push(Violation::Missing {
                        property: entry.name.clone(),
                    });
                }
                continue;
            };

            if let Value::String(text) = &value {
                let before = violations.len();
                entry.check_string(text, &mut violations);
                if violations.len() > before {
                    continue;
                }
            }

            output.insert(entry.name.clone(), value);
        }

        if violations.is_empty() {
            Ok(output)
        } else {
            Err(ValidationError { violations })
        }
    }

    /// Applies transforms, defaults and the allow-list without checking anything.
    ///
    /// Used for `OldResourceProperties`, which an earlier invocation already accepted.
    pub fn normalize(&self, raw: &Properties) -> Properties {
        self.entries
            .iter()
            .filter_map(|entry| entry.resolve(raw).map(|v| (entry.name.clone(), v)))
            .collect()
    }

    /// True iff a property flagged `forces_replacement` differs between the two sets.
    pub fn requires_replacement(&self, new: &Properties, old: &Properties) -> bool {
        self.replacing_changes(new, old).next().is_some()
    }

    /// Names of the replacing properties that differ, in declaration order.
    pub fn replacing_changes<'a>(
        &'a self,
        new: &'a Properties,
        old: &'a Properties,
    ) -> impl Iterator<Item = &'a str> + 'a {
        self.entries
            .iter()
            .filter(|e| e.rule.forces_replacement)
            .filter(move |e| new.get(&e.name) != old.get(&e.name))
            .map(|e| e.name.as_str())
    }
}

impl SchemaEntry {
    /// Transform, then default. JSON `null` counts as absent.
    fn resolve(&self, raw: &Properties) -> Option<Value> {
        let mut value = raw.get(&self.name).filter(|v| !v.is_null()).cloned();
        if let Some(transform) = &self.rule.transform {
            value = transform(value).filter(|v| !v.is_null());
        }
        value.or_else(|| self.rule.default_value.clone())
    }

    fn check_string(&self, text: &str, violations: &mut Vec<Violation>) {
        if let Some(allowed) = &self.rule.allowed_values {
            if !allowed.iter().any(|a| a == text) {
                violations.push(Violation::NotAllowed {
                    property: self.name.clone(),
                    allowed: allowed.clone(),
                    given: text.to_string(),
                });
            }
        }
        if let Some(pattern) = &self.pattern {
            if !pattern.is_match(text) {
                violations.push(Violation::PatternMismatch {
                    property: self.name.clone(),
                    pattern: pattern.as_str().to_string(),
                });
            }
        }
    }
}

/// A single broken rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Violation {
    Missing {
        property: String,
    },
    NotAllowed {
        property: String,
        allowed: Vec<String>,
        given: String,
    },
    PatternMismatch {
        property: String,
        pattern: String,
    },
}

impl Violation {
    pub fn property(&self) -> &str {
        match self {
            Violation::Missing { property }
            | Violation::NotAllowed { property, .. }
            | Violation::PatternMismatch { property, .. } => property,
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Violation::Missing { property } => {
                write!(f, "The property '{property}' is required.")
            }
            Violation::NotAllowed {
                property,
                allowed,
                given,
            } => write!(
                f,
                "The property {property} must be one of: {}. '{given}' given.",
                allowed.join(", ")
            ),
            Violation::PatternMismatch { property, pattern } => write!(
                f,
                "The property {property} doesn't match the required format. Pattern: '{pattern}'."
            ),
        }
    }
}

/// All violations found while validating one property map.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    violations: Vec<Violation>,
}

impl ValidationError {
    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Error: ")?;
        for (i, violation) in self.violations.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{violation}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}
