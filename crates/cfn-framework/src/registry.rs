//! # Resource Registry
//!
//! Maps a `ResourceType` string to the implementation that handles it. Built once at
//! startup and shared read-only afterwards.

use crate::error::FrameworkError;
use crate::resource::CustomResource;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::warn;

#[derive(Clone, Default)]
pub struct ResourceRegistry {
    resources: HashMap<String, Arc<dyn CustomResource>>,
}

impl ResourceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `resource` under its own type name, replacing any earlier registration.
    pub fn register(&mut self, resource: Arc<dyn CustomResource>) {
        let resource_type = resource.resource_type().to_string();
        if self.resources.insert(resource_type.clone(), resource).is_some() {
            warn!(%resource_type, "Replaced existing registration");
        }
    }

    pub fn with(mut self, resource: impl CustomResource + 'static) -> Self {
        self.register(Arc::new(resource));
        self
    }

    /// Exact, case-sensitive lookup.
    pub fn resolve(&self, resource_type: &str) -> Result<Arc<dyn CustomResource>, FrameworkError> {
        self.resources
            .get(resource_type)
            .cloned()
            .ok_or_else(|| FrameworkError::UnknownResourceType(resource_type.to_string()))
    }

    pub fn resource_types(&self) -> impl Iterator<Item = &str> {
        self.resources.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.resources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }
}

impl std::fmt::Debug for ResourceRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut types: Vec<_> = self.resource_types().collect();
        types.sort_unstable();
        f.debug_struct("ResourceRegistry")
            .field("resource_types", &types)
            .finish()
    }
}
