//! In-memory data source registry

use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::HashMap;
use tracing::info;

use cadence_core::{CoreError, DataSourceDescriptor, DataSourceId, DataSourceRegistry};

/// Registry holding descriptors in process memory
#[derive(Default)]
pub struct InMemoryDataSourceRegistry {
    descriptors: RwLock<HashMap<DataSourceId, DataSourceDescriptor>>,
}

impl InMemoryDataSourceRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry pre-populated with descriptors
    pub fn with_descriptors(descriptors: impl IntoIterator<Item = DataSourceDescriptor>) -> Result<Self, CoreError> {
        let registry = Self::new();
        for descriptor in descriptors {
            registry.register(descriptor)?;
        }
        Ok(registry)
    }

    /// Register a descriptor. Descriptors are immutable, so an id can only be registered once.
    pub fn register(&self, descriptor: DataSourceDescriptor) -> Result<(), CoreError> {
        let mut descriptors = self.descriptors.write();
        if descriptors.contains_key(&descriptor.id) {
            return Err(CoreError::ValidationError(format!(
                "data source already registered: {}",
                descriptor.id
            )));
        }

        info!(data_source_id = %descriptor.id, name = %descriptor.name, "Registered data source");
        descriptors.insert(descriptor.id.clone(), descriptor);
        Ok(())
    }

    /// Remove a descriptor. Returns whether it was present.
    pub fn unregister(&self, id: &DataSourceId) -> bool {
        self.descriptors.write().remove(id).is_some()
    }

    /// Number of registered descriptors
    pub fn len(&self) -> usize {
        self.descriptors.read().len()
    }

    /// Whether no descriptor is registered
    pub fn is_empty(&self) -> bool {
        self.descriptors.read().is_empty()
    }
}

#[async_trait]
impl DataSourceRegistry for InMemoryDataSourceRegistry {
    async fn find_by_id(&self, id: &DataSourceId) -> Result<Option<DataSourceDescriptor>, CoreError> {
        Ok(self.descriptors.read().get(id).cloned())
    }

    async fn list(&self) -> Result<Vec<DataSourceDescriptor>, CoreError> {
        let mut descriptors: Vec<_> = self.descriptors.read().values().cloned().collect();
        descriptors.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(descriptors)
    }
}
