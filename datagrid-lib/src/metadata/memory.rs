//! In-memory metadata provider using DashMap

use std::collections::BTreeMap;
use std::sync::Arc;

use dashmap::DashMap;

use super::FieldMap;
use super::MetadataProvider;
use crate::error::Error;
use crate::model::FieldDefinition;

/// A metadata provider backed by a concurrent hash map.
///
/// Field maps are registered up front (from code or JSON) and returned as
/// shared `Arc`s. Unknown resource keys yield an empty map.
///
/// # Example
///
/// ```
/// use datagrid_lib::{InMemoryMetadata, MetadataProvider};
/// use datagrid_lib::model::FieldDefinition;
///
/// let metadata = InMemoryMetadata::new();
/// metadata.register("pages", [FieldDefinition::new("title").sortable()]);
///
/// assert!(metadata.get_fields("pages").contains_key("title"));
/// assert!(metadata.get_fields("unknown").is_empty());
/// ```
#[derive(Debug, Default)]
pub struct InMemoryMetadata {
    store: DashMap<String, FieldMap>,
    empty: FieldMap,
}

impl InMemoryMetadata {
    /// Creates a new empty provider.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers fields for a resource, keyed by their names.
    ///
    /// Replaces anything registered before for the same key.
    pub fn register(
        &self,
        resource_key: impl Into<String>,
        fields: impl IntoIterator<Item = FieldDefinition>,
    ) {
        let map: BTreeMap<String, FieldDefinition> = fields
            .into_iter()
            .map(|field| (field.name.clone(), field))
            .collect();
        self.register_map(resource_key, Arc::new(map));
    }

    /// Registers an already shared field map for a resource.
    pub fn register_map(&self, resource_key: impl Into<String>, fields: FieldMap) {
        self.store.insert(resource_key.into(), fields);
    }

    /// Registers fields from a JSON object mapping field name to definition.
    ///
    /// Definitions without a `name` take the object key as their name.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Metadata`] if `json` is not such an object.
    pub fn register_json(&self, resource_key: impl Into<String>, json: &str) -> Result<(), Error> {
        let parsed: BTreeMap<String, FieldDefinition> =
            serde_json::from_str(json).map_err(|e| Error::Metadata(e.to_string()))?;

        let map = parsed
            .into_iter()
            .map(|(name, mut field)| {
                if field.name.is_empty() {
                    field.name = name.clone();
                }
                (name, field)
            })
            .collect();
        self.register_map(resource_key, Arc::new(map));
        Ok(())
    }

    /// Removes the fields registered for a resource.
    pub fn remove(&self, resource_key: &str) -> Option<FieldMap> {
        self.store.remove(resource_key).map(|(_, fields)| fields)
    }

    /// Returns the number of registered resources.
    pub fn len(&self) -> usize {
        self.store.len()
    }

    /// Returns `true` if no resource is registered.
    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }
}

impl MetadataProvider for InMemoryMetadata {
    fn get_fields(&self, resource_key: &str) -> FieldMap {
        self.store
            .get(resource_key)
            .map(|entry| Arc::clone(entry.value()))
            .unwrap_or_else(|| Arc::clone(&self.empty))
    }
}
