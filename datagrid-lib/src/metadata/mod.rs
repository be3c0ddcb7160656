//! Field metadata providers
//!
//! A [`MetadataProvider`] tells the view which fields (columns) a resource
//! has. The store hands its answer through unchanged.

mod memory;

pub use memory::*;

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::model::FieldDefinition;

/// Field definitions of one resource, keyed by field name.
///
/// Shared, so a provider can hand out the same map to every caller.
pub type FieldMap = Arc<BTreeMap<String, FieldDefinition>>;

/// Looks up field definitions by resource key.
pub trait MetadataProvider: Send + Sync {
    /// Returns the field definitions for `resource_key`.
    fn get_fields(&self, resource_key: &str) -> FieldMap;
}

impl<T: MetadataProvider + ?Sized> MetadataProvider for Arc<T> {
    fn get_fields(&self, resource_key: &str) -> FieldMap {
        (**self).get_fields(resource_key)
    }
}
