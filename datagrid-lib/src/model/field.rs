//! Field (column) definitions

use serde::Deserialize;
use serde::Serialize;

/// When a field is shown as a list column.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    /// Always shown; the user cannot hide it.
    Always,
    /// Shown by default.
    #[default]
    Yes,
    /// Hidden by default.
    No,
    /// Never shown as a column.
    Never,
}

/// Definition of one field of a resource, as delivered by a metadata provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldDefinition {
    /// Field name as it appears in rows.
    #[serde(default)]
    pub name: String,

    /// Human readable column label.
    #[serde(default)]
    pub label: Option<String>,

    /// Field type used by the view to pick a renderer (e.g. "string", "datetime").
    #[serde(rename = "type", default = "default_field_type")]
    pub field_type: String,

    /// Column visibility.
    #[serde(default)]
    pub visibility: Visibility,

    /// Whether the list can be sorted by this field.
    #[serde(default)]
    pub sortable: bool,
}

fn default_field_type() -> String {
    "string".to_string()
}

impl FieldDefinition {
    /// Creates a visible, unsortable string field.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            label: None,
            field_type: default_field_type(),
            visibility: Visibility::default(),
            sortable: false,
        }
    }

    /// Sets the label.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Sets the field type.
    pub fn with_type(mut self, field_type: impl Into<String>) -> Self {
        self.field_type = field_type.into();
        self
    }

    /// Sets the visibility.
    pub fn with_visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = visibility;
        self
    }

    /// Marks the field as sortable.
    pub fn sortable(mut self) -> Self {
        self.sortable = true;
        self
    }

    /// Returns `true` if the field is shown as a column by default.
    pub fn is_visible(&self) -> bool {
        matches!(self.visibility, Visibility::Always | Visibility::Yes)
    }
}
