//! Row selection state.
//!
//! Selection is keyed by row identity, independent of which page is shown,
//! so rows selected on one page stay selected while paging through others.

use crate::model::RowId;

/// Ordered, duplicate-free set of selected row identities.
///
/// Identities keep the order in which they were selected.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    ids: Vec<RowId>,
}

impl Selection {
    /// Create a new empty selection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get all selected IDs in selection order.
    pub fn ids(&self) -> &[RowId] {
        &self.ids
    }

    /// Iterate over the selected IDs in selection order.
    pub fn iter(&self) -> impl Iterator<Item = &RowId> {
        self.ids.iter()
    }

    /// Check if an ID is selected.
    pub fn contains(&self, id: &RowId) -> bool {
        self.ids.contains(id)
    }

    /// Get the number of selected items.
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Check if nothing is selected.
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Append an ID unless it is already selected.
    /// Returns `true` if it was added.
    pub fn select(&mut self, id: RowId) -> bool {
        if self.contains(&id) {
            false
        } else {
            self.ids.push(id);
            true
        }
    }

    /// Remove an ID if it is selected.
    /// Returns `true` if it was removed.
    pub fn deselect(&mut self, id: &RowId) -> bool {
        match self.ids.iter().position(|selected| selected == id) {
            Some(index) => {
                self.ids.remove(index);
                true
            }
            None => false,
        }
    }

    /// Select every ID in order, skipping those already selected.
    /// Returns the IDs that were newly selected.
    pub fn select_all(&mut self, ids: impl IntoIterator<Item = RowId>) -> Vec<RowId> {
        let mut added = Vec::new();
        for id in ids {
            if self.select(id.clone()) {
                added.push(id);
            }
        }
        added
    }

    /// Deselect every given ID.
    /// Returns the IDs that were deselected.
    pub fn deselect_all(&mut self, ids: impl IntoIterator<Item = RowId>) -> Vec<RowId> {
        ids.into_iter().filter(|id| self.deselect(id)).collect()
    }

    /// Clear all selection.
    /// Returns the IDs that were deselected.
    pub fn clear(&mut self) -> Vec<RowId> {
        std::mem::take(&mut self.ids)
    }
}

impl FromIterator<RowId> for Selection {
    /// Builds a selection, keeping the first occurrence of duplicate IDs.
    fn from_iter<I: IntoIterator<Item = RowId>>(iter: I) -> Self {
        let mut selection = Self::new();
        selection.select_all(iter);
        selection
    }
}

impl<'a> IntoIterator for &'a Selection {
    type Item = &'a RowId;
    type IntoIter = std::slice::Iter<'a, RowId>;

    fn into_iter(self) -> Self::IntoIter {
        self.ids.iter()
    }
}
