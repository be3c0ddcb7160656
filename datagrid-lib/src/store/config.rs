//! List-view configuration

use crate::cell::Cell;

/// Reactive inputs a list view hands to its store.
///
/// The cells are owned by the caller: the store only observes them. Setting
/// `page` to a page number (or changing `locale` once a page is set) makes
/// the store fetch.
///
/// # Example
///
/// ```
/// use datagrid_lib::{Cell, ListViewConfig};
///
/// let page = Cell::new(None);
/// let locale = Cell::new(Some("en".to_string()));
/// let config = ListViewConfig::new(page.clone()).with_locale(locale);
///
/// assert!(config.locale.is_some());
/// ```
#[derive(Debug, Clone)]
pub struct ListViewConfig {
    /// Current page; `None` until the view is ready to load.
    pub page: Cell<Option<u32>>,

    /// Current content locale, for localized resources.
    pub locale: Option<Cell<Option<String>>>,
}

impl ListViewConfig {
    /// Creates a configuration observing only a page cell.
    pub fn new(page: Cell<Option<u32>>) -> Self {
        Self { page, locale: None }
    }

    /// Observes a locale cell as well.
    pub fn with_locale(mut self, locale: Cell<Option<String>>) -> Self {
        self.locale = Some(locale);
        self
    }
}
