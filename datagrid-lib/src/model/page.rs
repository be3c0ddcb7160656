//! Page type for list results.

use super::Row;

/// One page of list results plus the total page count.
///
/// # Example
///
/// ```
/// use datagrid_lib::model::{PageResult, Row};
///
/// let page = PageResult::new(vec![Row::with_id(1), Row::with_id(2)]).with_page_count(3);
///
/// assert_eq!(page.len(), 2);
/// assert_eq!(page.page_count(), Some(3));
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageResult {
    rows: Vec<Row>,
    /// Total number of pages, if the backend reported it.
    page_count: Option<u32>,
}

impl PageResult {
    /// Creates a new page with rows and no page count.
    pub fn new(rows: Vec<Row>) -> Self {
        Self {
            rows,
            page_count: None,
        }
    }

    /// Sets the total page count.
    pub fn with_page_count(mut self, page_count: u32) -> Self {
        self.page_count = Some(page_count);
        self
    }

    /// Returns a reference to the rows in this page.
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Consumes the page and returns the rows.
    pub fn into_rows(self) -> Vec<Row> {
        self.rows
    }

    /// Consumes the page and returns rows and page count.
    pub fn into_parts(self) -> (Vec<Row>, Option<u32>) {
        (self.rows, self.page_count)
    }

    /// Returns the total page count, if the backend reported it.
    pub fn page_count(&self) -> Option<u32> {
        self.page_count
    }

    /// Returns `true` if this page has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Returns the number of rows in this page.
    pub fn len(&self) -> usize {
        self.rows.len()
    }
}
