//! List query parameters

use std::collections::BTreeMap;

use serde::Serialize;

/// Query sent to a [`ResourceClient`](crate::ResourceClient) for one list page.
///
/// Keys whose value is undefined are never emitted: a query without a locale
/// has no `locale` entry at all, neither in [`ListQuery::to_pairs`] nor when
/// serialized.
///
/// # Example
///
/// ```
/// use datagrid_lib::ListQuery;
///
/// let query = ListQuery::new().page(2).locale("de").param("sortBy", "title");
///
/// assert_eq!(
///     query.to_pairs(),
///     vec![
///         ("page".to_string(), "2".to_string()),
///         ("locale".to_string(), "de".to_string()),
///         ("sortBy".to_string(), "title".to_string()),
///     ]
/// );
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ListQuery {
    /// 1-based page number.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,

    /// Content locale.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub locale: Option<String>,

    /// Additional filter parameters, passed through unchanged.
    #[serde(flatten)]
    pub params: BTreeMap<String, String>,
}

impl ListQuery {
    /// Creates an empty query.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the page number.
    pub fn page(mut self, page: u32) -> Self {
        self.page = Some(page);
        self
    }

    /// Sets or clears the page number.
    pub fn with_page(mut self, page: Option<u32>) -> Self {
        self.page = page;
        self
    }

    /// Sets the locale.
    pub fn locale(mut self, locale: impl Into<String>) -> Self {
        self.locale = Some(locale.into());
        self
    }

    /// Sets or clears the locale.
    pub fn with_locale(mut self, locale: Option<String>) -> Self {
        self.locale = locale;
        self
    }

    /// Adds an extra parameter.
    pub fn param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    /// Returns `true` if the query carries `key`.
    pub fn contains(&self, key: &str) -> bool {
        match key {
            "page" => self.page.is_some(),
            "locale" => self.locale.is_some(),
            _ => self.params.contains_key(key),
        }
    }

    /// Returns the query as ordered key/value pairs: page, locale, then
    /// extra parameters sorted by key.
    pub fn to_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::with_capacity(self.params.len() + 2);
        if let Some(page) = self.page {
            pairs.push(("page".to_string(), page.to_string()));
        }
        if let Some(locale) = &self.locale {
            pairs.push(("locale".to_string(), locale.clone()));
        }
        pairs.extend(self.params.iter().map(|(k, v)| (k.clone(), v.clone())));
        pairs
    }
}
