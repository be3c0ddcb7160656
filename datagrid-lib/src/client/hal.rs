//! HAL list envelope parsing

use serde::Deserialize;
use serde_json::Map;
use serde_json::Value;

use crate::error::ApiError;
use crate::model::PageResult;
use crate::model::Row;

/// List response body: `{"pages": N, "_embedded": {"<resource_key>": [...]}}`.
#[derive(Debug, Default, Deserialize)]
struct ListEnvelope {
    #[serde(default)]
    pages: Option<u32>,
    #[serde(rename = "_embedded", default)]
    embedded: Option<Map<String, Value>>,
}

/// Parses a list response body for `resource_key`.
///
/// Only the entry for `resource_key` is decoded; other `_embedded` entries
/// may have any shape. An empty body, a missing or null `_embedded` object
/// or a missing or null entry for the resource key all yield an empty page;
/// a missing `pages` leaves the page count unset.
pub(crate) fn parse_list(resource_key: &str, body: &str) -> Result<PageResult, ApiError> {
    if body.trim().is_empty() {
        return Ok(PageResult::default());
    }

    let mut envelope: ListEnvelope = serde_json::from_str(body)
        .map_err(|e| ApiError::parse_with_body(e.to_string(), body))?;

    let entry = envelope
        .embedded
        .as_mut()
        .and_then(|embedded| embedded.remove(resource_key));
    let rows = match entry {
        None | Some(Value::Null) => Vec::new(),
        Some(value) => serde_json::from_value::<Vec<Row>>(value)
            .map_err(|e| ApiError::parse_with_body(e.to_string(), body))?,
    };
    let page = PageResult::new(rows);
    Ok(match envelope.pages {
        Some(pages) => page.with_page_count(pages),
        None => page,
    })
}
