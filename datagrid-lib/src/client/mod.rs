//! Resource clients
//!
//! A [`ResourceClient`] fetches one page of a list resource. The store calls
//! it synchronously and awaits the returned future on its own task, so an
//! implementation can record or start the request before the first poll.

mod hal;
mod rest;

pub use rest::*;

use std::sync::Arc;

use futures::future::BoxFuture;

use crate::error::Error;
use crate::model::PageResult;
use crate::query::ListQuery;

/// Fetches list pages for a resource key.
///
/// Errors are returned to the caller unchanged; the store does not catch or
/// retry them.
///
/// # Example
///
/// ```
/// use datagrid_lib::{ListQuery, ResourceClient};
/// use datagrid_lib::error::Error;
/// use datagrid_lib::model::{PageResult, Row};
/// use futures::future::{BoxFuture, FutureExt};
///
/// struct FixedClient;
///
/// impl ResourceClient for FixedClient {
///     fn get_list(
///         &self,
///         _resource_key: &str,
///         _query: &ListQuery,
///     ) -> BoxFuture<'static, Result<PageResult, Error>> {
///         async { Ok(PageResult::new(vec![Row::with_id(1)]).with_page_count(1)) }.boxed()
///     }
/// }
/// ```
pub trait ResourceClient: Send + Sync {
    /// Fetch the page described by `query` for `resource_key`.
    fn get_list(
        &self,
        resource_key: &str,
        query: &ListQuery,
    ) -> BoxFuture<'static, Result<PageResult, Error>>;
}

impl<T: ResourceClient + ?Sized> ResourceClient for Arc<T> {
    fn get_list(
        &self,
        resource_key: &str,
        query: &ListQuery,
    ) -> BoxFuture<'static, Result<PageResult, Error>> {
        (**self).get_list(resource_key, query)
    }
}
