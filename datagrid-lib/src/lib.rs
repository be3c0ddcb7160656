//! Reactive list-view store for administration data grids
//!
//! A [`ListViewStore`] keeps the paging, locale, loaded rows, loading flag and
//! row selection of one list view in sync with a REST list endpoint.

pub mod cell;
pub mod client;
pub mod error;
pub mod metadata;
pub mod model;
pub mod query;
pub mod selection;
pub mod store;

mod builder;

pub use builder::Missing;
pub use builder::Set;
pub use cell::Cell;
pub use cell::Subscription;
pub use client::ResourceClient;
pub use client::RestResourceClient;
pub use metadata::FieldMap;
pub use metadata::InMemoryMetadata;
pub use metadata::MetadataProvider;
pub use query::ListQuery;
pub use selection::Selection;
pub use store::*;
