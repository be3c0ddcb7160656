//! Error types

mod api;
mod store;

pub use api::*;
pub use store::*;

/// Top-level error for every fallible operation in this crate.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The resource client failed to fetch a page.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// The store could not be built or a request task failed.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Field definitions could not be decoded.
    #[error("Invalid field metadata: {0}")]
    Metadata(String),
}

impl Error {
    /// Returns the HTTP status code if this is an HTTP error.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Api(api) => api.status_code(),
            _ => None,
        }
    }
}
