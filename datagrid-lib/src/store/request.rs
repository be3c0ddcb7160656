//! Handles for dispatched list requests

use tokio::task::JoinHandle;

use crate::error::Error;
use crate::error::StoreError;

/// What happened to a response once it arrived.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestOutcome {
    /// The response belonged to the latest request and was written to the store.
    Applied,
    /// A newer request was dispatched first; the response was dropped.
    Superseded,
    /// The store was destroyed; the response was dropped.
    Discarded,
}

impl RequestOutcome {
    /// Returns `true` if the response reached the store state.
    pub fn is_applied(&self) -> bool {
        matches!(self, Self::Applied)
    }
}

/// Handle to one dispatched list request.
///
/// Dropping the handle does not cancel the request; its response is still
/// applied to the store if it is the latest one.
#[derive(Debug)]
pub struct RequestHandle {
    token: Option<u64>,
    task: Option<JoinHandle<Result<RequestOutcome, Error>>>,
}

impl RequestHandle {
    pub(crate) fn new(token: u64, task: JoinHandle<Result<RequestOutcome, Error>>) -> Self {
        Self {
            token: Some(token),
            task: Some(task),
        }
    }

    /// A handle for a request that was never sent because the store is destroyed.
    pub(crate) fn discarded() -> Self {
        Self {
            token: None,
            task: None,
        }
    }

    /// The request token, or `None` if the request was never sent.
    pub fn token(&self) -> Option<u64> {
        self.token
    }

    /// Waits for the response and reports what happened to it.
    ///
    /// # Errors
    ///
    /// Returns the resource client's error unchanged, whether or not the
    /// failed request was still the latest one, and [`StoreError::Task`] if
    /// the request task panicked or was cancelled.
    pub async fn wait(self) -> Result<RequestOutcome, Error> {
        match self.task {
            Some(task) => task
                .await
                .map_err(|e| Error::from(StoreError::Task(e.to_string())))?,
            None => Ok(RequestOutcome::Discarded),
        }
    }
}
