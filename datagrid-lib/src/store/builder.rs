//! Typestate builder for [`ListViewStore`]

use std::sync::Arc;

use tokio::runtime::Handle;

use super::ListViewConfig;
use super::ListViewStore;
use crate::builder::Missing;
use crate::builder::Set;
use crate::client::ResourceClient;
use crate::error::Error;
use crate::error::StoreError;
use crate::metadata::MetadataProvider;

/// Builder for constructing a [`ListViewStore`].
///
/// Uses the typestate pattern to ensure required fields are set at compile time.
///
/// # Required Fields
///
/// - `config` - The caller-owned page (and optional locale) cells
/// - `client` - A [`ResourceClient`] implementation
/// - `metadata` - A [`MetadataProvider`] implementation
///
/// # Example
///
/// ```ignore
/// let store = ListViewStore::builder("snippets")
///     .config(ListViewConfig::new(page.clone()).with_locale(locale.clone()))
///     .client(rest_client)
///     .metadata(metadata)
///     .build()?;
/// ```
pub struct ListViewStoreBuilder<Config, Client, Metadata> {
    resource_key: String,
    config: Config,
    client: Client,
    metadata: Metadata,
    runtime: Option<Handle>,
}

impl ListViewStoreBuilder<Missing, Missing, Missing> {
    /// Creates a new builder for a list of `resource_key`.
    pub fn new(resource_key: impl Into<String>) -> Self {
        Self {
            resource_key: resource_key.into(),
            config: Missing,
            client: Missing,
            metadata: Missing,
            runtime: None,
        }
    }
}

impl<C, M> ListViewStoreBuilder<Missing, C, M> {
    /// Sets the reactive inputs the store observes.
    pub fn config(self, config: ListViewConfig) -> ListViewStoreBuilder<Set<ListViewConfig>, C, M> {
        ListViewStoreBuilder {
            resource_key: self.resource_key,
            config: Set(config),
            client: self.client,
            metadata: self.metadata,
            runtime: self.runtime,
        }
    }
}

impl<P, M> ListViewStoreBuilder<P, Missing, M> {
    /// Sets the resource client used to fetch pages.
    pub fn client<T: ResourceClient + 'static>(
        self,
        client: T,
    ) -> ListViewStoreBuilder<P, Set<Arc<dyn ResourceClient>>, M> {
        ListViewStoreBuilder {
            resource_key: self.resource_key,
            config: self.config,
            client: Set(Arc::new(client) as Arc<dyn ResourceClient>),
            metadata: self.metadata,
            runtime: self.runtime,
        }
    }
}

impl<P, C> ListViewStoreBuilder<P, C, Missing> {
    /// Sets the metadata provider used by [`ListViewStore::get_fields`].
    pub fn metadata<T: MetadataProvider + 'static>(
        self,
        metadata: T,
    ) -> ListViewStoreBuilder<P, C, Set<Arc<dyn MetadataProvider>>> {
        ListViewStoreBuilder {
            resource_key: self.resource_key,
            config: self.config,
            client: self.client,
            metadata: Set(Arc::new(metadata) as Arc<dyn MetadataProvider>),
            runtime: self.runtime,
        }
    }
}

impl<P, C, M> ListViewStoreBuilder<P, C, M> {
    /// Sets the runtime request tasks are spawned on.
    ///
    /// Defaults to the runtime `build` is called from.
    pub fn runtime(mut self, runtime: Handle) -> Self {
        self.runtime = Some(runtime);
        self
    }
}

impl
    ListViewStoreBuilder<
        Set<ListViewConfig>,
        Set<Arc<dyn ResourceClient>>,
        Set<Arc<dyn MetadataProvider>>,
    >
{
    /// Builds the [`ListViewStore`] and starts observing its inputs.
    ///
    /// Nothing is fetched until the page or locale changes, or
    /// [`ListViewStore::send_request`] is called.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NoRuntime`] if no runtime handle was given and
    /// this is not called from within a tokio runtime.
    pub fn build(self) -> Result<ListViewStore, Error> {
        let runtime = match self.runtime {
            Some(runtime) => runtime,
            None => Handle::try_current().map_err(|_| StoreError::NoRuntime)?,
        };

        Ok(ListViewStore::new(
            self.resource_key,
            self.config.0,
            self.client.0,
            self.metadata.0,
            runtime,
        ))
    }
}
