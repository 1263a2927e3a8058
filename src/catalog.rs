//! Catalog session: one client, one cache, and the views built on them

use std::sync::Arc;
use std::time::Duration;

use crate::cache::{
    CacheOptions, ProductCache, ProductData, ProductQuery, QueryKey, Snapshot, product_cache,
};
use crate::client::{Product, ProductApi, RestProductClient};
use crate::config::Config;
use crate::error::{RemoteError, Result};
use crate::mutation::ProductMutations;
use crate::search::{DEFAULT_DEBOUNCE, SearchDebouncer};

/// Tuning for a [`Catalog`]
#[derive(Debug, Clone, Copy)]
pub struct CatalogOptions {
    pub cache: CacheOptions,
    pub debounce: Duration,
}

impl Default for CatalogOptions {
    fn default() -> Self {
        Self {
            cache: CacheOptions::default(),
            debounce: DEFAULT_DEBOUNCE,
        }
    }
}

impl From<&Config> for CatalogOptions {
    fn from(config: &Config) -> Self {
        Self {
            cache: config.cache_options(),
            debounce: config.debounce(),
        }
    }
}

/// Entry point tying the store client to a shared product cache.
///
/// Every view and mutation created from the same catalog shares one cache,
/// so a mutation refreshes whatever the other views are showing.
pub struct Catalog<C: ?Sized> {
    cache: ProductCache,
    mutations: ProductMutations<C>,
    debounce: Duration,
}

impl Catalog<RestProductClient> {
    /// Catalog backed by the configured REST store
    pub fn from_config(config: &Config) -> Result<Self> {
        let client = Arc::new(RestProductClient::from_config(config)?);
        Ok(Self::new(client, CatalogOptions::from(config)))
    }
}

impl<C: ProductApi + ?Sized + 'static> Catalog<C> {
    pub fn new(client: Arc<C>, options: CatalogOptions) -> Self {
        let cache = product_cache(Arc::clone(&client), options.cache);
        Self {
            mutations: ProductMutations::new(client, cache.clone()),
            cache,
            debounce: options.debounce,
        }
    }

    pub fn cache(&self) -> &ProductCache {
        &self.cache
    }

    pub fn mutations(&self) -> &ProductMutations<C> {
        &self.mutations
    }

    /// Search box bound to this catalog's cache
    pub fn search_debouncer<F>(&self, callback: F) -> SearchDebouncer
    where
        F: Fn(&Snapshot<ProductData>) + Send + Sync + 'static,
    {
        SearchDebouncer::new(self.cache.clone(), self.debounce, callback)
    }

    /// Load the full list through the cache.
    pub async fn products(&self) -> Result<Vec<Product>> {
        self.list(ProductQuery::All).await
    }

    /// Load search results for `text`; blank text lists everything.
    pub async fn search(&self, text: &str) -> Result<Vec<Product>> {
        self.list(ProductQuery::search(text)).await
    }

    /// Load one product through the cache.
    pub async fn product(&self, id: &str) -> Result<Product> {
        let query = ProductQuery::by_id(id);
        if !query.is_enabled() {
            return Err(RemoteError::NotFound("Product id is empty".to_string()).into());
        }
        let data = self.cache.settle(query).await.into_result()?;
        data.as_ref()
            .and_then(ProductData::as_product)
            .cloned()
            .ok_or_else(|| RemoteError::NotFound(format!("Product {}", id)).into())
    }

    async fn list(&self, query: ProductQuery) -> Result<Vec<Product>> {
        let data = self.cache.settle(query).await.into_result()?;
        Ok(data
            .as_ref()
            .and_then(ProductData::as_list)
            .map(<[Product]>::to_vec)
            .unwrap_or_default())
    }
}
