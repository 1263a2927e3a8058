//! Product mutations with cache invalidation
//!
//! Each operation makes exactly one store call. On success the list
//! identities (`All` and every cached search) are invalidated, plus the
//! single-product identity for updates and deletes. On failure the cache is
//! left untouched and the error goes back to the caller only.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::cache::{ProductCache, ProductQuery};
use crate::client::{Product, ProductApi, ProductDraft, ProductPatch};
use crate::error::Result;

/// Runs create/update/delete against the store and keeps the cache honest
pub struct ProductMutations<C: ?Sized> {
    client: Arc<C>,
    cache: ProductCache,
    pending: Arc<AtomicUsize>,
}

impl<C: ?Sized> Clone for ProductMutations<C> {
    fn clone(&self) -> Self {
        Self {
            client: Arc::clone(&self.client),
            cache: self.cache.clone(),
            pending: Arc::clone(&self.pending),
        }
    }
}

/// Counts a mutation as pending until dropped
struct PendingGuard(Arc<AtomicUsize>);

impl PendingGuard {
    fn new(counter: &Arc<AtomicUsize>) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        Self(Arc::clone(counter))
    }
}

impl Drop for PendingGuard {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

impl<C: ProductApi + ?Sized + 'static> ProductMutations<C> {
    pub fn new(client: Arc<C>, cache: ProductCache) -> Self {
        Self {
            client,
            cache,
            pending: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Whether any mutation is waiting on the store
    pub fn is_pending(&self) -> bool {
        self.pending.load(Ordering::SeqCst) > 0
    }

    pub async fn create_product(&self, draft: &ProductDraft) -> Result<Product> {
        draft.validate()?;
        let _pending = PendingGuard::new(&self.pending);

        match self.client.create_product(draft).await {
            Ok(product) => {
                log::info!("Product created successfully: {}", product.id);
                self.invalidate_after(None);
                Ok(product)
            }
            Err(err) => {
                log::warn!("Failed to create product: {}", err);
                Err(err)
            }
        }
    }

    pub async fn update_product(&self, id: &str, patch: &ProductPatch) -> Result<Product> {
        patch.validate()?;
        let _pending = PendingGuard::new(&self.pending);

        match self.client.update_product(id, patch).await {
            Ok(product) => {
                log::info!("Product updated successfully: {}", id);
                self.invalidate_after(Some(id));
                Ok(product)
            }
            Err(err) => {
                log::warn!("Failed to update product: {}", err);
                Err(err)
            }
        }
    }

    pub async fn delete_product(&self, id: &str) -> Result<()> {
        let _pending = PendingGuard::new(&self.pending);

        match self.client.delete_product(id).await {
            Ok(()) => {
                log::info!("Product deleted successfully: {}", id);
                self.invalidate_after(Some(id));
                Ok(())
            }
            Err(err) => {
                log::warn!("Failed to delete product: {}", err);
                Err(err)
            }
        }
    }

    /// Invalidate the identities a successful mutation can affect
    fn invalidate_after(&self, id: Option<&str>) -> Vec<ProductQuery> {
        let id = id.map(str::trim);
        let invalidated = self.cache.invalidate_where(|query| {
            query.is_collection() || (id.is_some() && query.product_id() == id)
        });
        log::debug!("Invalidated {:?}", invalidated);
        invalidated
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{CacheOptions, ProductData, product_cache};
    use crate::client::MockProductClient;
    use crate::client::fixtures::ProductBuilder;
    use crate::error::{Error, RemoteError, ValidationError};
    use std::time::Duration;

    type Fixture = (
        Arc<MockProductClient>,
        ProductCache,
        ProductMutations<MockProductClient>,
    );

    async fn setup(products: Vec<Product>) -> Fixture {
        let mock = Arc::new(MockProductClient::new().with_products(products).await);
        let cache = product_cache(Arc::clone(&mock), CacheOptions::default());
        let mutations = ProductMutations::new(Arc::clone(&mock), cache.clone());
        (mock, cache, mutations)
    }

    async fn wait(ms: u64) {
        tokio::time::sleep(Duration::from_millis(ms)).await;
    }

    fn list_of(cache: &ProductCache, query: &ProductQuery) -> Vec<Product> {
        cache
            .snapshot(query)
            .data()
            .and_then(ProductData::as_list)
            .map(<[Product]>::to_vec)
            .unwrap_or_default()
    }

    #[tokio::test(start_paused = true)]
    async fn test_update_invalidates_list_and_target_only() {
        let (_mock, cache, mutations) = setup(vec![
            ProductBuilder::new("p1").build(),
            ProductBuilder::new("p2").build(),
        ])
        .await;
        let _list = cache.subscribe(ProductQuery::All, |_| {});
        let _p1 = cache.subscribe(ProductQuery::by_id("p1"), |_| {});
        let _p2 = cache.subscribe(ProductQuery::by_id("p2"), |_| {});
        wait(10).await;

        mutations
            .update_product("p1", &ProductPatch::new().price(99.0))
            .await
            .unwrap();
        wait(10).await;

        assert_eq!(cache.fetch_count(&ProductQuery::All), Some(2));
        assert_eq!(cache.fetch_count(&ProductQuery::by_id("p1")), Some(2));
        assert_eq!(cache.fetch_count(&ProductQuery::by_id("p2")), Some(1));
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_create_leaves_cache_intact() {
        let (mock, cache, mutations) = setup(vec![ProductBuilder::new("p1").build()]).await;
        let _list = cache.subscribe(ProductQuery::All, |_| {});
        wait(10).await;
        let before = list_of(&cache, &ProductQuery::All);

        mock.fail_next(RemoteError::ServerError("insert failed".to_string()))
            .await;
        let err = mutations
            .create_product(&ProductDraft::new("Tee", "Cotton", 5.0))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Remote(RemoteError::ServerError(_))));
        wait(10).await;

        assert_eq!(list_of(&cache, &ProductQuery::All), before);
        assert_eq!(cache.fetch_count(&ProductQuery::All), Some(1));
        assert_eq!(mock.call_counts().await.list_products, 1);
        assert!(!mutations.is_pending());
    }

    #[tokio::test(start_paused = true)]
    async fn test_validation_fails_without_network_call() {
        let (mock, _cache, mutations) = setup(vec![]).await;

        let err = mutations
            .create_product(&ProductDraft::new("", "x", 5.0))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Validation(ValidationError::EmptyName)
        ));

        let err = mutations
            .update_product("p1", &ProductPatch::new().price(-3.0))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Validation(ValidationError::InvalidPrice(_))
        ));

        assert_eq!(mock.call_counts().await.total(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_edit_refreshes_list_and_detail() {
        let (mock, cache, mutations) = setup(vec![
            ProductBuilder::new("a").price(10.0).build(),
            ProductBuilder::new("b").price(20.0).build(),
        ])
        .await;
        let (_list, mut list_rx) = cache.subscribe_channel(ProductQuery::All);
        let _detail = cache.subscribe(ProductQuery::by_id("a"), |_| {});
        wait(10).await;
        assert_eq!(
            list_of(&cache, &ProductQuery::All)
                .iter()
                .map(|p| p.price)
                .collect::<Vec<_>>(),
            vec![10.0, 20.0]
        );

        let updated = mutations
            .update_product("a", &ProductPatch::new().price(12.5))
            .await
            .unwrap();
        assert_eq!(updated.price, 12.5);
        wait(10).await;

        let list = list_of(&cache, &ProductQuery::All);
        assert_eq!(list[0].id, "a");
        assert_eq!(list[0].price, 12.5);
        assert_eq!(list[1].id, "b");

        let detail = cache.snapshot(&ProductQuery::by_id("a"));
        assert_eq!(
            detail.data().and_then(ProductData::as_product).map(|p| p.price),
            Some(12.5)
        );

        // The list subscriber saw the refetch without re-subscribing.
        let mut last = None;
        while let Ok(snapshot) = list_rx.try_recv() {
            last = Some(snapshot);
        }
        let last = last.unwrap();
        assert!(!last.is_loading);
        assert_eq!(
            last.data().and_then(ProductData::as_list).unwrap()[0].price,
            12.5
        );
        assert_eq!(mock.call_counts().await.list_products, 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_create_invalidates_search_entries() {
        let (mock, cache, mutations) =
            setup(vec![ProductBuilder::new("p1").name("Linen Shirt").build()]).await;
        let _search = cache.subscribe(ProductQuery::search("linen"), |_| {});
        wait(10).await;
        assert_eq!(list_of(&cache, &ProductQuery::search("linen")).len(), 1);

        mutations
            .create_product(&ProductDraft::new("Linen Pants", "Relaxed fit", 80.0))
            .await
            .unwrap();
        wait(10).await;

        assert_eq!(list_of(&cache, &ProductQuery::search("linen")).len(), 2);
        assert_eq!(mock.call_counts().await.search_products, 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_delete_refetches_detail_into_not_found() {
        let (_mock, cache, mutations) = setup(vec![ProductBuilder::new("p1").build()]).await;
        let _detail = cache.subscribe(ProductQuery::by_id("p1"), |_| {});
        wait(10).await;

        mutations.delete_product("p1").await.unwrap();
        wait(10).await;

        let snapshot = cache.snapshot(&ProductQuery::by_id("p1"));
        assert!(matches!(
            snapshot.error.as_deref(),
            Some(Error::Remote(RemoteError::NotFound(_)))
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn test_is_pending_while_store_is_slow() {
        let (mock, _cache, mutations) = setup(vec![ProductBuilder::new("p1").build()]).await;
        mock.delay_next(Duration::from_millis(100)).await;

        let background = mutations.clone();
        let task = tokio::spawn(async move { background.delete_product("p1").await });
        wait(10).await;
        assert!(mutations.is_pending());

        task.await.unwrap().unwrap();
        assert!(!mutations.is_pending());
    }
}
