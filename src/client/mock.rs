//! Mock product store client for testing
//!
//! Keeps products in memory, counts calls, and can inject one-shot errors
//! and per-call latency so tests can script overlapping requests.

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Mutex;

use super::{Product, ProductApi, ProductDraft, ProductPatch};
use crate::error::{RemoteError, Result};

/// Mock API client for testing.
///
/// # Example
/// ```ignore
/// let mock = Arc::new(MockProductClient::new().with_products(vec![a, b]).await);
/// let products = mock.list_products().await?;
/// assert_eq!(mock.call_counts().await.list_products, 1);
/// ```
#[derive(Default)]
pub struct MockProductClient {
    /// Products the store currently holds
    products: Arc<Mutex<Vec<Product>>>,
    /// Error to return (if any) - consumed on first use
    error: Arc<Mutex<Option<RemoteError>>>,
    /// Latency applied to successive calls, in call order
    delays: Arc<Mutex<VecDeque<Duration>>>,
    /// Track number of calls for verification
    call_count: Arc<Mutex<CallCounts>>,
    /// Captured requests for test assertions
    captured_requests: Arc<Mutex<Vec<CapturedRequest>>>,
    /// Counter for store-assigned ids
    next_id: Arc<Mutex<usize>>,
}

/// Tracks API call counts for test verification
#[derive(Default, Debug, Clone, PartialEq, Eq)]
pub struct CallCounts {
    pub list_products: usize,
    pub get_product: usize,
    pub create_product: usize,
    pub update_product: usize,
    pub delete_product: usize,
    pub search_products: usize,
}

impl CallCounts {
    /// Get total number of API calls made.
    pub fn total(&self) -> usize {
        self.list_products
            + self.get_product
            + self.create_product
            + self.update_product
            + self.delete_product
            + self.search_products
    }
}

/// A captured API request for test assertions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedRequest {
    /// The API method called (e.g., "get_product", "search_products")
    pub method: String,
    /// Product id or search text, when the call has one
    pub arg: Option<String>,
}

impl MockProductClient {
    /// Create a new mock client with an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the store.
    pub async fn with_products(self, products: Vec<Product>) -> Self {
        *self.products.lock().await = products;
        self
    }

    /// Configure an error to return on the next API call.
    pub async fn with_error(self, error: RemoteError) -> Self {
        self.fail_next(error).await;
        self
    }

    /// Configure latency for the next calls, one entry per call.
    pub async fn with_delays(self, delays: Vec<Duration>) -> Self {
        self.delays.lock().await.extend(delays);
        self
    }

    /// Make the next API call fail. The error is consumed after one use.
    pub async fn fail_next(&self, error: RemoteError) {
        *self.error.lock().await = Some(error);
    }

    /// Queue latency for the next call.
    pub async fn delay_next(&self, delay: Duration) {
        self.delays.lock().await.push_back(delay);
    }

    /// Replace the store contents directly, bypassing call counting.
    pub async fn set_products(&self, products: Vec<Product>) {
        *self.products.lock().await = products;
    }

    /// Current store contents.
    pub async fn products(&self) -> Vec<Product> {
        self.products.lock().await.clone()
    }

    /// Get the call counts for verification in tests.
    pub async fn call_counts(&self) -> CallCounts {
        self.call_count.lock().await.clone()
    }

    /// Get all captured requests for test assertions.
    pub async fn captured_requests(&self) -> Vec<CapturedRequest> {
        self.captured_requests.lock().await.clone()
    }

    /// Record the call, then apply scripted latency and any pending error.
    async fn begin(
        &self,
        method: &str,
        arg: Option<&str>,
        bump: impl FnOnce(&mut CallCounts),
    ) -> Result<()> {
        bump(&mut *self.call_count.lock().await);
        self.captured_requests.lock().await.push(CapturedRequest {
            method: method.to_string(),
            arg: arg.map(|s| s.to_string()),
        });

        if let Some(e) = self.error.lock().await.take() {
            return Err(e.into());
        }

        let delay = self.delays.lock().await.pop_front();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        Ok(())
    }
}

#[async_trait]
impl ProductApi for MockProductClient {
    async fn list_products(&self) -> Result<Vec<Product>> {
        // Read before the scripted latency so a slow call returns older data.
        let snapshot = self.products.lock().await.clone();
        self.begin("list_products", None, |c| c.list_products += 1)
            .await?;
        Ok(snapshot)
    }

    async fn get_product(&self, id: &str) -> Result<Product> {
        let found = self
            .products
            .lock()
            .await
            .iter()
            .find(|p| p.id == id)
            .cloned();
        self.begin("get_product", Some(id), |c| c.get_product += 1)
            .await?;
        found.ok_or_else(|| RemoteError::NotFound(format!("Product {}", id)).into())
    }

    async fn create_product(&self, draft: &ProductDraft) -> Result<Product> {
        self.begin("create_product", Some(&draft.name), |c| {
            c.create_product += 1
        })
        .await?;

        let id = {
            let mut next = self.next_id.lock().await;
            *next += 1;
            format!("new-{}", *next)
        };
        let now = Utc::now();
        let product = Product {
            id,
            name: draft.name.clone(),
            description: draft.description.clone(),
            price: draft.price,
            image: draft.image.clone(),
            created_at: now,
            updated_at: now,
        };
        self.products.lock().await.insert(0, product.clone());
        Ok(product)
    }

    async fn update_product(&self, id: &str, patch: &ProductPatch) -> Result<Product> {
        self.begin("update_product", Some(id), |c| c.update_product += 1)
            .await?;

        let mut products = self.products.lock().await;
        let product = products
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| RemoteError::NotFound(format!("Product {}", id)))?;
        if let Some(ref name) = patch.name {
            product.name = name.clone();
        }
        if let Some(ref description) = patch.description {
            product.description = description.clone();
        }
        if let Some(price) = patch.price {
            product.price = price;
        }
        if let Some(ref image) = patch.image {
            product.image = image.clone();
        }
        product.updated_at = Utc::now();
        Ok(product.clone())
    }

    async fn delete_product(&self, id: &str) -> Result<()> {
        self.begin("delete_product", Some(id), |c| c.delete_product += 1)
            .await?;

        let mut products = self.products.lock().await;
        let before = products.len();
        products.retain(|p| p.id != id);
        if products.len() == before {
            return Err(RemoteError::NotFound(format!("Product {}", id)).into());
        }
        Ok(())
    }

    async fn search_products(&self, query: &str) -> Result<Vec<Product>> {
        let needle = query.trim().to_lowercase();
        let snapshot = self.products.lock().await.clone();
        self.begin("search_products", Some(query), |c| {
            c.search_products += 1
        })
        .await?;
        Ok(snapshot.into_iter().filter(|p| p.matches(&needle)).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::fixtures::ProductBuilder;

    #[tokio::test]
    async fn test_mock_counts_and_captures() {
        let mock = MockProductClient::new()
            .with_products(vec![ProductBuilder::new("p1").build()])
            .await;

        mock.get_product("p1").await.unwrap();
        mock.search_products("shirt").await.unwrap();

        let counts = mock.call_counts().await;
        assert_eq!(counts.get_product, 1);
        assert_eq!(counts.search_products, 1);
        assert_eq!(counts.total(), 2);

        let requests = mock.captured_requests().await;
        assert_eq!(requests[1].arg.as_deref(), Some("shirt"));
    }

    #[tokio::test]
    async fn test_mock_error_is_consumed_once() {
        let mock = MockProductClient::new()
            .with_error(RemoteError::ServerError("boom".to_string()))
            .await;

        assert!(mock.list_products().await.is_err());
        assert!(mock.list_products().await.is_ok());
    }

    #[tokio::test]
    async fn test_mock_crud_round() {
        let mock = MockProductClient::new();
        let created = mock
            .create_product(&ProductDraft::new("Tee", "Cotton", 10.0))
            .await
            .unwrap();
        let updated = mock
            .update_product(&created.id, &ProductPatch::new().price(12.0))
            .await
            .unwrap();
        assert_eq!(updated.price, 12.0);

        mock.delete_product(&created.id).await.unwrap();
        assert!(mock.products().await.is_empty());
        assert!(mock.get_product(&created.id).await.is_err());
    }
}
