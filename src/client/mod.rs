//! Product store client
//!
//! [`ProductApi`] is the request/response boundary to the remote store. It
//! performs no caching; see [`crate::cache`] for that.

use async_trait::async_trait;

use crate::error::Result;

#[cfg(test)]
pub mod fixtures;
#[cfg(test)]
pub mod mock;
pub mod models;
pub mod rest;

#[cfg(test)]
pub use mock::MockProductClient;
pub use models::{Product, ProductDraft, ProductForm, ProductPatch};
pub use rest::RestProductClient;

/// CRUD and search operations over the product collection.
///
/// No operation retries. `create_product` and `update_product` validate their
/// input before any network call.
#[async_trait]
pub trait ProductApi: Send + Sync {
    /// List every product, newest first.
    async fn list_products(&self) -> Result<Vec<Product>>;

    /// Fetch a single product by id.
    async fn get_product(&self, id: &str) -> Result<Product>;

    /// Create a product and return the stored row.
    async fn create_product(&self, draft: &ProductDraft) -> Result<Product>;

    /// Apply a partial update and return the stored row.
    async fn update_product(&self, id: &str, patch: &ProductPatch) -> Result<Product>;

    /// Delete a product.
    async fn delete_product(&self, id: &str) -> Result<()>;

    /// Case-insensitive substring search over name and description.
    ///
    /// The store has no text search, so the default implementation lists
    /// everything and filters locally.
    async fn search_products(&self, query: &str) -> Result<Vec<Product>> {
        let needle = query.trim().to_lowercase();
        let products = self.list_products().await?;
        if needle.is_empty() {
            return Ok(products);
        }
        Ok(products.into_iter().filter(|p| p.matches(&needle)).collect())
    }
}
