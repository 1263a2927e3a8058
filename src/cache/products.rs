//! Product query cache bound to a [`ProductApi`] client

use std::sync::Arc;

use super::key::ProductQuery;
use super::query::QueryCache;
use super::CacheOptions;
use crate::client::{Product, ProductApi};
use crate::error::{RemoteError, Result};

/// Cached value of a product identity
#[derive(Debug, Clone, PartialEq)]
pub enum ProductData {
    List(Arc<Vec<Product>>),
    Single(Arc<Product>),
}

impl ProductData {
    pub fn as_list(&self) -> Option<&[Product]> {
        match self {
            ProductData::List(products) => Some(products.as_slice()),
            ProductData::Single(_) => None,
        }
    }

    pub fn as_product(&self) -> Option<&Product> {
        match self {
            ProductData::Single(product) => Some(product.as_ref()),
            ProductData::List(_) => None,
        }
    }
}

/// Query cache over product identities
pub type ProductCache = QueryCache<ProductQuery, ProductData>;

/// Build a product cache that loads through `client`.
pub fn product_cache<C>(client: Arc<C>, options: CacheOptions) -> ProductCache
where
    C: ProductApi + ?Sized + 'static,
{
    QueryCache::with_options(
        move |query| {
            let client = Arc::clone(&client);
            async move { load(client.as_ref(), query).await }
        },
        options,
    )
}

/// Resolve one product identity against the store.
pub async fn load<C>(client: &C, query: ProductQuery) -> Result<ProductData>
where
    C: ProductApi + ?Sized,
{
    match query {
        ProductQuery::All => Ok(ProductData::List(Arc::new(client.list_products().await?))),
        ProductQuery::Search(text) => Ok(ProductData::List(Arc::new(
            client.search_products(&text).await?,
        ))),
        ProductQuery::ById(id) => {
            let product = client.get_product(&id).await?;
            if product.id != id {
                return Err(RemoteError::InvalidResponse(format!(
                    "Requested product {} but received {}",
                    id, product.id
                ))
                .into());
            }
            Ok(ProductData::Single(Arc::new(product)))
        }
    }
}
