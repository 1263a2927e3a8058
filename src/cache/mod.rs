//! In-memory query cache for product data
//!
//! [`QueryCache`] is the generic keyed store with subscriptions;
//! [`ProductCache`] binds it to product identities and a [`ProductApi`]
//! client.
//!
//! [`ProductApi`]: crate::client::ProductApi

pub mod key;
pub mod products;
pub mod query;

use std::time::Duration;

/// Cache behaviour shared by every entry
#[derive(Debug, Clone, Copy, Default)]
pub struct CacheOptions {
    /// Age after which a new subscription triggers a background refetch.
    /// `None` keeps values until they are invalidated.
    pub stale_time: Option<Duration>,
}

// Re-export main types
pub use key::ProductQuery;
pub use products::{ProductCache, ProductData, product_cache};
pub use query::{QueryCache, QueryKey, Snapshot, Subscription};
