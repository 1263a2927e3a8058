//! Catalog admin - product catalog management for a hosted store
//!
//! The library holds the store client, the query cache with its mutation
//! and search helpers, and the CLI built on them.

pub mod cache;
pub mod catalog;
pub mod cli;
pub mod client;
pub mod config;
pub mod error;
pub mod models;
pub mod mutation;
pub mod output;
pub mod search;

pub use catalog::{Catalog, CatalogOptions};
pub use error::{Error, Result};
