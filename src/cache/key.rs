//! Query identities for the product collection

use std::fmt;

use super::query::QueryKey;

/// Identity of one cacheable product result set
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ProductQuery {
    /// Every product
    All,
    /// A single product by id
    ById(String),
    /// Products whose name or description contains the text
    Search(String),
}

impl ProductQuery {
    pub fn by_id(id: impl Into<String>) -> Self {
        ProductQuery::ById(id.into().trim().to_string())
    }

    /// Identity for a search box value.
    ///
    /// The text is trimmed and lowercased since matching is case-insensitive;
    /// an empty result is the same as [`ProductQuery::All`].
    pub fn search(text: &str) -> Self {
        let normalized = text.trim().to_lowercase();
        if normalized.is_empty() {
            ProductQuery::All
        } else {
            ProductQuery::Search(normalized)
        }
    }

    /// Whether the result is a list view over the collection
    pub fn is_collection(&self) -> bool {
        matches!(self, ProductQuery::All | ProductQuery::Search(_))
    }

    /// Product id for single-product identities
    pub fn product_id(&self) -> Option<&str> {
        match self {
            ProductQuery::ById(id) => Some(id.as_str()),
            _ => None,
        }
    }
}

impl QueryKey for ProductQuery {
    fn is_enabled(&self) -> bool {
        match self {
            ProductQuery::ById(id) => !id.trim().is_empty(),
            _ => true,
        }
    }
}

impl fmt::Display for ProductQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProductQuery::All => write!(f, "products"),
            ProductQuery::ById(id) => write!(f, "products/{}", id),
            ProductQuery::Search(text) => write!(f, "products?search={}", text),
        }
    }
}
