//! Test fixtures and builders for product models
//!
//! Import via `use crate::client::fixtures::*` in test modules.

#![allow(dead_code)]

use chrono::{DateTime, TimeZone, Utc};

use super::models::Product;

/// Builder for creating test Product instances.
///
/// # Example
/// ```ignore
/// let product = ProductBuilder::new("p1")
///     .name("Linen Shirt")
///     .price(49.0)
///     .build();
/// ```
#[derive(Debug, Clone)]
pub struct ProductBuilder {
    id: String,
    name: String,
    description: String,
    price: f64,
    image: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: Option<DateTime<Utc>>,
}

impl ProductBuilder {
    /// Create a new builder with the given ID.
    pub fn new(id: impl Into<String>) -> Self {
        let id = id.into();
        let created_at = Utc
            .with_ymd_and_hms(2025, 1, 15, 12, 0, 0)
            .single()
            .unwrap_or_else(Utc::now);
        Self {
            name: format!("Product {}", &id),
            description: format!("Description of {}", &id),
            id,
            price: 10.0,
            image: None,
            created_at,
            updated_at: None,
        }
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn price(mut self, price: f64) -> Self {
        self.price = price;
        self
    }

    pub fn image(mut self, image: impl Into<String>) -> Self {
        self.image = Some(image.into());
        self
    }

    pub fn updated_at(mut self, updated_at: DateTime<Utc>) -> Self {
        self.updated_at = Some(updated_at);
        self
    }

    /// Build the Product.
    pub fn build(self) -> Product {
        Product {
            id: self.id,
            name: self.name,
            description: self.description,
            price: self.price,
            image: self.image,
            created_at: self.created_at,
            updated_at: self.updated_at.unwrap_or(self.created_at),
        }
    }
}
