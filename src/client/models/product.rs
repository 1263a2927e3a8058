//! Product models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Maximum product name length, in characters
pub const NAME_MAX_LEN: usize = 100;

/// Maximum product description length, in characters
pub const DESCRIPTION_MAX_LEN: usize = 1000;

/// Product resource as stored remotely
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Store-assigned identifier
    pub id: String,

    /// Product name
    pub name: String,

    /// Product description
    pub description: String,

    /// Price in USD
    pub price: f64,

    /// Image URL. `None` when the column is null.
    #[serde(default)]
    pub image: Option<String>,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    /// Last edit timestamp (equals `created_at` until the first edit)
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Case-insensitive substring match over name and description.
    ///
    /// `needle` must already be lowercased.
    pub fn matches(&self, needle: &str) -> bool {
        self.name.to_lowercase().contains(needle)
            || self.description.to_lowercase().contains(needle)
    }

    /// Whether the product has been edited since creation
    pub fn is_edited(&self) -> bool {
        self.updated_at > self.created_at
    }
}

/// Fields for creating a product. Server-assigned fields are omitted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductDraft {
    pub name: String,
    pub description: String,
    pub price: f64,
    #[serde(default)]
    pub image: Option<String>,
}

impl ProductDraft {
    pub fn new(name: impl Into<String>, description: impl Into<String>, price: f64) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            price,
            image: None,
        }
    }

    /// Set the image URL.
    pub fn image(mut self, image: impl Into<String>) -> Self {
        self.image = Some(image.into());
        self
    }

    /// Check every field before the draft is sent anywhere.
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_name(&self.name)?;
        validate_description(&self.description)?;
        validate_price(self.price)
    }
}

/// Partial update for a product.
///
/// Only `Some` fields are sent. `image` is tri-state: `None` leaves it
/// unchanged, `Some(None)` clears it, `Some(Some(url))` replaces it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<Option<String>>,
}

impl ProductPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn price(mut self, price: f64) -> Self {
        self.price = Some(price);
        self
    }

    pub fn image(mut self, image: impl Into<String>) -> Self {
        self.image = Some(Some(image.into()));
        self
    }

    pub fn clear_image(mut self) -> Self {
        self.image = Some(None);
        self
    }

    /// True when the patch would change nothing
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.price.is_none()
            && self.image.is_none()
    }

    /// Check the fields that are present.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if let Some(ref name) = self.name {
            validate_name(name)?;
        }
        if let Some(ref description) = self.description {
            validate_description(description)?;
        }
        if let Some(price) = self.price {
            validate_price(price)?;
        }
        Ok(())
    }
}

impl From<ProductDraft> for ProductPatch {
    /// Full replacement of every editable field, as the edit form submits it
    fn from(draft: ProductDraft) -> Self {
        Self {
            name: Some(draft.name),
            description: Some(draft.description),
            price: Some(draft.price),
            image: Some(draft.image),
        }
    }
}

/// Raw text input of the product form
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductForm {
    pub name: String,
    pub description: String,
    pub price: String,
    pub image: String,
}

impl ProductForm {
    /// Prefill the form from an existing product (edit page).
    pub fn from_product(product: &Product) -> Self {
        Self {
            name: product.name.clone(),
            description: product.description.clone(),
            price: product.price.to_string(),
            image: product.image.clone().unwrap_or_default(),
        }
    }

    /// Trim, parse and validate the form into a draft.
    ///
    /// An empty image field becomes `None`.
    pub fn parse(&self) -> Result<ProductDraft, ValidationError> {
        let name = self.name.trim();
        let description = self.description.trim();
        let price_text = self.price.trim();

        let price = price_text
            .parse::<f64>()
            .map_err(|_| ValidationError::InvalidPrice(price_text.to_string()))?;

        let image = self.image.trim();
        let draft = ProductDraft {
            name: name.to_string(),
            description: description.to_string(),
            price,
            image: (!image.is_empty()).then(|| image.to_string()),
        };
        draft.validate()?;
        Ok(draft)
    }
}

fn validate_name(name: &str) -> Result<(), ValidationError> {
    if name.trim().is_empty() {
        return Err(ValidationError::EmptyName);
    }
    let len = name.chars().count();
    if len > NAME_MAX_LEN {
        return Err(ValidationError::NameTooLong {
            len,
            max: NAME_MAX_LEN,
        });
    }
    Ok(())
}

fn validate_description(description: &str) -> Result<(), ValidationError> {
    if description.trim().is_empty() {
        return Err(ValidationError::EmptyDescription);
    }
    let len = description.chars().count();
    if len > DESCRIPTION_MAX_LEN {
        return Err(ValidationError::DescriptionTooLong {
            len,
            max: DESCRIPTION_MAX_LEN,
        });
    }
    Ok(())
}

fn validate_price(price: f64) -> Result<(), ValidationError> {
    if !price.is_finite() || price < 0.0 {
        return Err(ValidationError::InvalidPrice(price.to_string()));
    }
    Ok(())
}
