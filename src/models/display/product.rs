//! Product display models

use colored::Colorize;
use serde::Serialize;
use tabled::Tabled;

use crate::client::Product;
use crate::output::formatters::{format_timestamp_local, format_usd, truncate};

/// Longest name shown in a table cell
const NAME_COLUMN_WIDTH: usize = 40;

/// Product row for table output.
#[derive(Debug, Clone, Tabled, Serialize)]
pub struct ProductDisplay {
    #[tabled(rename = "ID")]
    pub id: String,

    #[tabled(rename = "NAME")]
    pub name: String,

    #[tabled(rename = "PRICE")]
    pub price: String,

    /// Checkmark when the product has an image
    #[tabled(rename = "IMAGE")]
    pub image: String,

    #[tabled(rename = "UPDATED")]
    pub updated: String,
}

impl From<&Product> for ProductDisplay {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id.clone(),
            name: truncate(&product.name, NAME_COLUMN_WIDTH),
            price: format_usd(product.price),
            image: if product.image.is_some() {
                "\u{2713}".to_string()
            } else {
                String::new()
            },
            updated: format_timestamp_local(&product.updated_at),
        }
    }
}

/// One product as a card in a pretty list
pub fn pretty_card(product: &Product) -> String {
    let mut card = format!(
        "{}  {}\n  {}\n  {} {}",
        product.name.bold(),
        format_usd(product.price).green(),
        product.description,
        product.id.dimmed(),
        format!("· updated {}", format_timestamp_local(&product.updated_at)).dimmed()
    );
    if let Some(ref image) = product.image {
        card.push_str(&format!("\n  {} {}", "Image:".dimmed(), image.cyan()));
    }
    card
}

/// All fields of one product, one per line
pub fn pretty_detail(product: &Product) -> String {
    let mut lines = vec![
        format!("{}: {}", "Product".bold(), product.name),
        format!("{}: {}", "ID".dimmed(), product.id),
        format!("{}: {}", "Price".bold(), format_usd(product.price).green()),
        format!("{}: {}", "Description".bold(), product.description),
        format!(
            "{}: {}",
            "Image".bold(),
            product.image.as_deref().unwrap_or("--")
        ),
        format!(
            "{}: {}",
            "Created".bold(),
            format_timestamp_local(&product.created_at)
        ),
    ];
    if product.is_edited() {
        lines.push(format!(
            "{}: {}",
            "Updated".bold(),
            format_timestamp_local(&product.updated_at)
        ));
    }
    lines.join("\n")
}
