//! Output formatting for CLI results

use crate::cli::OutputFormat;
use crate::client::Product;
use crate::error::Result;
use crate::models::{ProductDisplay, pretty_card, pretty_detail};

pub mod formatters;
pub mod json;
pub mod table;

const NO_PRODUCTS: &str = "No products found.";

/// Trait for types that can be formatted for output
pub trait Formattable {
    /// Format the data according to the specified format
    fn format(&self, format: OutputFormat) -> Result<String>;
}

impl Formattable for [Product] {
    fn format(&self, format: OutputFormat) -> Result<String> {
        match format {
            OutputFormat::Pretty => {
                if self.is_empty() {
                    return Ok(NO_PRODUCTS.to_string());
                }
                let cards: Vec<String> = self.iter().map(pretty_card).collect();
                Ok(cards.join("\n\n"))
            }
            OutputFormat::Table => {
                let rows: Vec<ProductDisplay> = self.iter().map(ProductDisplay::from).collect();
                Ok(table::format_table(&rows, NO_PRODUCTS))
            }
            OutputFormat::Json => Ok(json::format_json_list(self)?),
        }
    }
}

impl Formattable for Product {
    fn format(&self, format: OutputFormat) -> Result<String> {
        match format {
            OutputFormat::Pretty => Ok(pretty_detail(self)),
            OutputFormat::Table => Ok(table::format_table(
                &[ProductDisplay::from(self)],
                NO_PRODUCTS,
            )),
            OutputFormat::Json => Ok(json::format_json(self)?),
        }
    }
}

/// Format and print data to stdout
pub fn print<T: Formattable + ?Sized>(data: &T, format: OutputFormat) -> Result<()> {
    let output = data.format(format)?;
    println!("{}", output);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::fixtures::ProductBuilder;
    use serde_json::Value;

    fn products() -> Vec<Product> {
        vec![
            ProductBuilder::new("p1").name("Linen Shirt").price(45.0).build(),
            ProductBuilder::new("p2").name("Wool Coat").price(1250.0).build(),
        ]
    }

    #[test]
    fn test_list_table() {
        let output = products().format(OutputFormat::Table).unwrap();
        assert!(output.contains("Linen Shirt"));
        assert!(output.contains("$1,250.00"));
        assert!(output.contains("PRICE"));
    }

    #[test]
    fn test_list_json_keeps_raw_price() {
        let output = products().format(OutputFormat::Json).unwrap();
        let value: Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value["data"][1]["price"], 1250.0);
        assert_eq!(value["meta"]["count"], 2);
    }

    #[test]
    fn test_empty_list_message() {
        let empty: Vec<Product> = vec![];
        assert_eq!(empty.format(OutputFormat::Pretty).unwrap(), NO_PRODUCTS);
        assert_eq!(empty.format(OutputFormat::Table).unwrap(), NO_PRODUCTS);
    }

    #[test]
    fn test_single_product_json() {
        let product = ProductBuilder::new("p1").build();
        let output = product.format(OutputFormat::Json).unwrap();
        let value: Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value["data"]["id"], "p1");
        assert!(value["data"]["created_at"].is_string());
    }
}
