//! Table output formatting

use tabled::{
    Table, Tabled,
    settings::{Alignment, Modify, Style, object::Rows},
};

/// Format rows as a rounded table, or `empty` when there are none
pub fn format_table<T: Tabled>(data: &[T], empty: &str) -> String {
    if data.is_empty() {
        return empty.to_string();
    }

    let mut table = Table::new(data);
    table
        .with(Style::rounded())
        .with(Modify::new(Rows::first()).with(Alignment::center()));

    table.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Tabled)]
    struct Row {
        #[tabled(rename = "ID")]
        id: String,
        #[tabled(rename = "PRICE")]
        price: String,
    }

    #[test]
    fn test_format_table_empty_message() {
        let rows: Vec<Row> = vec![];
        assert_eq!(format_table(&rows, "No products found."), "No products found.");
    }

    #[test]
    fn test_format_table_rounded_with_headers() {
        let rows = vec![
            Row {
                id: "p1".to_string(),
                price: "$1.00".to_string(),
            },
            Row {
                id: "p2".to_string(),
                price: "$2.00".to_string(),
            },
        ];

        let result = format_table(&rows, "");

        assert!(result.contains("ID"));
        assert!(result.contains("PRICE"));
        assert!(result.contains("$2.00"));
        assert!(result.contains("╭"));
        assert!(result.contains("╰"));
    }
}
