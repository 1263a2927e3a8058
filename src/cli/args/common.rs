//! Common CLI types shared across commands

/// Output format options
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Pretty format - colored cards for reading in a terminal
    #[default]
    Pretty,
    /// Table format - one row per product
    Table,
    /// JSON format - structured for scripts
    Json,
}
