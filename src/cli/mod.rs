//! CLI command definitions and handlers

use clap::{Args, Parser, Subcommand};

pub mod args;
pub mod context;
pub mod init;
pub mod product;
pub mod status;

pub use args::{GlobalOptions, OutputFormat};
pub use context::CommandContext;

/// Catalog admin - manage the product catalog of a hosted store
#[derive(Parser, Debug)]
#[command(name = "catalog")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Output format (pretty, table, json)
    #[arg(
        long,
        global = true,
        env = "CATALOG_FORMAT",
        default_value = "pretty",
        hide_env = true,
        hide_possible_values = true
    )]
    pub format: OutputFormat,

    /// Override config file location
    #[arg(long, global = true, env = "CATALOG_CONFIG", hide_env = true)]
    pub config: Option<String>,

    /// Store URL (overrides the config file)
    #[arg(long, global = true, env = "CATALOG_API_URL", hide_env = true)]
    pub api_url: Option<String>,

    /// Store API key (overrides the config file)
    #[arg(long, global = true, env = "CATALOG_API_KEY", hide_env = true)]
    pub api_key: Option<String>,

    /// Enable debug logging
    #[arg(long, global = true, env = "CATALOG_DEBUG", hide_env = true)]
    pub debug: bool,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Write the store URL and API key to the config file
    Init,

    /// Show configuration status
    Status,

    /// Display version information
    Version,

    /// List products, newest first
    List {
        /// Only products whose name or description contains this text
        #[arg(long, short)]
        search: Option<String>,
    },

    /// Show one product
    Get {
        /// Product ID
        id: String,
    },

    /// Add a product
    Create(CreateArgs),

    /// Edit a product
    Update(UpdateArgs),

    /// Remove a product
    Delete {
        /// Product ID
        id: String,

        /// Skip the confirmation prompt
        #[arg(long, short)]
        yes: bool,
    },
}

/// Fields of a new product
#[derive(Debug, Clone, Args)]
pub struct CreateArgs {
    #[arg(long)]
    pub name: String,

    #[arg(long)]
    pub description: String,

    /// Price in USD, e.g. 19.99
    #[arg(long)]
    pub price: String,

    /// Image URL
    #[arg(long)]
    pub image: Option<String>,
}

/// Fields to change on an existing product; omitted fields keep their value
#[derive(Debug, Clone, Args)]
pub struct UpdateArgs {
    /// Product ID
    pub id: String,

    #[arg(long)]
    pub name: Option<String>,

    #[arg(long)]
    pub description: Option<String>,

    /// Price in USD, e.g. 19.99
    #[arg(long)]
    pub price: Option<String>,

    /// Image URL
    #[arg(long, conflicts_with = "clear_image")]
    pub image: Option<String>,

    /// Remove the product image
    #[arg(long)]
    pub clear_image: bool,
}

impl UpdateArgs {
    /// Whether any field was given
    pub fn has_changes(&self) -> bool {
        self.name.is_some()
            || self.description.is_some()
            || self.price.is_some()
            || self.image.is_some()
            || self.clear_image
    }
}
