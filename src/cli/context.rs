//! Command execution context
//!
//! Loads configuration, merges the global flag overrides and builds the
//! catalog every product command runs against.

use crate::catalog::Catalog;
use crate::cli::{GlobalOptions, OutputFormat};
use crate::client::RestProductClient;
use crate::config::Config;
use crate::error::Result;

/// Context for command execution
pub struct CommandContext {
    /// Configuration after flag and env overrides
    pub config: Config,
    pub catalog: Catalog<RestProductClient>,
    pub format: OutputFormat,
}

impl CommandContext {
    /// Create a new command context.
    ///
    /// With `--api-url` the config file is optional; otherwise it must exist.
    ///
    /// # Errors
    /// Returns error if config cannot be loaded or has no store URL.
    pub fn new(opts: &GlobalOptions) -> Result<Self> {
        let config = resolve_config(opts)?;
        let catalog = Catalog::from_config(&config)?;
        log::debug!("Using product table {}", config.table);

        Ok(Self {
            config,
            catalog,
            format: opts.format,
        })
    }
}

/// Load the config file and layer the flag/env overrides on top
pub fn resolve_config(opts: &GlobalOptions) -> Result<Config> {
    let mut config = if opts.api_url.is_some() {
        Config::load_or_default(opts.config_ref())?
    } else {
        Config::load_at(opts.config_ref())?
    };
    config.apply_overrides(opts.api_url_ref(), opts.api_key_ref());
    config.require_api_url()?;
    Ok(config)
}
