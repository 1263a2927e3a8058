//! Status command implementation

use colored::Colorize;

use crate::cli::GlobalOptions;
use crate::config::Config;
use crate::error::Result;

/// Run the status command to display configuration status
pub fn run(opts: &GlobalOptions) -> Result<()> {
    println!("{}\n", "Catalog Configuration Status".bold());

    let config_path = Config::resolve_path(opts.config_ref())?;
    let mut config = match Config::load_at(opts.config_ref()) {
        Ok(config) => {
            println!("Config file: {}", config_path.display().to_string().cyan());
            config
        }
        Err(_) => {
            println!(
                "{} Configuration not found at {}",
                "✗".red(),
                config_path.display()
            );
            Config::default()
        }
    };
    config.apply_overrides(opts.api_url_ref(), opts.api_key_ref());

    println!();
    match config.require_api_url() {
        Ok(url) => println!("{} Store URL: {}", "✓".green(), url),
        Err(_) => {
            println!("{} Store URL not configured", "✗".red());
            println!("  → Run 'catalog init' or pass --api-url");
        }
    }

    if config.api_key.is_some() {
        println!("{} API key configured", "✓".green());
    } else {
        println!("{} No API key (requests are anonymous)", "○".dimmed());
    }

    println!("{} Table: {}", "○".dimmed(), config.table);
    println!(
        "{} Request timeout: {}s",
        "○".dimmed(),
        config.request_timeout_secs
    );
    println!(
        "{} Search debounce: {}ms",
        "○".dimmed(),
        config.search_debounce_ms
    );
    match config.stale_time_secs {
        Some(secs) => println!("{} Cache stale time: {}s", "○".dimmed(), secs),
        None => println!("{} Cache stale time: until changed", "○".dimmed()),
    }
    println!();

    Ok(())
}
