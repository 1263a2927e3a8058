//! Init command implementation

use colored::Colorize;
use dialoguer::{Input, Password, theme::ColorfulTheme};

use crate::cli::GlobalOptions;
use crate::config::Config;
use crate::error::Result;

/// Run the init command.
///
/// Values given with `--api-url`/`--api-key` are used as-is; missing ones
/// are prompted for. Other settings already in the file are kept.
pub fn run(opts: &GlobalOptions) -> Result<()> {
    println!("{}", "Catalog admin setup".bold().green());

    let mut config = Config::load_or_default(opts.config_ref())?;

    let api_url = match opts.api_url_ref() {
        Some(url) => url.to_string(),
        None => Input::with_theme(&ColorfulTheme::default())
            .with_prompt("Store URL (e.g. https://xyz.supabase.co)")
            .interact_text()?,
    };
    let api_key = match opts.api_key_ref() {
        Some(key) => key.to_string(),
        None => Password::with_theme(&ColorfulTheme::default())
            .with_prompt("API key (leave empty for none)")
            .allow_empty_password(true)
            .interact()?,
    };

    config.api_url = Some(api_url.trim().to_string());
    config.api_key = (!api_key.trim().is_empty()).then(|| api_key.trim().to_string());
    config.require_api_url()?;
    config.save_at(opts.config_ref())?;

    let config_path = Config::resolve_path(opts.config_ref())?;
    println!(
        "\n{} Configuration saved to: {}",
        "✓".green(),
        config_path.display()
    );
    println!("\n{}", "Try running:".bold());
    println!("  {} - Show configuration status", "catalog status".cyan());
    println!("  {} - List products", "catalog list".cyan());

    Ok(())
}
