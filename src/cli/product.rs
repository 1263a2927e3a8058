//! Product command implementations

use colored::Colorize;
use dialoguer::{Confirm, theme::ColorfulTheme};

use crate::cli::{CommandContext, CreateArgs, GlobalOptions, OutputFormat, UpdateArgs};
use crate::client::{ProductForm, ProductPatch};
use crate::error::{Error, Result};
use crate::output::{self, formatters::format_usd};

/// Run the `list` command
pub async fn list(opts: &GlobalOptions, search: Option<&str>) -> Result<()> {
    let ctx = CommandContext::new(opts)?;
    let products = match search {
        Some(text) => ctx.catalog.search(text).await?,
        None => ctx.catalog.products().await?,
    };
    output::print(products.as_slice(), ctx.format)
}

/// Run the `get` command
pub async fn get(opts: &GlobalOptions, id: &str) -> Result<()> {
    let ctx = CommandContext::new(opts)?;
    let product = ctx.catalog.product(id).await?;
    output::print(&product, ctx.format)
}

/// Run the `create` command
pub async fn create(opts: &GlobalOptions, args: CreateArgs) -> Result<()> {
    let form = ProductForm {
        name: args.name,
        description: args.description,
        price: args.price,
        image: args.image.unwrap_or_default(),
    };
    // Validate before touching config or network
    let draft = form.parse()?;

    let ctx = CommandContext::new(opts)?;
    let product = ctx.catalog.mutations().create_product(&draft).await?;

    if ctx.format == OutputFormat::Pretty {
        println!(
            "{} Created {} ({}) at {}",
            "✓".green(),
            product.name.bold(),
            product.id.dimmed(),
            format_usd(product.price)
        );
        return Ok(());
    }
    output::print(&product, ctx.format)
}

/// Run the `update` command.
///
/// Works like the edit form: the current product is loaded, the given fields
/// replace their counterparts, and the whole form is validated and saved.
pub async fn update(opts: &GlobalOptions, args: UpdateArgs) -> Result<()> {
    if !args.has_changes() {
        return Err(Error::Other(
            "Nothing to update. Pass at least one field to change.".to_string(),
        ));
    }

    let ctx = CommandContext::new(opts)?;
    let current = ctx.catalog.product(&args.id).await?;

    let mut form = ProductForm::from_product(&current);
    if let Some(name) = args.name {
        form.name = name;
    }
    if let Some(description) = args.description {
        form.description = description;
    }
    if let Some(price) = args.price {
        form.price = price;
    }
    if let Some(image) = args.image {
        form.image = image;
    }
    if args.clear_image {
        form.image.clear();
    }
    let patch = ProductPatch::from(form.parse()?);

    let product = ctx
        .catalog
        .mutations()
        .update_product(&current.id, &patch)
        .await?;

    if ctx.format == OutputFormat::Pretty {
        println!("{} Updated {}", "✓".green(), product.name.bold());
        println!();
    }
    output::print(&product, ctx.format)
}

/// Run the `delete` command
pub async fn delete(opts: &GlobalOptions, id: &str, yes: bool) -> Result<()> {
    let ctx = CommandContext::new(opts)?;

    if !yes {
        let product = ctx.catalog.product(id).await?;
        println!(
            "{} This will permanently delete {} ({})",
            "⚠".yellow(),
            product.name.bold(),
            format_usd(product.price)
        );
        let confirmed = Confirm::with_theme(&ColorfulTheme::default())
            .with_prompt("Delete this product?")
            .default(false)
            .interact()?;
        if !confirmed {
            println!("Cancelled.");
            return Ok(());
        }
    }

    ctx.catalog.mutations().delete_product(id).await?;

    match ctx.format {
        OutputFormat::Json => {
            let deleted = serde_json::json!({ "id": id, "deleted": true });
            println!("{}", output::json::format_json(&deleted)?);
        }
        OutputFormat::Pretty | OutputFormat::Table => {
            println!("{} Deleted product {}", "✓".green(), id);
        }
    }
    Ok(())
}
