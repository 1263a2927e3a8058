//! Catalog admin CLI

use clap::Parser;

use catalog_admin::cli::{self, Cli, Commands, GlobalOptions};
use catalog_admin::error::Result;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();
    init_logging(cli.debug);

    if let Err(err) = run(cli).await {
        eprintln!("Error: {}", err);
        std::process::exit(1);
    }
}

/// `--debug` forces debug output; otherwise RUST_LOG applies, defaulting to warn
fn init_logging(debug: bool) {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    if debug {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.format_timestamp(None).init();
}

async fn run(cli: Cli) -> Result<()> {
    let opts = GlobalOptions::from_cli(&cli);

    match cli.command {
        Commands::Init => cli::init::run(&opts),
        Commands::Status => cli::status::run(&opts),
        Commands::Version => {
            println!("catalog version {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        Commands::List { search } => cli::product::list(&opts, search.as_deref()).await,
        Commands::Get { id } => cli::product::get(&opts, &id).await,
        Commands::Create(args) => cli::product::create(&opts, args).await,
        Commands::Update(args) => cli::product::update(&opts, args).await,
        Commands::Delete { id, yes } => cli::product::delete(&opts, &id, yes).await,
    }
}
