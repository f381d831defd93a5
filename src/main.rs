//! stack-lookup CLI entry point

use clap::Parser;
use console::style;
use stack_lookup::cli::{commands, Cli, Commands};
use stack_lookup::config::{ConfigManager, ConfigSource};
use stack_lookup::error::{LookupError, LookupResult};
use std::process::ExitCode;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {}", style("Error:").red().bold(), e);
            if let Some(hint) = e.hint() {
                eprintln!("{} {}", style("Hint:").yellow(), hint);
            }
            ExitCode::FAILURE
        }
    }
}

async fn run() -> LookupResult<()> {
    let cli = Cli::parse();

    // 0 = warn, 1 = info, 2+ = debug; stdout stays reserved for values
    let filter = match cli.verbose {
        0 => EnvFilter::new("stack_lookup=warn"),
        1 => EnvFilter::new("stack_lookup=info"),
        _ => EnvFilter::new("stack_lookup=debug"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();

    // Completions don't need config loading
    if let Commands::Completions(args) = cli.command {
        commands::completions(args);
        return Ok(());
    }

    let config_manager = match cli.config {
        Some(ref path) => ConfigManager::with_path(path.clone()),
        None => ConfigManager::new(),
    };

    let local_config_path = if cli.no_local {
        debug!("Local config discovery disabled (--no-local)");
        None
    } else {
        let cwd = std::env::current_dir()
            .map_err(|e| LookupError::io("getting current directory", e))?;
        let found = ConfigManager::find_local_config(&cwd);
        if let Some(ref path) = found {
            debug!("Found local config: {}", path.display());
        }
        found
    };

    let mut config = config_manager
        .load_merged(local_config_path.as_deref())
        .await?;

    let source = ConfigSource {
        global: config_manager.path().to_path_buf(),
        local_discovery: !cli.no_local,
    };

    if let Some(path) = cli.cache_file {
        config.cache.path = path;
    }
    debug!("Using cache file {}", config.cache.path.display());

    match cli.command {
        Commands::Completions(_) => unreachable!("Completions handled above"),
        Commands::Output(args) => commands::output(args, &config, &source).await,
        Commands::Parameter(args) => commands::parameter(args, &config, &source).await,
        Commands::Fetch(args) => commands::fetch(args, &config).await,
        Commands::Cache(args) => commands::cache(args, &config).await,
        Commands::Config(args) => commands::config(args, &config, &config_manager).await,
    }
}
