//! Cache command - inspect the lookup cache

use crate::cache::{CacheStore, CompositeKey};
use crate::cli::args::{CacheAction, CacheArgs, OutputFormat};
use crate::config::Config;
use crate::error::LookupResult;
use crate::ui::{self, UiContext};
use console::style;
use serde::Serialize;

/// Execute the cache command
pub async fn execute(args: CacheArgs, config: &Config) -> LookupResult<()> {
    let store = CacheStore::new(&config.cache.path);

    match args.action {
        CacheAction::List { format } => list_entries(&store, format).await,
        CacheAction::Path => {
            println!("{}", store.path().display());
            Ok(())
        }
    }
}

/// One listed cache entry
#[derive(Debug, Serialize)]
struct EntryView {
    key: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    lookup: Option<CompositeKey>,
    value: String,
}

async fn list_entries(store: &CacheStore, format: OutputFormat) -> LookupResult<()> {
    let entries: Vec<EntryView> = store
        .entries()
        .await?
        .into_iter()
        .map(|(key, value)| EntryView {
            lookup: CompositeKey::parse(&key),
            key,
            value,
        })
        .collect();

    if entries.is_empty() {
        match format {
            OutputFormat::Json => println!("[]"),
            OutputFormat::Plain => {}
            OutputFormat::Table => {
                let ctx = UiContext::detect();
                ui::step_info(&ctx, &format!("No cached values in {}", store.path().display()));
            }
        }
        return Ok(());
    }

    match format {
        OutputFormat::Table => print_table(&entries),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&entries)?),
        OutputFormat::Plain => {
            for entry in &entries {
                println!("{}={}", entry.key, entry.value);
            }
        }
    }

    Ok(())
}

fn print_table(entries: &[EntryView]) {
    println!(
        "{:<6} {:<14} {:<16} {:<40} {}",
        style("TYPE").bold(),
        style("ACCOUNT").bold(),
        style("REGION").bold(),
        style("NAME").bold(),
        style("VALUE").bold()
    );
    println!("{}", "-".repeat(96));

    for entry in entries {
        match &entry.lookup {
            Some(key) => println!(
                "{:<6} {:<14} {:<16} {:<40} {}",
                key.kind().tag(),
                key.account_id(),
                key.region(),
                key.display_name(),
                entry.value
            ),
            None => println!(
                "{:<6} {:<14} {:<16} {:<40} {}",
                style("other").dim(),
                "-",
                "-",
                entry.key,
                entry.value
            ),
        }
    }

    println!();
    println!("{} cached value(s)", entries.len());
}
