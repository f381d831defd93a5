//! Output and parameter commands - cached lookups

use crate::cache::CacheStore;
use crate::cli::args::{OutputArgs, ParameterArgs};
use crate::config::{Config, ConfigSource};
use crate::error::LookupResult;
use crate::fetch::create_delegate;
use crate::resolver::{LookupTarget, ParameterResolver, StackOutputResolver};
use tracing::debug;

/// Execute the output command
pub async fn output(
    args: OutputArgs,
    config: &Config,
    source: &ConfigSource,
) -> LookupResult<()> {
    let delegate = create_delegate(config, source)?;
    debug!("Using {} fetch delegate", delegate.delegate_name());

    let resolver = StackOutputResolver::new(
        LookupTarget::new(args.account, args.region),
        args.stack,
        CacheStore::new(&config.cache.path),
        delegate,
    );

    debug!("Resolving {} from stack {}", args.name, resolver.stack_name());
    let value = resolver.lookup_output(&args.name).await?;
    print_value(&value, args.json)
}

/// Execute the parameter command
pub async fn parameter(
    args: ParameterArgs,
    config: &Config,
    source: &ConfigSource,
) -> LookupResult<()> {
    let delegate = create_delegate(config, source)?;
    debug!("Using {} fetch delegate", delegate.delegate_name());

    let resolver = ParameterResolver::new(
        LookupTarget::new(args.account, args.region),
        CacheStore::new(&config.cache.path),
        delegate,
    );

    let value = resolver.lookup_parameter(&args.name).await?;
    print_value(&value, args.json)
}

fn print_value(value: &str, json: bool) -> LookupResult<()> {
    if json {
        println!("{}", serde_json::to_string(value)?);
    } else {
        println!("{}", value);
    }
    Ok(())
}
