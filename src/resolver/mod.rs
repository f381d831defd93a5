//! Cached resolvers for stack outputs and parameters
//!
//! Both resolvers follow the same path: build the composite key, return a
//! cached value if there is one, otherwise ask the fetch delegate and persist
//! the answer before returning it.

mod output;
mod parameter;

pub use output::StackOutputResolver;
pub use parameter::ParameterResolver;

use crate::cache::{CacheStore, CompositeKey};
use crate::error::LookupResult;
use std::future::Future;
use tracing::debug;

/// Account and region every lookup of a resolver is scoped to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupTarget {
    pub account_id: String,
    pub region: String,
}

impl LookupTarget {
    pub fn new(account_id: impl Into<String>, region: impl Into<String>) -> Self {
        Self {
            account_id: account_id.into(),
            region: region.into(),
        }
    }
}

/// Read-through cache step shared by both resolvers
async fn resolve_cached<F, Fut>(
    store: &CacheStore,
    key: &CompositeKey,
    fetch: F,
) -> LookupResult<String>
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = LookupResult<String>>,
{
    let key = key.to_string();

    if let Some(value) = store.read(&key).await? {
        debug!("Cache hit for {}", key);
        return Ok(value);
    }

    debug!("Cache miss for {}", key);
    let value = fetch().await?;
    store.write(&key, &value).await?;
    Ok(value)
}
