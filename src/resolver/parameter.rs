//! Parameter-store resolver

use super::{resolve_cached, LookupTarget};
use crate::cache::{CacheStore, CompositeKey};
use crate::error::LookupResult;
use crate::fetch::{FetchDelegate, ParameterRequest};
use std::sync::Arc;

/// Resolves SSM parameters of one account and region
pub struct ParameterResolver {
    target: LookupTarget,
    store: CacheStore,
    delegate: Arc<dyn FetchDelegate>,
}

impl ParameterResolver {
    pub fn new(target: LookupTarget, store: CacheStore, delegate: Arc<dyn FetchDelegate>) -> Self {
        Self {
            target,
            store,
            delegate,
        }
    }

    /// Look up a parameter value, fetching it on a cache miss
    pub async fn lookup_parameter(&self, parameter_name: &str) -> LookupResult<String> {
        let key = CompositeKey::parameter(
            &self.target.account_id,
            &self.target.region,
            parameter_name,
        )?;

        resolve_cached(&self.store, &key, move || async move {
            let request = ParameterRequest {
                account_id: self.target.account_id.clone(),
                region: self.target.region.clone(),
                parameter_name: parameter_name.to_string(),
            };
            self.delegate.fetch_parameter(&request).await
        })
        .await
    }
}
