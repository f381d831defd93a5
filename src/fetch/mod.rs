//! Fetch delegates resolve cache misses against AWS
//!
//! - [`SdkDelegate`]: direct AWS SDK calls (default)
//! - [`ProcessDelegate`]: external executable printing a JSON string on stdout

mod process;
pub mod role;
mod sdk;

pub use process::ProcessDelegate;
pub use sdk::SdkDelegate;

use crate::config::{Config, ConfigSource, FetchBackend};
use crate::error::LookupResult;
use async_trait::async_trait;
use std::sync::Arc;

/// A stack output to resolve
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputRequest {
    pub account_id: String,
    pub region: String,
    pub stack_name: String,
    pub output_name: String,
}

impl OutputRequest {
    /// Positional arguments in delegate order
    pub fn args(&self) -> [&str; 4] {
        [
            self.account_id.as_str(),
            self.region.as_str(),
            self.stack_name.as_str(),
            self.output_name.as_str(),
        ]
    }
}

/// A parameter-store entry to resolve
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterRequest {
    pub account_id: String,
    pub region: String,
    pub parameter_name: String,
}

impl ParameterRequest {
    /// Positional arguments in delegate order
    pub fn args(&self) -> [&str; 3] {
        [
            self.account_id.as_str(),
            self.region.as_str(),
            self.parameter_name.as_str(),
        ]
    }
}

/// One round trip to the cloud provider per call
#[async_trait]
pub trait FetchDelegate: Send + Sync {
    /// Resolve a stack output value
    async fn fetch_output(&self, request: &OutputRequest) -> LookupResult<String>;

    /// Resolve a parameter value
    async fn fetch_parameter(&self, request: &ParameterRequest) -> LookupResult<String>;

    /// Human-readable delegate name for logs
    fn delegate_name(&self) -> &'static str;
}

/// Create the delegate selected by configuration
pub fn create_delegate(
    config: &Config,
    source: &ConfigSource,
) -> LookupResult<Arc<dyn FetchDelegate>> {
    match config.fetch.backend {
        FetchBackend::Sdk => Ok(Arc::new(SdkDelegate::new(config.aws.clone()))),
        FetchBackend::Process => Ok(Arc::new(ProcessDelegate::from_config(
            &config.fetch,
            source,
        )?)),
    }
}
