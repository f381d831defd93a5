//! Configuration schema for stack-lookup
//!
//! Global configuration is stored at `~/.config/stack-lookup/config.toml`,
//! project overrides in `.stack-lookup.toml`.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Default cache file name, resolved against the current directory
pub const DEFAULT_CACHE_FILE: &str = "cdk8s.context.json";

/// Lookup role used by the CDK bootstrap, `{account}` and `{region}` substituted
pub const DEFAULT_ROLE_ARN_TEMPLATE: &str =
    "arn:aws:iam::{account}:role/cdk-hnb659fds-lookup-role-{account}-{region}-id";

/// Default STS session name for the lookup role
pub const DEFAULT_SESSION_NAME: &str = "cdk8sLookupSession";

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Lookup cache settings
    pub cache: CacheConfig,

    /// AWS access settings
    pub aws: AwsConfig,

    /// Fetch delegate settings
    pub fetch: FetchConfig,
}

/// Lookup cache configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Cache file path (relative paths resolve against the working directory)
    pub path: PathBuf,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from(DEFAULT_CACHE_FILE),
        }
    }
}

/// AWS access settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AwsConfig {
    /// AWS profile for the ambient identity
    pub profile: Option<String>,

    /// Lookup role ARN template
    pub role_arn_template: String,

    /// STS session name used when assuming the lookup role
    pub session_name: String,

    /// Decrypt SecureString parameters
    pub with_decryption: bool,
}

impl Default for AwsConfig {
    fn default() -> Self {
        Self {
            profile: None,
            role_arn_template: DEFAULT_ROLE_ARN_TEMPLATE.to_string(),
            session_name: DEFAULT_SESSION_NAME.to_string(),
            with_decryption: false,
        }
    }
}

/// Which fetch delegate resolves cache misses
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FetchBackend {
    /// In-process AWS SDK calls
    #[default]
    Sdk,
    /// External executable speaking the JSON-on-stdout protocol
    Process,
}

/// Fetch delegate configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    /// Delegate backend
    pub backend: FetchBackend,

    /// Program and base arguments resolving stack outputs (process backend).
    /// Empty means this binary's own `fetch output` subcommand.
    pub output_command: Vec<String>,

    /// Program and base arguments resolving parameters (process backend).
    /// Empty means this binary's own `fetch parameter` subcommand.
    pub parameter_command: Vec<String>,
}
