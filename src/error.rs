//! Error types for stack-lookup
//!
//! All modules use `LookupResult<T>` as their return type.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for lookup operations
pub type LookupResult<T> = Result<T, LookupError>;

/// All errors that can occur while resolving values
#[derive(Error, Debug)]
pub enum LookupError {
    // Configuration errors
    #[error("Invalid configuration at {path}: {reason}")]
    ConfigInvalid { path: PathBuf, reason: String },

    #[error("Failed to create config directory {path}: {source}")]
    ConfigDirCreate {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // Cache errors
    #[error("Cache file {path} is not a JSON object: {reason}")]
    CacheCorrupt { path: PathBuf, reason: String },

    #[error("Invalid {field} for cache key: {value:?} ({reason})")]
    InvalidKeyComponent {
        field: &'static str,
        value: String,
        reason: &'static str,
    },

    // Credential errors
    #[error("The current AWS identity ({actual}) does not match the requested account ID ({requested}) and role assumption failed")]
    IdentityMismatch { requested: String, actual: String },

    #[error("AWS error: {0}")]
    Aws(String),

    // Resolution errors
    #[error("Unable to find stack {0}")]
    StackNotFound(String),

    #[error("Unable to find output {output} in stack {stack}")]
    OutputNotFound { stack: String, output: String },

    #[error("Unable to find parameter {0}")]
    ParameterNotFound(String),

    // Delegate process errors
    #[error("Command failed: {command}")]
    CommandFailed {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Fetch delegate failed: {command}, exit code: {code:?}, stderr: {stderr}")]
    DelegateFailed {
        command: String,
        code: Option<i32>,
        stderr: String,
    },

    #[error("Fetch delegate returned malformed output: {command}: {reason}")]
    DelegateOutput { command: String, reason: String },

    // IO errors
    #[error("IO error: {context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    // Serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    #[error("{0}")]
    User(String),
}

impl LookupError {
    /// Create an IO error with context
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Create a command failed error
    pub fn command_failed(command: impl Into<String>, source: std::io::Error) -> Self {
        Self::CommandFailed {
            command: command.into(),
            source,
        }
    }

    /// Create an AWS error from any displayable SDK error
    pub fn aws(context: &str, err: impl std::fmt::Display) -> Self {
        Self::Aws(format!("{}: {}", context, err))
    }

    /// Get actionable hint for the error
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            Self::IdentityMismatch { .. } => Some(
                "Deploy the CDK lookup role in the target account or use credentials for that account (AWS_PROFILE)",
            ),
            Self::ConfigInvalid { .. } => Some("Run: stack-lookup config show"),
            Self::CacheCorrupt { .. } => Some("Fix or remove the cache file; it is recreated on the next lookup"),
            _ => None,
        }
    }
}
