//! stack-lookup - cached CloudFormation output and SSM parameter lookups
//!
//! Resolves values from previously deployed infrastructure at synth time and
//! memoizes them in a local JSON file so repeated builds skip the network.
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use stack_lookup::{CacheStore, LookupTarget, SdkDelegate, StackOutputResolver};
//!
//! let resolver = StackOutputResolver::new(
//!     LookupTarget::new("123456789012", "us-east-1"),
//!     "database-stack",
//!     CacheStore::new("cdk8s.context.json"),
//!     Arc::new(SdkDelegate::new(Default::default())),
//! );
//! let url = resolver.lookup_output("ConnectionString").await?;
//! ```

pub mod cache;
pub mod cli;
pub mod config;
pub mod error;
pub mod fetch;
pub mod resolver;
pub mod ui;

pub use cache::{CacheStore, CompositeKey};
pub use error::{LookupError, LookupResult};
pub use fetch::{FetchDelegate, ProcessDelegate, SdkDelegate};
pub use resolver::{LookupTarget, ParameterResolver, StackOutputResolver};
