//! CLI command implementations

pub mod cache;
pub mod completions;
pub mod config;
pub mod fetch;
pub mod lookup;

pub use cache::execute as cache;
pub use completions::execute as completions;
pub use config::execute as config;
pub use fetch::execute as fetch;
pub use lookup::{output, parameter};
