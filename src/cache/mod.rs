//! Lookup cache
//!
//! Resolved values are memoized in a single JSON object file keyed by
//! [`CompositeKey`]. Entries are never expired or removed by this crate.

pub mod key;
pub mod store;

pub use key::{CompositeKey, KeyKind};
pub use store::CacheStore;
