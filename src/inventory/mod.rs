//! Resource inventory
//!
//! Typed resource listing scoped to folders, and the full hierarchy walk
//! that aggregates everything a set of credentials can see.

pub mod discovery;
pub mod kinds;

pub use discovery::{discover_all, list_resources, DiscoverySummary};
pub use kinds::ResourceKind;
