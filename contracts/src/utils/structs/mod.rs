//! Collections used by the registry.
pub mod enumerable_set;

pub use enumerable_set::EnumerableSet;
