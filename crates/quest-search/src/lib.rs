//! quest-search: Simulated web source lookup
//!
//! This crate provides the source records attached to assistant answers and a
//! deterministic, template-based stand-in for a real search backend. A
//! production deployment would swap the simulated lookup for a search API
//! without touching callers.

pub mod simulated;
pub mod types;
pub mod url_util;

pub use simulated::SimulatedSources;
pub use types::{SearchResult, Source};
