//! # Style Engine
//!
//! Selector matching and cascade resolution, narrowed to the properties the
//! annoyance heuristics inspect.

pub mod cascade;
pub mod matching;
pub mod resolved;

pub use cascade::{StyleOrigin, StyleResolver};
pub use matching::{matches_compound, matches_selector};
pub use resolved::{ResolvedStyle, StyleProperty};
