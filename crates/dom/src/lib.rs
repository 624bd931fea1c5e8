//! DOM crate: Document Object Model
//!
//! Arena-based DOM tree with shadow roots, inline style declarations and
//! mutation records. Uses generational indices from the `arena` crate instead
//! of Rc/RefCell, so a node destroyed by the page leaves no dangling handle.

pub mod mutation;
pub mod node;
pub mod tree;

pub use mutation::{MutationObservers, MutationRecord, ObserverId};
pub use node::*;
pub use tree::Dom;
