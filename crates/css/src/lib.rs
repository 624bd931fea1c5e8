//! # CSS
//!
//! Declaration blocks, a small selector grammar, and stylesheet parsing.

pub mod declaration;
pub mod selector;
pub mod parser;

pub use declaration::{Declaration, parse_declarations, serialize_declarations};
pub use selector::{
    Combinator, CompoundSelector, ComplexSelector, Specificity, compute_specificity,
    parse_selector_list,
};
pub use parser::{CssRule, Stylesheet, parse_stylesheet};
