//! Core data types shared by every stage of the analysis.
//!
//! - `source`: Source code location types (SourceContext, SourceLocation, Locator)

pub mod source;

pub use source::{Locator, SourceContext, SourceLocation};
