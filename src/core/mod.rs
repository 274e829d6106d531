//! Core analysis engine.
//!
//! - `collect`: translate declarations and shared AST helpers
//! - `tree`: key tree model and its builder
//! - `resolve`: access paths of a binding and its aliases
//! - `mark`: usage marking of key trees
//! - `analyze`: the per-file pipeline
//! - `context`: config, file discovery and parallel analysis of a project

pub mod analyze;
pub mod collect;
pub mod context;
pub mod data;
pub mod file_scanner;
pub mod mark;
pub mod parsers;
pub mod resolve;
pub mod tree;

#[cfg(test)]
pub(crate) mod test_utils;

pub use analyze::{AnalysisOptions, FileAnalysis, analyze_module, analyze_source};
pub use context::{CheckContext, CheckOutcome, ParseFailure};
pub use data::{Locator, SourceContext, SourceLocation};
