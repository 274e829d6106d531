//! Collection of translate declarations.
//!
//! - `declarations`: finds module-level `X = translate({...})` bindings
//! - `helpers`: pure AST helpers shared across the analysis

pub mod declarations;
pub mod helpers;

pub use declarations::{TranslateDeclaration, collect_translate_declarations};
