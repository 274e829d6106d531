//! keyreach - reachability checker for `translate({...})` keys
//!
//! keyreach is a CLI tool and library that statically decides which translation
//! keys declared through a `translate(...)` call in JS/JSX/TS/TSX code are reached
//! at runtime. It reports unused keys, keys accessed without being declared, and
//! misuse of lazy keys.
//!
//! ## Module Structure
//!
//! - `cli`: Command-line interface layer
//! - `config`: Configuration file loading and parsing
//! - `core`: Analysis engine (key trees, reference resolution, marking)
//! - `issues`: Finding type definitions and reporting
//! - `rules`: Reachability rules run over marked key trees

pub mod cli;
pub mod config;
pub mod core;
pub mod issues;
pub mod rules;
