//! Rule implementations for keyreach.
//!
//! Rules are pure functions over an already marked key tree. They take only
//! the inputs they need and return findings.
//!
//! - `reachability`: unused and opaquely reached keys

pub mod reachability;

pub use reachability::check_reachability;
