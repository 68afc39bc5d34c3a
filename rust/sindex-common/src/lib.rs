//! Core definitions (error type, result helpers and runtime shims), relied upon
//! by all sindex-* crates.

pub mod async_runtime;
pub mod error;
pub mod result;

pub use result::Result;
