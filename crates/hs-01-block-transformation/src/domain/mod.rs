//! # Domain Module
//!
//! Error types and key rules for block transformation.

pub mod errors;
pub mod keys;

pub use errors::*;
pub use keys::*;
