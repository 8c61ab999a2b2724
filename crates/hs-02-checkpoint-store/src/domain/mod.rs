//! # Domain Module
//!
//! Error types for checkpoint persistence.

pub mod errors;

pub use errors::*;
