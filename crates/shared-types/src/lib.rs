//! # Shared Types Crate
//!
//! Domain entities passed between the sync subsystems.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: blocks, writes and documents are defined here
//!   and nowhere else.
//! - **Storage Agnostic**: a [`Document`] carries no knowledge of the sink it
//!   ends up in; sinks derive index names and ids from its fields.
//! - **Mutual Exclusion**: an [`ExtractionResult`] never holds the same
//!   [`DocumentKey`] in both its add and remove maps.

pub mod documents;
pub mod entities;
pub mod errors;

pub use documents::*;
pub use entities::*;
pub use errors::*;
