//! Ports for the sync engine.

pub mod outbound;

pub use outbound::{LedgerClient, MockLedgerClient};
