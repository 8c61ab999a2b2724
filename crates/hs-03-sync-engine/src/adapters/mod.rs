//! Adapters for the sync engine ports.

pub mod gateway_client;

pub use gateway_client::GatewayLedgerClient;
