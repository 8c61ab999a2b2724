//! # HLF-Sync Test Suite
//!
//! Unified test crate containing:
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! ├── fixtures.rs       # Ledger blocks built from Fabric protobufs
//! ├── mock_servers.rs   # axum fakes: ledger gateway, Elasticsearch, Meilisearch
//! └── integration/      # Cross-subsystem flows
//!     ├── sync_flows.rs     # ledger → transform → sink → checkpoint
//!     ├── http_sinks.rs     # sink adapters against fake backends
//!     └── gateway.rs        # ledger client against a fake gateway
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! # All tests
//! cargo test -p hs-tests
//!
//! # By category
//! cargo test -p hs-tests integration::sync_flows::
//! cargo test -p hs-tests integration::http_sinks::
//!
//! # Benchmarks
//! cargo bench -p hs-tests
//! ```

#![allow(dead_code)]

pub mod fixtures;
pub mod mock_servers;
