//! # Documents
//!
//! Storage-agnostic documents derived from ledger writes, and the add/remove
//! sets a sink applies.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Reserved field holding the normalized primary key.
pub const FIELD_ID: &str = "_fabric_id";
/// Reserved field holding the transaction id.
pub const FIELD_TXID: &str = "_fabric_txid";
/// Reserved field holding the transaction date in epoch milliseconds.
pub const FIELD_DATE: &str = "_fabric_date";

/// Chaincode namespaces managed by Fabric itself, never indexed.
pub const SYSTEM_NAMESPACES: [&str; 2] = ["lscc", "_lifecycle"];

/// Whether `namespace` belongs to a Fabric system chaincode.
pub fn is_system_namespace(namespace: &str) -> bool {
    SYSTEM_NAMESPACES.contains(&namespace)
}

/// Identity of a document inside a sink.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct DocumentKey {
    pub chaincode_id: String,
    pub primary_key: String,
}

impl DocumentKey {
    pub fn new(chaincode_id: impl Into<String>, primary_key: impl Into<String>) -> Self {
        Self {
            chaincode_id: chaincode_id.into(),
            primary_key: primary_key.into(),
        }
    }
}

/// One ledger key as it should appear downstream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Normalized key (no NUL bytes).
    pub primary_key: String,
    pub channel_id: String,
    /// The chaincode namespace that wrote the key.
    pub chaincode_id: String,
    pub tx_id: String,
    pub tx_date_millis: i64,
    pub block_number: u64,
    /// Key-ordered JSON body including the reserved `_fabric_*` fields.
    pub data: Map<String, Value>,
}

impl Document {
    pub fn key(&self) -> DocumentKey {
        DocumentKey::new(self.chaincode_id.clone(), self.primary_key.clone())
    }
}

/// Documents to upsert and to remove, derived from one or more blocks.
///
/// Inserting into one map always evicts the same key from the other, so
/// a key is present in at most one of them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExtractionResult {
    to_add: BTreeMap<DocumentKey, Document>,
    to_remove: BTreeMap<DocumentKey, Document>,
}

impl ExtractionResult {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `doc` as the latest state of its key.
    pub fn add(&mut self, doc: Document) {
        let key = doc.key();
        self.to_remove.remove(&key);
        self.to_add.insert(key, doc);
    }

    /// Record that the key of `doc` was deleted.
    pub fn remove(&mut self, doc: Document) {
        let key = doc.key();
        self.to_add.remove(&key);
        self.to_remove.insert(key, doc);
    }

    /// Fold a later result into this one; entries of `later` win.
    pub fn absorb(&mut self, later: ExtractionResult) {
        for (_, doc) in later.to_add {
            self.add(doc);
        }
        for (_, doc) in later.to_remove {
            self.remove(doc);
        }
    }

    pub fn to_add(&self) -> &BTreeMap<DocumentKey, Document> {
        &self.to_add
    }

    pub fn to_remove(&self) -> &BTreeMap<DocumentKey, Document> {
        &self.to_remove
    }

    /// Documents to upsert, excluding Fabric system namespaces.
    pub fn indexable_additions(&self) -> impl Iterator<Item = &Document> {
        self.to_add
            .values()
            .filter(|doc| !is_system_namespace(&doc.chaincode_id))
    }

    /// Documents to remove, excluding Fabric system namespaces.
    pub fn indexable_removals(&self) -> impl Iterator<Item = &Document> {
        self.to_remove
            .values()
            .filter(|doc| !is_system_namespace(&doc.chaincode_id))
    }

    pub fn is_empty(&self) -> bool {
        self.to_add.is_empty() && self.to_remove.is_empty()
    }

    pub fn len(&self) -> usize {
        self.to_add.len() + self.to_remove.len()
    }
}
