//! In-memory sink for tests and dry runs.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use parking_lot::RwLock;
use shared_types::{Document, DocumentKey, ExtractionResult};

use crate::domain::SinkError;
use crate::ports::StorageSink;

/// Sink keeping indexed documents in a map.
#[derive(Default)]
pub struct InMemorySink {
    documents: RwLock<BTreeMap<DocumentKey, Document>>,
    applied: AtomicUsize,
    fail: AtomicBool,
}

impl InMemorySink {
    /// Create an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make subsequent `apply` calls fail (or succeed again).
    pub fn set_failing(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    /// Number of successful `apply` calls.
    pub fn applied_batches(&self) -> usize {
        self.applied.load(Ordering::SeqCst)
    }

    /// Current document for `key`.
    pub fn get(&self, key: &DocumentKey) -> Option<Document> {
        self.documents.read().get(key).cloned()
    }

    /// Number of indexed documents.
    pub fn len(&self) -> usize {
        self.documents.read().len()
    }

    /// Whether nothing is indexed.
    pub fn is_empty(&self) -> bool {
        self.documents.read().is_empty()
    }

    /// Snapshot of every indexed document.
    pub fn documents(&self) -> BTreeMap<DocumentKey, Document> {
        self.documents.read().clone()
    }
}

#[async_trait]
impl StorageSink for InMemorySink {
    async fn apply(&self, result: &ExtractionResult) -> Result<(), SinkError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(SinkError::Rejected("in-memory sink set to fail".to_string()));
        }

        let mut documents = self.documents.write();
        for doc in result.indexable_additions() {
            documents.insert(doc.key(), doc.clone());
        }
        for doc in result.indexable_removals() {
            documents.remove(&doc.key());
        }
        drop(documents);

        self.applied.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn name(&self) -> &str {
        "memory"
    }
}
