//! Test utilities and module declarations for the ingest server tests.


use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use hooks_store_core::Document;
use hooks_store_storage::{EventStore, StorageError};

/// Records every indexed document; optionally fails every write.
#[derive(Default)]
pub struct MockStore {
    pub calls: AtomicUsize,
    pub docs: Mutex<Vec<Document>>,
    pub fail: bool,
}

impl MockStore {
    pub fn failing() -> Self {
        Self { fail: true, ..Self::default() }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    #[expect(clippy::unwrap_used, reason = "test code")]
    pub fn docs(&self) -> Vec<Document> {
        self.docs.lock().unwrap().clone()
    }
}

#[async_trait]
impl EventStore for MockStore {
    async fn index(&self, doc: &Document) -> Result<(), StorageError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(StorageError::Unhealthy {
                endpoint: "http://mock".to_owned(),
                reason: "down".to_owned(),
            });
        }
        self.docs.lock().map_err(|_| StorageError::ClientInit("poisoned".to_owned()))?.push(doc.clone());
        Ok(())
    }

    async fn close(&self) -> Result<(), StorageError> {
        Ok(())
    }
}

pub fn gateway_with(store: &Arc<MockStore>) -> crate::IngestGateway {
    crate::IngestGateway::new(Arc::clone(store) as Arc<dyn EventStore>)
}
