//! Test utilities and module declarations for storage tests.


use std::collections::BTreeMap;
use std::sync::Mutex;

use async_trait::async_trait;
use hooks_store_core::PromptDocument;
use serde_json::{Map, Value};
use tokio_util::sync::CancellationToken;

use crate::{BackfillStore, DocumentPage, StorageError};

/// In-memory [`BackfillStore`] with injectable failures.
#[derive(Default)]
pub struct FakeStore {
    pub docs: Mutex<Vec<Map<String, Value>>>,
    pub prompts: Mutex<BTreeMap<String, PromptDocument>>,
    pub prompts_disabled: bool,
    pub merge_calls: Mutex<usize>,
    pub fetch_calls: Mutex<usize>,
    /// Fetches at or past this offset fail.
    pub fail_fetch_from: Option<usize>,
    /// Cancelled right after the first merge completes.
    pub cancel_on_merge: Option<CancellationToken>,
}

impl FakeStore {
    pub fn with_docs(docs: Vec<Value>) -> Self {
        let docs = docs
            .into_iter()
            .filter_map(|v| match v {
                Value::Object(map) => Some(map),
                _ => None,
            })
            .collect();
        Self { docs: Mutex::new(docs), ..Self::default() }
    }

    #[expect(clippy::unwrap_used, reason = "test code")]
    pub fn doc(&self, id: &str) -> Map<String, Value> {
        self.docs
            .lock()
            .unwrap()
            .iter()
            .find(|d| d.get("id").and_then(Value::as_str) == Some(id))
            .cloned()
            .unwrap()
    }

    #[expect(clippy::unwrap_used, reason = "test code")]
    pub fn snapshot(&self) -> Vec<Map<String, Value>> {
        self.docs.lock().unwrap().clone()
    }
}

#[async_trait]
impl BackfillStore for FakeStore {
    async fn fetch_documents(
        &self,
        offset: usize,
        limit: usize,
        fields: &[&str],
    ) -> Result<DocumentPage, StorageError> {
        *self.fetch_calls.lock().unwrap() += 1;
        if self.fail_fetch_from.is_some_and(|from| offset >= from) {
            return Err(StorageError::Status {
                context: "get documents".to_owned(),
                code: 500,
                body: "boom".to_owned(),
            });
        }
        let docs = self.docs.lock().unwrap();
        let results = docs
            .iter()
            .skip(offset)
            .take(limit)
            .map(|doc| {
                doc.iter()
                    .filter(|(k, _)| fields.contains(&k.as_str()))
                    .map(|(k, v)| (k.clone(), v.clone()))
                    .collect()
            })
            .collect();
        Ok(DocumentPage { results, total: docs.len() })
    }

    async fn merge_documents(&self, partials: &[Map<String, Value>]) -> Result<(), StorageError> {
        {
            let mut docs = self.docs.lock().unwrap();
            for partial in partials {
                let id = partial.get("id").cloned();
                if let Some(doc) = docs.iter_mut().find(|d| d.get("id") == id.as_ref()) {
                    doc.extend(partial.iter().map(|(k, v)| (k.clone(), v.clone())));
                }
            }
        }
        *self.merge_calls.lock().unwrap() += 1;
        if let Some(token) = &self.cancel_on_merge {
            token.cancel();
        }
        Ok(())
    }

    fn prompts_enabled(&self) -> bool {
        !self.prompts_disabled
    }

    async fn put_prompt_documents(&self, prompts: &[PromptDocument]) -> Result<(), StorageError> {
        let mut stored = self.prompts.lock().unwrap();
        for prompt in prompts {
            stored.insert(prompt.id.clone(), prompt.clone());
        }
        Ok(())
    }
}
