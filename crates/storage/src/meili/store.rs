use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use hooks_store_core::{
    env_parse_with_default, Document, PromptDocument, DEFAULT_EVENTS_INDEX, DEFAULT_PROMPTS_INDEX,
    PRIMARY_KEY,
};
use serde_json::{Map, Value};

use super::client::{MeiliClient, DEFAULT_TASK_POLL_INTERVAL, DEFAULT_TASK_TIMEOUT};
use super::settings::IndexSettings;
use crate::error::StorageError;
use crate::traits::{BackfillStore, DocumentPage, EventStore};

/// Connection and index configuration for [`MeiliStore::open`].
#[derive(Debug, Clone)]
pub struct MeiliConfig {
    pub url: String,
    pub api_key: String,
    pub events_index: String,
    /// `None` disables the prompts index and its dual write.
    pub prompts_index: Option<String>,
    pub task_poll_interval: Duration,
    pub task_timeout: Duration,
}

impl MeiliConfig {
    /// Configuration with default index names and task polling read from
    /// `HOOKS_STORE_TASK_POLL_MS` / `HOOKS_STORE_TASK_TIMEOUT_SECS`.
    #[must_use]
    pub fn new(url: impl Into<String>, api_key: impl Into<String>) -> Self {
        let poll_ms = env_parse_with_default(
            "HOOKS_STORE_TASK_POLL_MS",
            u64::try_from(DEFAULT_TASK_POLL_INTERVAL.as_millis()).unwrap_or(500),
        );
        let timeout_secs =
            env_parse_with_default("HOOKS_STORE_TASK_TIMEOUT_SECS", DEFAULT_TASK_TIMEOUT.as_secs());
        Self {
            url: url.into(),
            api_key: api_key.into(),
            events_index: DEFAULT_EVENTS_INDEX.to_owned(),
            prompts_index: Some(DEFAULT_PROMPTS_INDEX.to_owned()),
            task_poll_interval: Duration::from_millis(poll_ms),
            task_timeout: Duration::from_secs(timeout_secs),
        }
    }

    #[must_use]
    pub fn events_index(mut self, name: impl Into<String>) -> Self {
        self.events_index = name.into();
        self
    }

    /// Set the prompts index; an empty name disables it.
    #[must_use]
    pub fn prompts_index(mut self, name: Option<String>) -> Self {
        self.prompts_index = name.filter(|n| !n.trim().is_empty());
        self
    }
}

/// [`EventStore`] and [`BackfillStore`] backed by Meilisearch.
#[derive(Debug)]
pub struct MeiliStore {
    client: MeiliClient,
    events_index: String,
    prompts_index: Option<String>,
    closed: AtomicBool,
}

impl MeiliStore {
    /// Connect, provision indexes and wait for every settings task.
    ///
    /// Fails fast without retrying when the instance is unhealthy.
    pub async fn open(config: MeiliConfig) -> Result<Self, StorageError> {
        let client = MeiliClient::new(&config.url, &config.api_key)?
            .with_task_polling(config.task_poll_interval, config.task_timeout);

        client.health().await?;

        provision_index(&client, &config.events_index, &IndexSettings::events()).await?;
        if let Some(prompts) = config.prompts_index.as_deref() {
            provision_index(&client, prompts, &IndexSettings::prompts()).await?;
        }

        tracing::info!(
            url = %client.base_url(),
            events_index = %config.events_index,
            prompts_index = config.prompts_index.as_deref().unwrap_or("<disabled>"),
            "Meilisearch indexes ready"
        );

        Ok(Self {
            client,
            events_index: config.events_index,
            prompts_index: config.prompts_index,
            closed: AtomicBool::new(false),
        })
    }

    #[must_use]
    pub fn events_index_name(&self) -> &str {
        &self.events_index
    }

    #[must_use]
    pub fn prompts_index_name(&self) -> Option<&str> {
        self.prompts_index.as_deref()
    }

    async fn write_prompt(&self, index: &str, doc: &Document) {
        let prompt = doc.to_prompt_document();
        if let Err(e) = self.client.add_documents(index, &[prompt], PRIMARY_KEY).await {
            tracing::warn!(id = %doc.id, index, error = %e, "prompts index write failed");
        }
    }
}

async fn provision_index(
    client: &MeiliClient,
    uid: &str,
    settings: &IndexSettings,
) -> Result<(), StorageError> {
    let info = client.create_index(uid, PRIMARY_KEY).await?;
    let task = client.wait_for_task(info.task_uid, "create index").await?;
    if task.error_code() == Some("index_already_exists") {
        tracing::debug!(index = uid, "index already exists");
    } else {
        task.into_result(&format!("create index {uid}"))?;
    }

    for (name, body) in settings.updates() {
        let info = client.update_settings(uid, &body).await?;
        client.wait_for_task(info.task_uid, name).await?.into_result(&format!("{uid} {name}"))?;
        tracing::debug!(index = uid, setting = name, "settings applied");
    }
    Ok(())
}

#[async_trait]
impl EventStore for MeiliStore {
    async fn index(&self, doc: &Document) -> Result<(), StorageError> {
        self.client.add_documents(&self.events_index, std::slice::from_ref(doc), PRIMARY_KEY).await?;

        if let Some(prompts) = self.prompts_index.as_deref() {
            if doc.is_prompt() {
                self.write_prompt(prompts, doc).await;
            }
        }
        Ok(())
    }

    async fn close(&self) -> Result<(), StorageError> {
        if !self.closed.swap(true, Ordering::SeqCst) {
            tracing::debug!(index = %self.events_index, "Meilisearch store closed");
        }
        Ok(())
    }
}

#[async_trait]
impl BackfillStore for MeiliStore {
    async fn fetch_documents(
        &self,
        offset: usize,
        limit: usize,
        fields: &[&str],
    ) -> Result<DocumentPage, StorageError> {
        let page = self.client.get_documents(&self.events_index, offset, limit, fields).await?;
        Ok(DocumentPage { results: page.results, total: page.total })
    }

    async fn merge_documents(&self, partials: &[Map<String, Value>]) -> Result<(), StorageError> {
        if partials.is_empty() {
            return Ok(());
        }
        let info = self.client.update_documents(&self.events_index, partials, PRIMARY_KEY).await?;
        self.client
            .wait_for_task(info.task_uid, "merge documents")
            .await?
            .into_result("merge documents")
    }

    fn prompts_enabled(&self) -> bool {
        self.prompts_index.is_some()
    }

    async fn put_prompt_documents(&self, prompts: &[PromptDocument]) -> Result<(), StorageError> {
        let Some(index) = self.prompts_index.as_deref() else {
            return Ok(());
        };
        if prompts.is_empty() {
            return Ok(());
        }
        let info = self.client.add_documents(index, prompts, PRIMARY_KEY).await?;
        self.client
            .wait_for_task(info.task_uid, "add prompt documents")
            .await?
            .into_result("add prompt documents")
    }
}
