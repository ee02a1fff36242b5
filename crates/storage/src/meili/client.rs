use std::time::Duration;

use reqwest::{Method, RequestBuilder, Response};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::StorageError;

/// Default interval between task status polls.
pub const DEFAULT_TASK_POLL_INTERVAL: Duration = Duration::from_millis(500);
/// Default upper bound on waiting for one task.
pub const DEFAULT_TASK_TIMEOUT: Duration = Duration::from_secs(300);
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Acknowledgment returned by every asynchronous Meilisearch write.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskInfo {
    pub task_uid: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    Enqueued,
    Processing,
    Succeeded,
    Failed,
    Canceled,
}

impl TaskStatus {
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Succeeded | Self::Failed | Self::Canceled)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct TaskError {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub code: String,
}

/// Task state as reported by `GET /tasks/{uid}`.
#[derive(Debug, Clone, Deserialize)]
pub struct Task {
    pub uid: u64,
    pub status: TaskStatus,
    #[serde(default)]
    pub error: Option<TaskError>,
}

impl Task {
    /// Error code of a failed task, if any.
    #[must_use]
    pub fn error_code(&self) -> Option<&str> {
        self.error.as_ref().map(|e| e.code.as_str())
    }

    /// Turn a terminal task into a result: only `succeeded` is `Ok`.
    pub fn into_result(self, context: &str) -> Result<(), StorageError> {
        match self.status {
            TaskStatus::Succeeded => Ok(()),
            TaskStatus::Canceled => Err(StorageError::TaskFailed {
                context: context.to_owned(),
                task_uid: self.uid,
                message: "task was canceled".to_owned(),
            }),
            _ => Err(StorageError::TaskFailed {
                context: context.to_owned(),
                task_uid: self.uid,
                message: self.error.map(|e| e.message).unwrap_or_else(|| "unknown error".to_owned()),
            }),
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct DocumentsResponse {
    #[serde(default)]
    pub results: Vec<Map<String, Value>>,
    #[serde(default)]
    pub total: usize,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CreateIndexRequest<'a> {
    uid: &'a str,
    primary_key: &'a str,
}

/// Thin Meilisearch REST client.
///
/// Safe to share between tasks: `reqwest::Client` pools connections internally.
#[derive(Clone)]
pub struct MeiliClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    poll_interval: Duration,
    task_timeout: Duration,
}

impl std::fmt::Debug for MeiliClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MeiliClient")
            .field("base_url", &self.base_url)
            .field("api_key", &"***")
            .field("poll_interval", &self.poll_interval)
            .field("task_timeout", &self.task_timeout)
            .finish_non_exhaustive()
    }
}

impl MeiliClient {
    /// Creates a client for the instance at `base_url`. An empty key sends no
    /// `Authorization` header.
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be built (TLS backend failure).
    pub fn new(base_url: &str, api_key: &str) -> Result<Self, StorageError> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| StorageError::ClientInit(e.to_string()))?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_owned(),
            api_key: api_key.to_owned(),
            poll_interval: DEFAULT_TASK_POLL_INTERVAL,
            task_timeout: DEFAULT_TASK_TIMEOUT,
        })
    }

    /// Override how task completion is polled.
    #[must_use]
    pub fn with_task_polling(mut self, poll_interval: Duration, task_timeout: Duration) -> Self {
        self.poll_interval = poll_interval;
        self.task_timeout = task_timeout;
        self
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let builder = self.client.request(method, format!("{}{path}", self.base_url));
        if self.api_key.is_empty() {
            builder
        } else {
            builder.bearer_auth(&self.api_key)
        }
    }

    async fn check(response: Response, context: &str) -> Result<Response, StorageError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_else(|_| "could not read error body".to_owned());
        Err(StorageError::Status { context: context.to_owned(), code: status.as_u16(), body })
    }

    async fn send_for_task(&self, builder: RequestBuilder, context: &str) -> Result<TaskInfo, StorageError> {
        let response = Self::check(builder.send().await?, context).await?;
        response.json::<TaskInfo>().await.map_err(StorageError::from)
    }

    /// `GET /health`. Any non-success answer or transport error counts as unhealthy.
    pub async fn health(&self) -> Result<(), StorageError> {
        let unhealthy = |reason: String| StorageError::Unhealthy {
            endpoint: self.base_url.clone(),
            reason,
        };
        let response =
            self.request(Method::GET, "/health").send().await.map_err(|e| unhealthy(e.to_string()))?;
        if response.status().is_success() {
            Ok(())
        } else {
            Err(unhealthy(format!("health endpoint returned {}", response.status())))
        }
    }

    /// `POST /indexes`. Enqueues index creation; an existing index makes the task fail
    /// with code `index_already_exists`.
    pub async fn create_index(&self, uid: &str, primary_key: &str) -> Result<TaskInfo, StorageError> {
        let body = CreateIndexRequest { uid, primary_key };
        self.send_for_task(self.request(Method::POST, "/indexes").json(&body), "create index").await
    }

    /// `PATCH /indexes/{uid}/settings` with a partial settings object.
    pub async fn update_settings(&self, uid: &str, settings: &Value) -> Result<TaskInfo, StorageError> {
        let path = format!("/indexes/{uid}/settings");
        self.send_for_task(self.request(Method::PATCH, &path).json(settings), "update settings").await
    }

    /// `POST /indexes/{uid}/documents`: add or replace whole documents.
    pub async fn add_documents<T: Serialize + Sync>(
        &self,
        uid: &str,
        docs: &[T],
        primary_key: &str,
    ) -> Result<TaskInfo, StorageError> {
        let path = format!("/indexes/{uid}/documents");
        let builder =
            self.request(Method::POST, &path).query(&[("primaryKey", primary_key)]).json(docs);
        self.send_for_task(builder, "add documents").await
    }

    /// `PUT /indexes/{uid}/documents`: add or merge partial documents.
    pub async fn update_documents(
        &self,
        uid: &str,
        docs: &[Map<String, Value>],
        primary_key: &str,
    ) -> Result<TaskInfo, StorageError> {
        let path = format!("/indexes/{uid}/documents");
        let builder =
            self.request(Method::PUT, &path).query(&[("primaryKey", primary_key)]).json(docs);
        self.send_for_task(builder, "update documents").await
    }

    /// `GET /indexes/{uid}/documents` restricted to `fields`.
    pub(crate) async fn get_documents(
        &self,
        uid: &str,
        offset: usize,
        limit: usize,
        fields: &[&str],
    ) -> Result<DocumentsResponse, StorageError> {
        let path = format!("/indexes/{uid}/documents");
        let query = [
            ("offset", offset.to_string()),
            ("limit", limit.to_string()),
            ("fields", fields.join(",")),
        ];
        let response = self.request(Method::GET, &path).query(&query).send().await?;
        let response = Self::check(response, "get documents").await?;
        let body = response.text().await?;
        serde_json::from_str(&body)
            .map_err(|source| StorageError::Json { context: "documents page".to_owned(), source })
    }

    /// `GET /tasks/{uid}`.
    pub async fn get_task(&self, task_uid: u64) -> Result<Task, StorageError> {
        let response = self.request(Method::GET, &format!("/tasks/{task_uid}")).send().await?;
        let response = Self::check(response, "get task").await?;
        let body = response.text().await?;
        serde_json::from_str(&body)
            .map_err(|source| StorageError::Json { context: format!("task {task_uid}"), source })
    }

    /// Poll a task until it reaches a terminal state.
    ///
    /// Returns the terminal task whatever its status; use [`Task::into_result`]
    /// to treat anything but `succeeded` as an error.
    pub async fn wait_for_task(&self, task_uid: u64, context: &str) -> Result<Task, StorageError> {
        let started = tokio::time::Instant::now();
        loop {
            let task = self.get_task(task_uid).await?;
            if task.status.is_terminal() {
                return Ok(task);
            }
            if started.elapsed() >= self.task_timeout {
                return Err(StorageError::TaskTimeout {
                    context: context.to_owned(),
                    task_uid,
                    waited_secs: self.task_timeout.as_secs(),
                });
            }
            tokio::time::sleep(self.poll_interval).await;
        }
    }
}
