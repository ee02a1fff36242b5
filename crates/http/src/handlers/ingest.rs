use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::extract::rejection::BytesRejection;
use axum::http::StatusCode;
use axum::Json;
use hooks_store_core::MAX_BODY_LEN;
use serde::Serialize;

use crate::api_error::ApiError;
use crate::error::IngestError;
use crate::gateway::IngestGateway;

#[derive(Debug, Serialize)]
pub struct IngestResponse {
    pub status: &'static str,
    pub id: String,
}

/// `POST /ingest`.
///
/// The submission runs on its own task so a client hanging up mid-request
/// does not cancel a write that already started.
pub async fn ingest(
    State(gateway): State<Arc<IngestGateway>>,
    body: Result<Bytes, BytesRejection>,
) -> Result<(StatusCode, Json<IngestResponse>), ApiError> {
    let body = match body {
        Ok(body) => body,
        Err(rejection) => {
            let err = if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
                IngestError::TooLarge { limit: MAX_BODY_LEN }
            } else {
                IngestError::ReadBody(rejection.body_text())
            };
            return Err(gateway.reject(err).into());
        },
    };

    let task_gateway = Arc::clone(&gateway);
    let accepted = tokio::spawn(async move { task_gateway.submit(&body).await })
        .await
        .map_err(|e| ApiError::Internal(format!("ingest task failed: {e}")))??;

    Ok((StatusCode::ACCEPTED, Json(IngestResponse { status: "accepted", id: accepted.id })))
}
