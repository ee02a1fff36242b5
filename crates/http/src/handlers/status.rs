use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;

use crate::gateway::IngestGateway;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub time: String,
}

#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub ingested: u64,
    pub errors: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_event: Option<String>,
}

fn rfc3339(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Secs, true)
}

pub async fn health(State(gateway): State<Arc<IngestGateway>>) -> Json<HealthResponse> {
    Json(HealthResponse { status: "healthy", time: rfc3339(gateway.health()) })
}

pub async fn stats(State(gateway): State<Arc<IngestGateway>>) -> Json<StatsResponse> {
    let snap = gateway.stats();
    Json(StatsResponse { ingested: snap.ingested, errors: snap.errors, last_event: snap.last_event.map(rfc3339) })
}
