use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use hooks_store_core::{env_parse_with_default, DEFAULT_OBSERVER_CAPACITY};
use hooks_store_http::{create_router, IngestEvent, IngestGateway, IngestObserver};
use hooks_store_storage::{EventStore, MeiliStore};
use tokio::sync::mpsc;

use super::shutdown_signal;
use crate::config::Settings;

const FEED_DRAIN_TIMEOUT: Duration = Duration::from_secs(2);

pub(crate) async fn run(settings: &Settings) -> Result<()> {
    tracing::info!(url = %settings.meili_url, "Connecting to Meilisearch");
    let store = Arc::new(
        MeiliStore::open(settings.meili_config())
            .await
            .with_context(|| format!("Meilisearch at {} is not usable", settings.meili_url))?,
    );

    let capacity = env_parse_with_default("HOOKS_STORE_OBSERVER_CAPACITY", DEFAULT_OBSERVER_CAPACITY);
    let (observer, feed_rx) = IngestObserver::channel(capacity);
    let feed = tokio::spawn(log_feed(feed_rx));

    let gateway = Arc::new(
        IngestGateway::new(Arc::clone(&store) as Arc<dyn EventStore>).with_observer(observer),
    );
    let router = create_router(Arc::clone(&gateway));

    let addr = settings.listen_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    let local = listener.local_addr()?;

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        meili_url = %settings.meili_url,
        events_index = store.events_index_name(),
        prompts_index = store.prompts_index_name().unwrap_or("<disabled>"),
        listening = %format!("http://{local}"),
        endpoints = "POST /ingest  GET /health  GET /stats",
        "hooks-store ready, waiting for events"
    );

    axum::serve(listener, router).with_graceful_shutdown(shutdown_signal()).await?;
    tracing::info!("Shutting down");

    let stats = gateway.stats();
    tracing::info!(
        ingested = stats.ingested,
        errors = stats.errors,
        dropped_notifications = gateway.dropped_notifications(),
        "Final ingest counters"
    );

    // Last sender goes with the gateway; the feed task then drains and ends.
    drop(gateway);
    if tokio::time::timeout(FEED_DRAIN_TIMEOUT, feed).await.is_err() {
        tracing::debug!("Live feed did not drain in time");
    }

    store.close().await?;
    Ok(())
}

async fn log_feed(mut rx: mpsc::Receiver<IngestEvent>) {
    while let Some(event) = rx.recv().await {
        tracing::debug!(
            hook_type = %event.kind,
            tool_name = %event.tool_name,
            session_id = %event.session_id,
            bytes = event.body_size,
            "event ingested"
        );
    }
}
