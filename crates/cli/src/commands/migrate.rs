//! Backfill command.
//!
//! Brings documents indexed under older transform rules up to date: extracted
//! fields first, then `data_flat`, then the prompts index (which reads the
//! fields written by the first pass). Every pass is idempotent, so an
//! interrupted run is resumed by running it again.

use anyhow::{Context, Result};
use hooks_store_storage::{EventStore, MeiliStore, MigrationError, Migrator};
use tokio_util::sync::CancellationToken;

use super::shutdown_signal;
use crate::config::{MigrateArgs, Settings};

#[derive(Debug, Default)]
struct Summary {
    fields: Option<usize>,
    data_flat: Option<usize>,
    prompts: Option<usize>,
}

impl Summary {
    fn print(&self) {
        let line = |name: &str, count: Option<usize>| match count {
            Some(n) => println!("  {name}: {n}"),
            None => println!("  {name}: skipped"),
        };
        line("field backfill (documents scanned)", self.fields);
        line("data_flat backfill (documents rewritten)", self.data_flat);
        line("prompts backfill (prompts written)", self.prompts);
    }
}

pub(crate) async fn run(settings: &Settings, args: &MigrateArgs) -> Result<()> {
    let store = MeiliStore::open(settings.meili_config())
        .await
        .with_context(|| format!("Meilisearch at {} is not usable", settings.meili_url))?;

    let cancel = CancellationToken::new();
    let watcher = tokio::spawn({
        let cancel = cancel.clone();
        async move {
            shutdown_signal().await;
            tracing::warn!("Interrupt received, stopping after the current batch");
            cancel.cancel();
        }
    });

    let migrator = Migrator::new(&store, args.batch_size, cancel);
    let mut summary = Summary::default();
    let outcome = run_passes(&migrator, args, &mut summary).await;
    watcher.abort();
    store.close().await?;

    println!("Migration summary ({}):", store.events_index_name());
    summary.print();

    match outcome {
        Ok(()) => {
            println!("\nMigration complete!");
            Ok(())
        },
        Err(e) if e.is_cancelled() => {
            println!("\nInterrupted after {} documents in the current pass; rerun to finish.", e.processed());
            Err(e.into())
        },
        Err(e) => Err(anyhow::Error::new(e).context("migration aborted")),
    }
}

async fn run_passes(
    migrator: &Migrator<'_, MeiliStore>,
    args: &MigrateArgs,
    summary: &mut Summary,
) -> Result<(), MigrationError> {
    println!("Backfilling extracted fields...");
    summary.fields = Some(migrator.backfill_fields().await?);

    if !args.skip_data_flat {
        println!("Backfilling data_flat...");
        summary.data_flat = Some(migrator.backfill_data_flat().await?);
    }

    if !args.skip_prompts {
        println!("Backfilling prompts index...");
        summary.prompts = Some(migrator.backfill_prompts().await?);
    }
    Ok(())
}
