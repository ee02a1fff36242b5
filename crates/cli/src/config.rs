//! Command-line and environment configuration.

use clap::Args;
use hooks_store_core::{DEFAULT_EVENTS_INDEX, DEFAULT_MIGRATION_BATCH_SIZE, DEFAULT_PROMPTS_INDEX};
use hooks_store_storage::MeiliConfig;

const DEFAULT_PORT: u16 = 9800;
const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_MEILI_URL: &str = "http://localhost:7700";

/// Settings shared by every subcommand.
#[derive(Debug, Clone, Args)]
pub(crate) struct Settings {
    /// HTTP listen port (0 picks a free port)
    #[arg(long, env = "HOOKS_STORE_PORT", default_value_t = DEFAULT_PORT, global = true)]
    pub port: u16,

    /// HTTP listen address
    #[arg(long, env = "HOOKS_STORE_HOST", default_value = DEFAULT_HOST, global = true)]
    pub host: String,

    /// Meilisearch endpoint
    #[arg(long, env = "MEILI_URL", default_value = DEFAULT_MEILI_URL, global = true)]
    pub meili_url: String,

    /// Meilisearch API key
    #[arg(long, env = "MEILI_KEY", hide_env_values = true, global = true)]
    pub meili_key: Option<String>,

    /// Primary events index
    #[arg(long, env = "MEILI_INDEX", default_value = DEFAULT_EVENTS_INDEX, global = true)]
    pub meili_index: String,

    /// Prompts index; pass an empty string to disable it
    #[arg(long, env = "MEILI_PROMPTS_INDEX", default_value = DEFAULT_PROMPTS_INDEX, global = true)]
    pub prompts_index: String,
}

impl Settings {
    pub(crate) fn meili_config(&self) -> MeiliConfig {
        MeiliConfig::new(&self.meili_url, self.meili_key.clone().unwrap_or_default())
            .events_index(&self.meili_index)
            .prompts_index(Some(self.prompts_index.clone()))
    }

    pub(crate) fn listen_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(Debug, Clone, Args)]
pub(crate) struct MigrateArgs {
    /// Documents read and written per batch
    #[arg(long, default_value_t = DEFAULT_MIGRATION_BATCH_SIZE)]
    pub batch_size: usize,

    /// Skip rewriting `data_flat`
    #[arg(long)]
    pub skip_data_flat: bool,

    /// Skip rebuilding the prompts index
    #[arg(long)]
    pub skip_prompts: bool,
}
