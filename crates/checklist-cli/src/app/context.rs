//! Application context for the Checklist CLI.
//!
//! Bundles the parsed arguments with the loaded config so handlers do not
//! thread both through every call.

use checklist_core::{StorageEngine, Store};

use crate::cli::Cli;
use crate::config::ChecklistConfig;

use super::key::resolve_key;
use super::resolver::{load_config, resolve_store_options, resolve_store_path};

/// Application context that bundles CLI args with configuration.
pub struct AppContext<'a> {
    cli: &'a Cli,
    config: ChecklistConfig,
}

impl<'a> AppContext<'a> {
    /// Create a new application context, loading the config file if present.
    pub fn new(cli: &'a Cli) -> anyhow::Result<Self> {
        Ok(Self {
            cli,
            config: load_config()?,
        })
    }

    /// Whether records should be printed as JSON.
    pub fn json(&self) -> bool {
        self.cli.json
    }

    /// Resolve path, key and options, then open the store.
    pub fn open_store(&self) -> anyhow::Result<Store> {
        let path = resolve_store_path(self.cli, &self.config)?;
        let key = resolve_key(self.cli, &self.config)?;
        let options = resolve_store_options(self.cli, &self.config);

        tracing::debug!(path = %path.display(), "opening store");
        Ok(Store::open_with(&path, key, &options)?)
    }
}
