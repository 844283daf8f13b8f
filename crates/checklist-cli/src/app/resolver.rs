//! Path resolution for config and store files.

use std::path::PathBuf;
use std::time::Duration;

use checklist_core::StoreOptions;

use crate::cli::Cli;
use crate::config::{default_config_path, default_store_path, read_config, ChecklistConfig};
use crate::constants::CONFIG_ENV;

/// Resolve the config file path, checking CHECKLIST_CONFIG env var first.
pub fn resolve_config_path() -> anyhow::Result<PathBuf> {
    if let Ok(value) = std::env::var(CONFIG_ENV) {
        if !value.trim().is_empty() {
            return Ok(PathBuf::from(value));
        }
    }
    default_config_path()
}

/// Load the config file, falling back to defaults when it does not exist.
pub fn load_config() -> anyhow::Result<ChecklistConfig> {
    let config_path = resolve_config_path()?;
    if !config_path.exists() {
        tracing::debug!(path = %config_path.display(), "no config file, using defaults");
        return Ok(ChecklistConfig::default());
    }
    read_config(&config_path)
}

/// Resolve the store file path from CLI args, config, or the XDG default.
///
/// Only the default location gets its parent directory created.
pub fn resolve_store_path(cli: &Cli, config: &ChecklistConfig) -> anyhow::Result<PathBuf> {
    if let Some(path) = cli.db.clone() {
        return Ok(path);
    }
    if let Some(path) = config.store.path.as_ref() {
        return Ok(PathBuf::from(path));
    }

    let path = default_store_path()?;
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| {
            anyhow::anyhow!(
                "Failed to create data directory {}: {}",
                parent.display(),
                e
            )
        })?;
    }
    Ok(path)
}

/// Build store options from CLI args and config.
pub fn resolve_store_options(cli: &Cli, config: &ChecklistConfig) -> StoreOptions {
    let mut options = StoreOptions::default();
    if let Some(work_factor) = cli.work_factor.or(config.store.work_factor) {
        options = options.with_work_factor(work_factor);
    }
    if let Some(ms) = config.store.lock_timeout_ms {
        options = options.with_lock_timeout(Duration::from_millis(ms));
    }
    options
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn parse(args: &[&str]) -> Cli {
        let mut full = vec!["checklist"];
        full.extend_from_slice(args);
        full.extend_from_slice(&["list", "show-all"]);
        Cli::try_parse_from(full).unwrap()
    }

    #[test]
    fn test_db_flag_wins_over_config() {
        let cli = parse(&["--db", "/tmp/flag.checklist"]);
        let mut config = ChecklistConfig::default();
        config.store.path = Some("/tmp/config.checklist".to_string());

        let path = resolve_store_path(&cli, &config).unwrap();
        assert_eq!(path, PathBuf::from("/tmp/flag.checklist"));
    }

    #[test]
    fn test_config_path_used_without_flag() {
        let cli = parse(&[]);
        if cli.db.is_some() {
            // CHECKLIST_DB set in the environment running the tests
            return;
        }
        let mut config = ChecklistConfig::default();
        config.store.path = Some("/tmp/config.checklist".to_string());

        let path = resolve_store_path(&cli, &config).unwrap();
        assert_eq!(path, PathBuf::from("/tmp/config.checklist"));
    }

    #[test]
    fn test_options_from_config() {
        let cli = parse(&[]);
        let mut config = ChecklistConfig::default();
        config.store.work_factor = Some(12);
        config.store.lock_timeout_ms = Some(250);

        let options = resolve_store_options(&cli, &config);
        assert_eq!(
            options.work_factor,
            cli.work_factor.or(Some(12))
        );
        assert_eq!(options.lock_timeout, Duration::from_millis(250));
    }

    #[test]
    fn test_work_factor_flag_wins() {
        let cli = parse(&["--work-factor", "10"]);
        let mut config = ChecklistConfig::default();
        config.store.work_factor = Some(18);

        let options = resolve_store_options(&cli, &config);
        assert_eq!(options.work_factor, Some(10));
    }
}
