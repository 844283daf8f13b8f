//! Key resolution.
//!
//! Order: `--key` / `CHECKLIST_KEY`, then `--key-file`, then the config's
//! key file, then the `user@host` identity of the current session.

use std::path::Path;

use anyhow::Context;
use checklist_core::KeyMaterial;

use crate::cli::Cli;
use crate::config::ChecklistConfig;

/// Resolve the store key for this invocation.
pub fn resolve_key(cli: &Cli, config: &ChecklistConfig) -> anyhow::Result<KeyMaterial> {
    if let Some(key) = cli.key.as_deref() {
        tracing::debug!("using key from --key");
        return Ok(KeyMaterial::new(key)?);
    }

    let key_file = cli
        .key_file
        .clone()
        .or_else(|| config.key.file.as_ref().map(Into::into));
    if let Some(path) = key_file {
        tracing::debug!(path = %path.display(), "using key file");
        return read_key_file(&path);
    }

    let identity = session_identity()?;
    tracing::debug!("using session identity as key");
    Ok(KeyMaterial::new(identity)?)
}

fn read_key_file(path: &Path) -> anyhow::Result<KeyMaterial> {
    let bytes = std::fs::read(path)
        .with_context(|| format!("Failed to read key file {}", path.display()))?;
    Ok(KeyMaterial::new(bytes)?)
}

/// `user@host` for the current session.
///
/// Both parts come from the operating system, not from login variables.
pub fn session_identity() -> anyhow::Result<String> {
    let user = whoami::fallible::username().context("Failed to determine the current user")?;
    let host = whoami::fallible::hostname().context("Failed to determine the host name")?;
    Ok(format!("{}@{}", user, host))
}
