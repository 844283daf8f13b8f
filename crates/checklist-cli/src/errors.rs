//! CLI error types for structured error handling.
//!
//! Errors from the core library are classified here so every failure leaves
//! the process with a stable exit code.

use std::fmt;

use checklist_core::ChecklistError;

use crate::constants::exit_codes;

/// CLI-specific errors with associated exit codes.
#[derive(Debug)]
pub enum CliError {
    /// Checklist or item not found
    NotFound { message: String, hint: String },

    /// Authentication failed (wrong key, unreadable store)
    AuthFailed {
        message: String,
        hint: Option<String>,
    },

    /// Invalid user input
    InvalidInput(String),

    /// Store contents are inconsistent
    IntegrityFailed(String),

    /// Store is held by another process
    Locked(String),

    /// Anything else
    General(String),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::NotFound { message, hint } => {
                write!(f, "{}\n{}", message, hint)
            }
            CliError::AuthFailed { message, hint } => {
                if let Some(h) = hint {
                    write!(f, "{}\n{}", message, h)
                } else {
                    write!(f, "{}", message)
                }
            }
            CliError::InvalidInput(message)
            | CliError::IntegrityFailed(message)
            | CliError::Locked(message)
            | CliError::General(message) => write!(f, "{}", message),
        }
    }
}

impl std::error::Error for CliError {}

impl CliError {
    /// Create a NotFound error with message and hint.
    pub fn not_found(message: impl Into<String>, hint: impl Into<String>) -> Self {
        CliError::NotFound {
            message: message.into(),
            hint: hint.into(),
        }
    }

    /// Create an AuthFailed error with message and hint.
    pub fn auth_failed_with_hint(message: impl Into<String>, hint: impl Into<String>) -> Self {
        CliError::AuthFailed {
            message: message.into(),
            hint: Some(hint.into()),
        }
    }

    /// Create an InvalidInput error.
    pub fn invalid_input(message: impl Into<String>) -> Self {
        CliError::InvalidInput(message.into())
    }

    /// Classify an arbitrary error, looking through the anyhow chain for
    /// a core error.
    pub fn from_anyhow(err: anyhow::Error) -> Self {
        match err.downcast::<CliError>() {
            Ok(cli) => cli,
            Err(err) => match err.downcast_ref::<ChecklistError>() {
                Some(core) => CliError::from_core(core),
                None => CliError::General(format!("{:#}", err)),
            },
        }
    }

    /// Map a core error onto its CLI category.
    pub fn from_core(err: &ChecklistError) -> Self {
        match err {
            ChecklistError::ChecklistNotFound(_) => CliError::not_found(
                err.to_string(),
                "Hint: Run `checklist list show-all` to see checklist ids.",
            ),
            ChecklistError::ItemNotFound(_) => CliError::not_found(
                err.to_string(),
                "Hint: Run `checklist item show-all <CHECKLIST_ID>` to see item ids.",
            ),
            ChecklistError::Authentication(_) => CliError::auth_failed_with_hint(
                err.to_string(),
                "Hint: Check --key, --key-file or CHECKLIST_KEY.",
            ),
            ChecklistError::InvalidKey(_) | ChecklistError::WorkFactor { .. } => {
                CliError::invalid_input(err.to_string())
            }
            ChecklistError::Integrity(_) => CliError::IntegrityFailed(err.to_string()),
            ChecklistError::Locked(_) => CliError::Locked(err.to_string()),
            _ => CliError::General(err.to_string()),
        }
    }

    /// Get the exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::NotFound { .. } => exit_codes::NOT_FOUND,
            CliError::AuthFailed { .. } => exit_codes::AUTH_FAILED,
            CliError::InvalidInput(_) => exit_codes::INVALID_INPUT,
            CliError::IntegrityFailed(_) => exit_codes::INTEGRITY_FAILED,
            CliError::Locked(_) => exit_codes::LOCKED,
            CliError::General(_) => exit_codes::GENERAL,
        }
    }

    /// Print error message to stderr and exit with appropriate code.
    pub fn exit(&self) -> ! {
        eprintln!("Error: {}", self);
        std::process::exit(self.exit_code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use checklist_core::{ChecklistId, ItemId};
    use std::path::PathBuf;

    #[test]
    fn test_core_errors_map_to_exit_codes() {
        let cases = [
            (
                ChecklistError::ChecklistNotFound(ChecklistId::new(1)),
                exit_codes::NOT_FOUND,
            ),
            (ChecklistError::ItemNotFound(ItemId::new(1)), exit_codes::NOT_FOUND),
            (
                ChecklistError::Authentication("bad".into()),
                exit_codes::AUTH_FAILED,
            ),
            (ChecklistError::InvalidKey("empty".into()), exit_codes::INVALID_INPUT),
            (
                ChecklistError::WorkFactor {
                    log_n: 0,
                    min: 1,
                    max: 22,
                },
                exit_codes::INVALID_INPUT,
            ),
            (ChecklistError::Integrity("x".into()), exit_codes::INTEGRITY_FAILED),
            (
                ChecklistError::Locked(PathBuf::from("/tmp/db")),
                exit_codes::LOCKED,
            ),
            (ChecklistError::Storage("x".into()), exit_codes::GENERAL),
        ];

        for (err, code) in cases {
            assert_eq!(CliError::from_core(&err).exit_code(), code, "{}", err);
        }
    }

    #[test]
    fn test_from_anyhow_finds_core_error() {
        let err = anyhow::Error::new(ChecklistError::ItemNotFound(ItemId::new(9)));
        assert_eq!(CliError::from_anyhow(err).exit_code(), exit_codes::NOT_FOUND);
    }

    #[test]
    fn test_from_anyhow_finds_core_error_under_context() {
        let err = anyhow::Error::new(ChecklistError::Authentication("bad".into()))
            .context("Failed to open store");
        assert_eq!(CliError::from_anyhow(err).exit_code(), exit_codes::AUTH_FAILED);
    }

    #[test]
    fn test_from_anyhow_keeps_cli_error() {
        let err = anyhow::Error::new(CliError::invalid_input("nope"));
        assert_eq!(
            CliError::from_anyhow(err).exit_code(),
            exit_codes::INVALID_INPUT
        );
    }

    #[test]
    fn test_unclassified_is_general() {
        let err = anyhow::anyhow!("something odd");
        assert_eq!(CliError::from_anyhow(err).exit_code(), exit_codes::GENERAL);
    }
}
