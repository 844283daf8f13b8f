//! Constants used throughout the CLI.

/// Exit codes for the CLI.
///
/// These follow common Unix conventions:
/// - 0: Success
/// - 1: General error (I/O, storage, anything unclassified)
/// - 2: Misuse of shell command (clap uses this for bad arguments)
/// - 3+: Application-specific errors
pub mod exit_codes {
    /// Unclassified failure.
    pub const GENERAL: i32 = 1;

    /// Checklist or item not found.
    pub const NOT_FOUND: i32 = 3;

    /// Invalid user input or key.
    pub const INVALID_INPUT: i32 = 4;

    /// Wrong key, or the store file is not a readable store.
    pub const AUTH_FAILED: i32 = 5;

    /// Store contents violate an integrity rule.
    pub const INTEGRITY_FAILED: i32 = 6;

    /// Another process holds the store.
    pub const LOCKED: i32 = 7;
}

/// Environment variable selecting the tracing filter.
pub const LOG_ENV: &str = "CHECKLIST_LOG";

/// Environment variable overriding the config file location.
pub const CONFIG_ENV: &str = "CHECKLIST_CONFIG";
