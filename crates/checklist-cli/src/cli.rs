//! Command-line argument definitions.

use std::path::PathBuf;

use checklist_core::{ChecklistId, ItemId, StoreOptions, VERSION};
use clap::{Args, Parser, Subcommand};

/// Checklist - encrypted checklists on the command line
#[derive(Debug, Parser)]
#[command(name = "checklist")]
#[command(author, version = VERSION, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to the store file
    #[arg(long, global = true, env = "CHECKLIST_DB", value_name = "PATH")]
    pub db: Option<PathBuf>,

    /// Encryption key given directly
    #[arg(long, global = true, env = "CHECKLIST_KEY", hide_env_values = true)]
    pub key: Option<String>,

    /// Read the encryption key from a file
    #[arg(long, global = true, value_name = "PATH", conflicts_with = "key")]
    pub key_file: Option<PathBuf>,

    /// scrypt work factor (log2 N) for writes
    #[arg(
        long,
        global = true,
        hide = true,
        env = "CHECKLIST_WORK_FACTOR",
        value_parser = clap::value_parser!(u8).range(
            i64::from(StoreOptions::MIN_WORK_FACTOR)..=i64::from(StoreOptions::MAX_WORK_FACTOR)
        )
    )]
    pub work_factor: Option<u8>,

    /// Print records as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Verbose logging to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub noun: Noun,
}

#[derive(Debug, Subcommand)]
pub enum Noun {
    /// Manage checklists
    List(ListVerbAction),

    /// Manage items
    Item(ItemVerbAction),
}

#[derive(Debug, Args)]
pub struct ListVerbAction {
    #[command(subcommand)]
    pub verb: ListVerb,
}

#[derive(Debug, Subcommand)]
pub enum ListVerb {
    /// Show all checklists
    ShowAll,

    /// Create a new checklist
    New {
        /// Name of the checklist
        name: String,
    },
}

#[derive(Debug, Args)]
pub struct ItemVerbAction {
    #[command(subcommand)]
    pub verb: ItemVerb,
}

#[derive(Debug, Subcommand)]
pub enum ItemVerb {
    /// Show all items in a checklist
    ShowAll {
        /// Checklist whose items to show
        checklist_id: ChecklistId,

        /// Omit the checklist header
        #[arg(short, long)]
        omit_header: bool,
    },

    /// Create a new item in a checklist
    New {
        /// Checklist to put the item in
        checklist_id: ChecklistId,

        /// Text of the item
        text: String,
    },

    /// Toggle the completion state of an item
    Toggle {
        /// Item to toggle
        id: ItemId,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_toggle() {
        let cli = Cli::try_parse_from(["checklist", "item", "toggle", "4"]).unwrap();
        assert!(matches!(
            cli.noun,
            Noun::Item(ItemVerbAction {
                verb: ItemVerb::Toggle { id }
            }) if id == ItemId::new(4)
        ));
    }

    #[test]
    fn test_non_numeric_id_rejected() {
        assert!(Cli::try_parse_from(["checklist", "item", "toggle", "four"]).is_err());
    }

    #[test]
    fn test_work_factor_flag_is_bounded() {
        for value in ["0", "23", "64"] {
            let result =
                Cli::try_parse_from(["checklist", "--work-factor", value, "list", "show-all"]);
            assert!(result.is_err(), "{} should be rejected", value);
        }
    }

    #[test]
    fn test_key_and_key_file_conflict() {
        let result = Cli::try_parse_from([
            "checklist",
            "--key",
            "k",
            "--key-file",
            "/tmp/k",
            "list",
            "show-all",
        ]);
        assert!(result.is_err());
    }
}
