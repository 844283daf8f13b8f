//! Checklist CLI - encrypted checklists on the command line
//!
//! This is the command-line interface for Checklist. Each invocation opens
//! the store, runs one operation, prints the result and exits.

mod app;
mod cli;
mod commands;
mod config;
mod constants;
mod errors;
mod output;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::app::AppContext;
use crate::cli::{Cli, ItemVerb, ListVerb, Noun};
use crate::commands::{items, lists};
use crate::constants::LOG_ENV;
use crate::errors::CliError;

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(&cli) {
        CliError::from_anyhow(e).exit();
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    let ctx = AppContext::new(cli)?;

    match &cli.noun {
        Noun::List(action) => match &action.verb {
            ListVerb::New { name } => lists::handle_new(&ctx, name),
            ListVerb::ShowAll => lists::handle_show_all(&ctx),
        },
        Noun::Item(action) => match &action.verb {
            ItemVerb::New { checklist_id, text } => items::handle_new(&ctx, *checklist_id, text),
            ItemVerb::ShowAll {
                checklist_id,
                omit_header,
            } => items::handle_show_all(&ctx, *checklist_id, *omit_header),
            ItemVerb::Toggle { id } => items::handle_toggle(&ctx, *id),
        },
    }
}
