//! Command handlers, one module per noun.

pub mod items;
pub mod lists;

use serde::Serialize;

/// Print a value as pretty JSON on stdout.
fn print_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
