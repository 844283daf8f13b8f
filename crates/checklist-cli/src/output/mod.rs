//! Output formatting helpers for the CLI.
//!
//! This module provides formatting utilities for displaying checklists and
//! items as plain text or JSON.

mod json;
mod text;

// Re-export public API
pub use json::{checklist_items_json, toggle_json};
pub use text::{format_checklist_line, format_header, format_item_line};
