//! Plain text formatting for checklists and items.

use checklist_core::{Checklist, Item};

const RULE: &str = "==========================";

/// `id: name` line for a checklist.
pub fn format_checklist_line(checklist: &Checklist) -> String {
    format!("{:>6}: {}", checklist.id, checklist.name)
}

/// Checklist header shown above its items.
pub fn format_header(checklist: &Checklist) -> String {
    format!("{}\n{}", format_checklist_line(checklist), RULE)
}

/// `id: [x] text` line for an item.
pub fn format_item_line(item: &Item) -> String {
    let mark = if item.checked { 'x' } else { ' ' };
    format!("{:>6}: [{}] {}", item.id, mark, item.text)
}
