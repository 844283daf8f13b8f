use checklist_core::{Checklist, ChecklistId, Item, ItemId};

use crate::app::AppContext;
use crate::output::{checklist_items_json, format_header, format_item_line, toggle_json};

use super::print_json;

pub fn handle_new(ctx: &AppContext, checklist_id: ChecklistId, text: &str) -> anyhow::Result<()> {
    let store = ctx.open_store()?;
    let item = Item::create(&store, checklist_id, text)?;
    tracing::debug!(id = %item.id, checklist = %checklist_id, "item created");

    if ctx.json() {
        print_json(&item)?;
    } else {
        println!("{}", item.id);
    }
    Ok(())
}

pub fn handle_show_all(
    ctx: &AppContext,
    checklist_id: ChecklistId,
    omit_header: bool,
) -> anyhow::Result<()> {
    let store = ctx.open_store()?;
    let checklist = Checklist::load(&store, checklist_id)?;
    let items = checklist.items(&store)?;

    if ctx.json() {
        return print_json(&checklist_items_json(&checklist, &items));
    }
    if !omit_header {
        println!("{}", format_header(&checklist));
    }
    for item in &items {
        println!("{}", format_item_line(item));
    }
    Ok(())
}

pub fn handle_toggle(ctx: &AppContext, id: ItemId) -> anyhow::Result<()> {
    let store = ctx.open_store()?;
    let checked = Item::toggle_by_id(&store, id)?;

    if ctx.json() {
        print_json(&toggle_json(id, checked))?;
    } else {
        println!("{}", u8::from(checked));
    }
    Ok(())
}
