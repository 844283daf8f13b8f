use checklist_core::Checklist;

use crate::app::AppContext;
use crate::output::format_checklist_line;

use super::print_json;

pub fn handle_new(ctx: &AppContext, name: &str) -> anyhow::Result<()> {
    let store = ctx.open_store()?;
    let checklist = Checklist::create(&store, name)?;
    tracing::debug!(id = %checklist.id, "checklist created");

    if ctx.json() {
        print_json(&checklist)?;
    } else {
        println!("{}", checklist.id);
    }
    Ok(())
}

pub fn handle_show_all(ctx: &AppContext) -> anyhow::Result<()> {
    let store = ctx.open_store()?;
    let checklists = Checklist::all(&store)?;

    if ctx.json() {
        return print_json(&checklists);
    }
    for checklist in &checklists {
        println!("{}", format_checklist_line(checklist));
    }
    Ok(())
}
