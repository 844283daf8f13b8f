//! JSON output formatting for checklists and items.

use checklist_core::{Checklist, Item, ItemId};

/// A checklist together with its items.
pub fn checklist_items_json(checklist: &Checklist, items: &[Item]) -> serde_json::Value {
    serde_json::json!({
        "checklist": checklist,
        "items": items,
    })
}

/// The result of a toggle.
pub fn toggle_json(id: ItemId, checked: bool) -> serde_json::Value {
    serde_json::json!({
        "id": id,
        "checked": checked,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use checklist_core::ChecklistId;

    #[test]
    fn test_checklist_items_shape() {
        let checklist = Checklist {
            id: ChecklistId::new(1),
            name: "Groceries".to_string(),
        };
        let items = vec![Item {
            id: ItemId::new(3),
            checklist_id: ChecklistId::new(1),
            text: "Milk".to_string(),
            checked: true,
        }];

        let value = checklist_items_json(&checklist, &items);
        assert_eq!(value["checklist"]["id"], 1);
        assert_eq!(value["checklist"]["name"], "Groceries");
        assert_eq!(value["items"][0]["id"], 3);
        assert_eq!(value["items"][0]["checked"], true);
    }

    #[test]
    fn test_toggle_shape() {
        let value = toggle_json(ItemId::new(2), false);
        assert_eq!(value, serde_json::json!({"id": 2, "checked": false}));
    }
}
