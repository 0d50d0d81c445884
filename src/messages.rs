//! Localized Messages
//!
//! Key lookup with English defaults; the page config may override any key.
//! Unknown keys come back as the key itself.

use std::collections::HashMap;

pub const NO_ITEMS_TO_ADD: &str = "modifytemplate.group.no.itemstoadd";
pub const ADD_EXISTING_ITEM: &str = "modifytemplate.group.add.existingitem";
pub const SELECT_ALL: &str = "modifytemplate.group.add.select.all";
pub const SELECT_NONE: &str = "modifytemplate.group.add.select.none";
pub const ADD_ITEM_BUTTON: &str = "modifytemplate.add.item.button";
pub const ITEM_CHECKBOX_TITLE: &str = "modifytemplate.item.checkbox.title";
pub const CANCEL_BUTTON: &str = "general.cancel.button";
pub const DELETE_COMMAND: &str = "general.command.delete";
pub const UNGROUP_COMMAND: &str = "modifytemplate.group.ungroup";
pub const CANNOT_DELETE_ITEM: &str = "modifytemplate.group.cannot.delete.item";
pub const REQUEST_FAILED: &str = "modifytemplate.request.failed";
pub const SAVE_ORDER_BUTTON: &str = "modifytemplate.save.order.button";
pub const ADD_NEW_GROUP_ITEM: &str = "modifytemplate.group.add.newitem";
pub const ITEMS_TOTAL: &str = "modifytemplate.items.total";

const DEFAULTS: &[(&str, &str)] = &[
    (NO_ITEMS_TO_ADD, "There are no items of this type to add to the group."),
    (ADD_EXISTING_ITEM, "Add existing items to group"),
    (SELECT_ALL, "Select all"),
    (SELECT_NONE, "Select none"),
    (ADD_ITEM_BUTTON, "Add items"),
    (ITEM_CHECKBOX_TITLE, "Select this item"),
    (CANCEL_BUTTON, "Cancel"),
    (DELETE_COMMAND, "Delete"),
    (UNGROUP_COMMAND, "Ungroup"),
    (CANNOT_DELETE_ITEM, "A group must keep at least two items; this item cannot be removed."),
    (REQUEST_FAILED, "The server could not complete the request."),
    (SAVE_ORDER_BUTTON, "Save item order"),
    (ADD_NEW_GROUP_ITEM, "Add new item to group"),
    (ITEMS_TOTAL, "Items"),
];

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Messages {
    overrides: HashMap<String, String>,
}

impl Messages {
    pub fn new(overrides: HashMap<String, String>) -> Self {
        Self { overrides }
    }

    pub fn get(&self, key: &str) -> String {
        if let Some(text) = self.overrides.get(key) {
            return text.clone();
        }
        DEFAULTS
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, text)| text.to_string())
            .unwrap_or_else(|| key.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_and_override() {
        let mut overrides = HashMap::new();
        overrides.insert(DELETE_COMMAND.to_string(), "Löschen".to_string());
        let messages = Messages::new(overrides);
        assert_eq!(messages.get(DELETE_COMMAND), "Löschen");
        assert_eq!(messages.get(UNGROUP_COMMAND), "Ungroup");
    }

    #[test]
    fn test_unknown_key_echoes() {
        assert_eq!(Messages::default().get("no.such.key"), "no.such.key");
    }
}
