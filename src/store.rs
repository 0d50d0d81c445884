//! Template State Store
//!
//! Versioned in-memory view of the template's items, blocks and order.
//! Every structural mutation bumps the version; derived views (candidates,
//! counts, labels) are recomputed from it rather than cached.

use std::collections::{BTreeSet, HashMap};

use crate::models::{Block, ItemId, ItemType, Membership, SnapshotItem, TemplateItem, TemplateSnapshot, TopLevelRow};

/// Label shown on the "take evaluation" action when the server sends none
pub const DEFAULT_BEGIN_EVAL_LABEL: &str = "Start an evaluation using this template";

#[derive(Debug, Clone, PartialEq, Default)]
pub struct TemplateState {
    pub template_id: String,
    pub rows: Vec<TopLevelRow>,
    /// Label of the primary call-to-action, kept across link/placeholder swaps
    pub begin_eval_label: String,
    version: u64,
    /// Top-level order as last persisted by the server
    pub(crate) saved_order: Vec<ItemId>,
    /// Set while an order save is in flight
    pub(crate) order_submitting: bool,
    /// Rows showing a busy indicator
    busy: BTreeSet<ItemId>,
}

impl TemplateState {
    pub fn from_snapshot(snapshot: TemplateSnapshot) -> Self {
        let mut state = Self::default();
        state.apply_snapshot(snapshot);
        state
    }

    /// Replace everything with authoritative server state
    pub fn apply_snapshot(&mut self, snapshot: TemplateSnapshot) {
        self.template_id = snapshot.template_id;
        if let Some(label) = snapshot.begin_eval_label {
            self.begin_eval_label = label;
        } else if self.begin_eval_label.is_empty() {
            self.begin_eval_label = DEFAULT_BEGIN_EVAL_LABEL.to_string();
        }
        self.rows = build_rows(snapshot.items);
        self.saved_order = self.rows.iter().map(|r| r.id().clone()).collect();
        self.order_submitting = false;
        self.busy.clear();
        self.touch();
        log::info!(
            "loaded template {} with {} top-level rows (version {})",
            self.template_id,
            self.rows.len(),
            self.version
        );
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    fn touch(&mut self) {
        self.version += 1;
    }

    /// Count of visible top-level rows (a block counts once)
    pub fn visible_count(&self) -> usize {
        self.rows.len()
    }

    pub fn row_index(&self, id: &ItemId) -> Option<usize> {
        self.rows.iter().position(|r| r.id() == id)
    }

    pub fn block(&self, id: &ItemId) -> Option<&Block> {
        self.rows.iter().filter_map(TopLevelRow::as_block).find(|b| b.id() == id)
    }

    /// Block containing `child_id`, if any
    pub fn block_of_child(&self, child_id: &ItemId) -> Option<&Block> {
        self.rows
            .iter()
            .filter_map(TopLevelRow::as_block)
            .find(|b| b.children.iter().any(|c| &c.id == child_id))
    }

    /// Look up any item: top-level, block parent or block child
    pub fn item(&self, id: &ItemId) -> Option<&TemplateItem> {
        self.rows.iter().find_map(|row| match row {
            TopLevelRow::Item(item) if &item.id == id => Some(item),
            TopLevelRow::Item(_) => None,
            TopLevelRow::Block(block) if block.id() == id => Some(&block.parent),
            TopLevelRow::Block(block) => block.children.iter().find(|c| &c.id == id),
        })
    }

    // ========================
    // Mutations
    // ========================

    /// Remove a top-level row and renumber the rest
    pub fn remove_row(&mut self, id: &ItemId) -> Option<TopLevelRow> {
        let index = self.row_index(id)?;
        let row = self.rows.remove(index);
        self.busy.remove(id);
        self.renumber_rows();
        self.touch();
        Some(row)
    }

    /// Remove a child from its block and renumber the remaining children.
    /// Returns the id of the block it was removed from.
    pub fn remove_child(&mut self, child_id: &ItemId) -> Option<ItemId> {
        let block = self.rows.iter_mut().find_map(|row| match row {
            TopLevelRow::Block(block) if block.children.iter().any(|c| &c.id == child_id) => Some(block),
            _ => None,
        })?;
        block.children.retain(|c| &c.id != child_id);
        for (i, child) in block.children.iter_mut().enumerate() {
            child.display_order = i as u32 + 1;
        }
        let block_id = block.id().clone();
        self.busy.remove(child_id);
        self.touch();
        Some(block_id)
    }

    /// Move a top-level row to `to` (clamped to the list). Returns whether anything moved.
    pub fn move_row(&mut self, id: &ItemId, to: usize) -> bool {
        let Some(from) = self.row_index(id) else {
            return false;
        };
        let to = to.min(self.rows.len().saturating_sub(1));
        if from == to {
            return false;
        }
        let row = self.rows.remove(from);
        self.rows.insert(to, row);
        self.renumber_rows();
        self.touch();
        true
    }

    fn renumber_rows(&mut self) {
        for (i, row) in self.rows.iter_mut().enumerate() {
            let head = match row {
                TopLevelRow::Item(item) => item,
                TopLevelRow::Block(block) => &mut block.parent,
            };
            head.display_order = i as u32 + 1;
        }
    }

    pub fn set_busy(&mut self, id: &ItemId, busy: bool) {
        if busy {
            self.busy.insert(id.clone());
        } else {
            self.busy.remove(id);
        }
    }

    pub fn is_busy(&self, id: &ItemId) -> bool {
        self.busy.contains(id)
    }
}

// ========================
// Snapshot Ingestion
// ========================

fn ingest(raw: SnapshotItem, membership: Membership) -> TemplateItem {
    // Callers only pass entries that carry an id
    let id = ItemId::new(raw.item_id.unwrap_or_default());
    TemplateItem {
        row_id: raw.row_id.unwrap_or_else(|| format!("item-row-{}", id)),
        text: raw.text,
        item_type: raw.item_type.map_or_else(ItemType::missing, ItemType::new),
        display_order: raw.display_order,
        membership,
        id,
    }
}

/// Build top-level rows from a flat snapshot. Entries without an id and
/// children whose block is missing are dropped.
fn build_rows(items: Vec<SnapshotItem>) -> Vec<TopLevelRow> {
    let mut top = Vec::new();
    let mut children: HashMap<String, Vec<SnapshotItem>> = HashMap::new();

    for raw in items {
        if raw.item_id.as_deref().map_or(true, str::is_empty) {
            log::warn!("skipping snapshot entry without an item id: {:?}", raw.text);
            continue;
        }
        match raw.block_id.clone() {
            Some(block_id) if !raw.block_parent => children.entry(block_id).or_default().push(raw),
            _ => top.push(raw),
        }
    }

    top.sort_by_key(|raw| raw.display_order);

    let mut rows = Vec::with_capacity(top.len());
    for raw in top {
        if raw.block_parent {
            let block_id = raw.item_id.clone().unwrap_or_default();
            let mut kids = children.remove(&block_id).unwrap_or_default();
            kids.sort_by_key(|k| k.display_order);
            let parent = ingest(raw, Membership::Standalone);
            let children: Vec<TemplateItem> = kids
                .into_iter()
                .map(|k| ingest(k, Membership::ChildOf(parent.id.clone())))
                .collect();
            if children.len() < 2 {
                log::warn!("block {} arrived with {} children", parent.id, children.len());
            }
            rows.push(TopLevelRow::Block(Block { parent, children }));
        } else {
            rows.push(TopLevelRow::Item(ingest(raw, Membership::Standalone)));
        }
    }

    for (block_id, orphans) in children {
        log::warn!("dropping {} children of unknown block {}", orphans.len(), block_id);
    }

    rows
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub fn raw(id: &str, item_type: &str, order: u32) -> SnapshotItem {
        SnapshotItem {
            item_id: Some(id.to_string()),
            row_id: None,
            text: format!("Item {}", id),
            item_type: Some(item_type.to_string()),
            display_order: order,
            block_id: None,
            block_parent: false,
        }
    }

    pub fn raw_block(id: &str, item_type: &str, order: u32) -> SnapshotItem {
        SnapshotItem { block_parent: true, ..raw(id, item_type, order) }
    }

    pub fn raw_child(id: &str, block: &str, item_type: &str, order: u32) -> SnapshotItem {
        SnapshotItem { block_id: Some(block.to_string()), ..raw(id, item_type, order) }
    }

    /// Rows: 1 (scale), block 10 [11, 12, 13] (scale), 2 (scale), 3 (text)
    pub fn sample_state() -> TemplateState {
        TemplateState::from_snapshot(TemplateSnapshot {
            template_id: "7".to_string(),
            begin_eval_label: Some("Take evaluation".to_string()),
            items: vec![
                raw("1", "item-scale-1", 1),
                raw_block("10", "item-scale-10", 2),
                raw_child("11", "10", "item-scale-11", 1),
                raw_child("12", "10", "item-scale-12", 2),
                raw_child("13", "10", "item-scale-13", 3),
                raw("2", "item-scale-2", 3),
                raw("3", "item-text-3", 4),
            ],
        })
    }

    fn ids(state: &TemplateState) -> Vec<&str> {
        state.rows.iter().map(|r| r.id().as_str()).collect()
    }

    #[test]
    fn test_snapshot_builds_rows_in_display_order() {
        let state = sample_state();
        assert_eq!(ids(&state), vec!["1", "10", "2", "3"]);
        let block = state.block(&ItemId::new("10")).unwrap();
        assert_eq!(block.children.len(), 3);
        assert_eq!(block.children[0].membership, Membership::ChildOf(ItemId::new("10")));
        assert_eq!(state.begin_eval_label, "Take evaluation");
    }

    #[test]
    fn test_malformed_entries_are_dropped() {
        let mut missing_id = raw("x", "item-scale-1", 0);
        missing_id.item_id = None;
        let state = TemplateState::from_snapshot(TemplateSnapshot {
            template_id: "1".to_string(),
            begin_eval_label: None,
            items: vec![missing_id, raw("5", "item-scale-5", 1), raw_child("6", "99", "item-scale-6", 1)],
        });
        assert_eq!(ids(&state), vec!["5"]);
        assert_eq!(state.begin_eval_label, DEFAULT_BEGIN_EVAL_LABEL);
    }

    #[test]
    fn test_remove_row_renumbers() {
        let mut state = sample_state();
        let before = state.version();
        assert!(state.remove_row(&ItemId::new("1")).is_some());
        assert_eq!(ids(&state), vec!["10", "2", "3"]);
        let orders: Vec<u32> = state.rows.iter().map(|r| r.head().display_order).collect();
        assert_eq!(orders, vec![1, 2, 3]);
        assert!(state.version() > before);
    }

    #[test]
    fn test_remove_child_reports_block() {
        let mut state = sample_state();
        let block_id = state.remove_child(&ItemId::new("11")).unwrap();
        assert_eq!(block_id, ItemId::new("10"));
        let block = state.block(&block_id).unwrap();
        let kids: Vec<_> = block.children.iter().map(|c| (c.id.as_str(), c.display_order)).collect();
        assert_eq!(kids, vec![("12", 1), ("13", 2)]);
    }

    #[test]
    fn test_move_row_clamps() {
        let mut state = sample_state();
        assert!(state.move_row(&ItemId::new("1"), 99));
        assert_eq!(ids(&state), vec!["10", "2", "3", "1"]);
        assert!(!state.move_row(&ItemId::new("1"), 3));
        assert!(!state.move_row(&ItemId::new("missing"), 0));
    }

    #[test]
    fn test_item_lookup_covers_children() {
        let state = sample_state();
        assert_eq!(state.item(&ItemId::new("12")).unwrap().text, "Item 12");
        assert_eq!(state.block_of_child(&ItemId::new("12")).unwrap().id().as_str(), "10");
        assert!(state.block_of_child(&ItemId::new("2")).is_none());
    }
}
