//! Item Registry
//!
//! Groupable candidates derived from the current state.

use crate::models::{GroupableCandidate, ItemType, TopLevelRow};
use crate::store::TemplateState;

/// Every standalone top-level item that could join some block.
///
/// Pure; rebuild after any structural change. Items without a type
/// attribute or row id are left out.
pub fn rebuild_groupable_candidates(state: &TemplateState) -> Vec<GroupableCandidate> {
    state
        .rows
        .iter()
        .enumerate()
        .filter_map(|(index, row)| match row {
            TopLevelRow::Item(item) if !item.item_type.is_missing() && !item.row_id.is_empty() => {
                Some(GroupableCandidate {
                    item_id: item.id.clone(),
                    row_id: item.row_id.clone(),
                    row_number: index + 1,
                    text: item.text.clone(),
                    item_type: item.item_type.clone(),
                })
            }
            _ => None,
        })
        .collect()
}

/// Candidates whose type key matches `item_type`
pub fn matching_candidates(candidates: &[GroupableCandidate], item_type: &ItemType) -> Vec<GroupableCandidate> {
    candidates
        .iter()
        .filter(|c| {
            log::debug!("checking {} against {}", c.item_type.raw, item_type.raw);
            c.item_type.groups_with(item_type)
        })
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ItemId, TemplateSnapshot};
    use crate::store::tests::{raw, raw_block, raw_child, sample_state};

    #[test]
    fn test_candidates_are_standalone_typed_items() {
        let state = sample_state();
        let candidates = rebuild_groupable_candidates(&state);
        let ids: Vec<_> = candidates.iter().map(|c| (c.item_id.as_str(), c.row_number)).collect();
        assert_eq!(ids, vec![("1", 1), ("2", 3), ("3", 4)]);
    }

    #[test]
    fn test_rebuild_is_idempotent() {
        let state = sample_state();
        assert_eq!(rebuild_groupable_candidates(&state), rebuild_groupable_candidates(&state));
    }

    #[test]
    fn test_items_without_type_excluded() {
        let mut untyped = raw("4", "scale", 1);
        untyped.item_type = None;
        let state = TemplateState::from_snapshot(TemplateSnapshot {
            template_id: "1".to_string(),
            begin_eval_label: None,
            items: vec![untyped, raw("5", "junk", 2), raw("6", "item-text-6", 3)],
        });
        let ids: Vec<_> = rebuild_groupable_candidates(&state).into_iter().map(|c| c.item_id.0).collect();
        assert_eq!(ids, vec!["5", "6"]);
    }

    #[test]
    fn test_scale_block_only_matches_scale_items() {
        let state = TemplateState::from_snapshot(TemplateSnapshot {
            template_id: "1".to_string(),
            begin_eval_label: None,
            items: vec![
                raw_block("20", "item-scale-1", 1),
                raw_child("21", "20", "item-scale-21", 1),
                raw_child("22", "20", "item-scale-22", 2),
                raw("7", "item-scale-7", 2),
                raw("3", "item-text-3", 3),
            ],
        });
        let block = state.block(&ItemId::new("20")).unwrap();
        let offered = matching_candidates(&rebuild_groupable_candidates(&state), &block.parent.item_type);
        assert_eq!(offered.len(), 1);
        assert_eq!(offered[0].item_id, ItemId::new("7"));
    }

    #[test]
    fn test_empty_middle_segment_groups_with_itself() {
        let state = TemplateState::from_snapshot(TemplateSnapshot {
            template_id: "1".to_string(),
            begin_eval_label: None,
            items: vec![
                raw_block("30", "item--30", 1),
                raw_child("31", "30", "item--31", 1),
                raw_child("32", "30", "item--32", 2),
                raw("8", "item--8", 2),
                raw("9", "item-scale-9", 3),
            ],
        });
        let block = state.block(&ItemId::new("30")).unwrap();
        let offered = matching_candidates(&rebuild_groupable_candidates(&state), &block.parent.item_type);
        let ids: Vec<_> = offered.iter().map(|c| c.item_id.as_str()).collect();
        assert_eq!(ids, vec!["8"]);
    }
}
