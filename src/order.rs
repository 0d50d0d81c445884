//! Order Tracker
//!
//! Canonical order of top-level rows, the save-order gate, row labels
//! and reorder dropdown bounds.

use crate::commands::{self, ApiRequest, ApiResponse, Transport};
use crate::config::Config;
use crate::error::{ApiError, ApiResult};
use crate::models::ItemId;
use crate::store::TemplateState;

/// Top-level ids in their current display order
pub fn capture_current_order(state: &TemplateState) -> Vec<ItemId> {
    state.rows.iter().map(|r| r.id().clone()).collect()
}

/// Whether the current order differs from the last persisted one
pub fn order_changed(state: &TemplateState) -> bool {
    capture_current_order(state) != state.saved_order
}

/// Save-order controls are enabled iff the order changed and no save is in flight
pub fn save_enabled(state: &TemplateState) -> bool {
    !state.order_submitting && order_changed(state)
}

/// Sequential 1-based labels for top-level rows
pub fn row_labels(state: &TemplateState) -> Vec<(ItemId, usize)> {
    state
        .rows
        .iter()
        .enumerate()
        .map(|(i, r)| (r.id().clone(), i + 1))
        .collect()
}

/// Highest position a reorder dropdown offers
pub fn dropdown_max(state: &TemplateState) -> usize {
    state.visible_count()
}

/// Move a row to a 1-based dropdown position
pub fn reorder_to_position(state: &mut TemplateState, id: &ItemId, position: usize) -> bool {
    if state.order_submitting || position == 0 {
        return false;
    }
    let moved = state.move_row(id, position - 1);
    if moved {
        log::debug!("moved {} to position {}", id, position);
    }
    moved
}

/// Treat the current order as persisted; disables save controls.
/// Used when the server renumbered positions itself (e.g. after a delete).
pub fn mark_order_persisted(state: &mut TemplateState) {
    state.saved_order = capture_current_order(state);
}

/// An order save that has been issued and awaits its response
#[derive(Debug, Clone, PartialEq)]
pub struct PendingSave {
    pub order: Vec<ItemId>,
    pub request: ApiRequest,
}

/// Start saving the current order. Returns `None` (and sends nothing)
/// when there are no rows. Disables the save controls until finished.
pub fn begin_save(state: &mut TemplateState, config: &Config) -> Option<PendingSave> {
    if state.order_submitting {
        return None;
    }
    let order = capture_current_order(state);
    if order.is_empty() {
        log::debug!("no items to order; nothing to save");
        return None;
    }
    state.order_submitting = true;
    let request = commands::save_order_request(config, &order);
    Some(PendingSave { order, request })
}

/// Apply the response of a save. Failure re-enables the controls so the
/// user can retry.
pub fn finish_save(state: &mut TemplateState, pending: PendingSave, result: ApiResult<ApiResponse>) -> ApiResult<()> {
    state.order_submitting = false;
    match result {
        Ok(_) => {
            log::info!("saved order of {} items", pending.order.len());
            state.saved_order = pending.order;
            Ok(())
        }
        Err(e) => {
            log::error!("saving order failed: {}", e);
            Err(e)
        }
    }
}

/// Outcome of [`save_order`]
#[derive(Debug, Clone, PartialEq)]
pub enum SaveOutcome {
    Saved,
    NothingToSave,
}

/// Begin, send and finish an order save in one step
pub async fn save_order<T: Transport + ?Sized>(
    state: &mut TemplateState,
    transport: &T,
    config: &Config,
) -> Result<SaveOutcome, ApiError> {
    let Some(pending) = begin_save(state, config) else {
        return Ok(SaveOutcome::NothingToSave);
    };
    let result = transport.send(&pending.request).await;
    finish_save(state, pending, result).map(|_| SaveOutcome::Saved)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::testing::RecordingTransport;
    use crate::models::TemplateSnapshot;
    use crate::store::tests::sample_state;

    #[test]
    fn test_capture_order() {
        let state = sample_state();
        let order: Vec<_> = capture_current_order(&state).into_iter().map(|i| i.0).collect();
        assert_eq!(order, vec!["1", "10", "2", "3"]);
    }

    #[test]
    fn test_save_gated_on_change() {
        let mut state = sample_state();
        assert!(!save_enabled(&state));
        assert!(reorder_to_position(&mut state, &ItemId::new("3"), 1));
        assert!(save_enabled(&state));
        // Moving it back restores the persisted order
        assert!(reorder_to_position(&mut state, &ItemId::new("3"), 4));
        assert!(!save_enabled(&state));
    }

    #[test]
    fn test_block_children_are_not_reorderable() {
        let mut state = sample_state();
        assert!(!reorder_to_position(&mut state, &ItemId::new("13"), 1));
        let kids: Vec<_> = state.block(&ItemId::new("10")).unwrap().children.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(kids, vec!["11", "12", "13"]);
        assert!(!save_enabled(&state));
    }

    #[test]
    fn test_labels_and_dropdown_max() {
        let mut state = sample_state();
        state.remove_row(&ItemId::new("10"));
        let labels: Vec<_> = row_labels(&state).into_iter().map(|(id, n)| (id.0, n)).collect();
        assert_eq!(labels, vec![("1".to_string(), 1), ("2".to_string(), 2), ("3".to_string(), 3)]);
        assert_eq!(dropdown_max(&state), 3);
    }

    #[tokio::test]
    async fn test_save_with_no_items_sends_nothing() {
        let mut state = TemplateState::from_snapshot(TemplateSnapshot::default());
        let transport = RecordingTransport::new();
        let outcome = save_order(&mut state, &transport, &Config::default()).await.unwrap();
        assert_eq!(outcome, SaveOutcome::NothingToSave);
        assert!(transport.sent().is_empty());
    }

    #[tokio::test]
    async fn test_save_sends_order_and_disables_controls() {
        let mut state = sample_state();
        reorder_to_position(&mut state, &ItemId::new("2"), 1);

        let pending = begin_save(&mut state, &Config::default()).unwrap();
        assert_eq!(pending.request.field_value("orderedIds"), Some("2,1,10,3"));
        assert!(!save_enabled(&state));
        // No second submission while one is in flight
        assert!(begin_save(&mut state, &Config::default()).is_none());
        assert!(!reorder_to_position(&mut state, &ItemId::new("3"), 1));

        finish_save(&mut state, pending, Ok(ApiResponse { status: 200, body: String::new() })).unwrap();
        assert!(!save_enabled(&state));
        assert!(!order_changed(&state));
    }

    #[tokio::test]
    async fn test_failed_save_re_enables_controls() {
        let mut state = sample_state();
        reorder_to_position(&mut state, &ItemId::new("2"), 1);
        let transport = RecordingTransport::failing(500);

        let err = save_order(&mut state, &transport, &Config::default()).await.unwrap_err();
        assert!(matches!(err, ApiError::Status { status: 500, .. }));
        assert_eq!(transport.sent().len(), 1);
        assert!(save_enabled(&state));
    }
}
