//! Grouping Workflow
//!
//! "Add existing items to a block": candidate discovery, selection,
//! submission and refresh.
//!
//! Idle -> CandidatesComputed -> SelectionOpen -> Submitting -> Done.
//! A failed submission returns to SelectionOpen with a notice.

use crate::commands::{self, ApiRequest, ApiResponse, Transport};
use crate::config::Config;
use crate::error::{ApiResult, GuardError};
use crate::events::{EventListeners, TemplateEvent};
use crate::messages::{self, Messages};
use crate::models::{GroupableCandidate, ItemId, Notice};
use crate::registry;
use crate::store::TemplateState;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionEntry {
    pub candidate: GroupableCandidate,
    pub checked: bool,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum GroupingPhase {
    #[default]
    Idle,
    CandidatesComputed { block_id: ItemId, candidates: Vec<GroupableCandidate> },
    SelectionOpen { block_id: ItemId, entries: Vec<SelectionEntry> },
    Submitting { block_id: ItemId, entries: Vec<SelectionEntry> },
    Done(GroupingOutcome),
}

impl GroupingPhase {
    fn name(&self) -> &'static str {
        match self {
            GroupingPhase::Idle => "idle",
            GroupingPhase::CandidatesComputed { .. } => "candidates computed",
            GroupingPhase::SelectionOpen { .. } => "selecting",
            GroupingPhase::Submitting { .. } => "submitting",
            GroupingPhase::Done(_) => "done",
        }
    }
}

/// What a successful submission left behind
#[derive(Debug, Clone, PartialEq)]
pub enum GroupingOutcome {
    /// Server returned the updated item list; state was re-derived in place
    Refreshed,
    /// No usable state in the response; the view must reload
    ReloadRequired,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct GroupingWorkflow {
    phase: GroupingPhase,
    notice: Option<Notice>,
}

impl GroupingWorkflow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> &GroupingPhase {
        &self.phase
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub fn dismiss_notice(&mut self) {
        self.notice = None;
    }

    fn wrong_phase(&self, action: &'static str) -> GuardError {
        GuardError::WrongPhase { action, phase: self.phase.name() }
    }

    /// Compute candidates sharing the block's type key. With none, the
    /// workflow stays idle and shows a "no items to add" notice.
    pub fn begin(&mut self, state: &TemplateState, block_id: &ItemId, messages: &Messages) -> Result<usize, GuardError> {
        if matches!(self.phase, GroupingPhase::Submitting { .. }) {
            return Err(self.wrong_phase("begin"));
        }
        self.notice = None;
        let block = state.block(block_id).ok_or_else(|| GuardError::UnknownItem(block_id.clone()))?;
        if state.is_busy(block_id) {
            log::debug!("block {} is being removed; not grouping", block_id);
            return Err(GuardError::Busy(block_id.clone()));
        }
        let all = registry::rebuild_groupable_candidates(state);
        let candidates = registry::matching_candidates(&all, &block.parent.item_type);

        if candidates.is_empty() {
            log::info!("no groupable items for block {}", block_id);
            self.phase = GroupingPhase::Idle;
            self.notice = Some(Notice::validation(messages.get(messages::NO_ITEMS_TO_ADD)));
            return Err(GuardError::NoItemsToAdd { block_id: block_id.clone() });
        }

        let count = candidates.len();
        self.phase = GroupingPhase::CandidatesComputed { block_id: block_id.clone(), candidates };
        Ok(count)
    }

    /// Populate the selection surface, every entry unchecked
    pub fn open_selection(&mut self) -> Result<(), GuardError> {
        match std::mem::take(&mut self.phase) {
            GroupingPhase::CandidatesComputed { block_id, candidates } => {
                let entries = candidates
                    .into_iter()
                    .map(|candidate| SelectionEntry { candidate, checked: false })
                    .collect();
                self.phase = GroupingPhase::SelectionOpen { block_id, entries };
                Ok(())
            }
            other => {
                self.phase = other;
                Err(self.wrong_phase("open selection"))
            }
        }
    }

    pub fn entries(&self) -> &[SelectionEntry] {
        match &self.phase {
            GroupingPhase::SelectionOpen { entries, .. } | GroupingPhase::Submitting { entries, .. } => entries,
            _ => &[],
        }
    }

    pub fn block_id(&self) -> Option<&ItemId> {
        match &self.phase {
            GroupingPhase::CandidatesComputed { block_id, .. }
            | GroupingPhase::SelectionOpen { block_id, .. }
            | GroupingPhase::Submitting { block_id, .. } => Some(block_id),
            _ => None,
        }
    }

    fn entries_mut(&mut self) -> Option<&mut Vec<SelectionEntry>> {
        match &mut self.phase {
            GroupingPhase::SelectionOpen { entries, .. } => Some(entries),
            _ => None,
        }
    }

    pub fn set_checked(&mut self, item_id: &ItemId, checked: bool) {
        if let Some(entry) = self
            .entries_mut()
            .and_then(|entries| entries.iter_mut().find(|e| &e.candidate.item_id == item_id))
        {
            entry.checked = checked;
        }
    }

    pub fn toggle(&mut self, item_id: &ItemId) {
        if let Some(entry) = self
            .entries_mut()
            .and_then(|entries| entries.iter_mut().find(|e| &e.candidate.item_id == item_id))
        {
            entry.checked = !entry.checked;
        }
    }

    pub fn select_all(&mut self) {
        if let Some(entries) = self.entries_mut() {
            entries.iter_mut().for_each(|e| e.checked = true);
        }
    }

    pub fn select_none(&mut self) {
        if let Some(entries) = self.entries_mut() {
            entries.iter_mut().for_each(|e| e.checked = false);
        }
    }

    pub fn checked_count(&self) -> usize {
        self.entries().iter().filter(|e| e.checked).count()
    }

    pub fn is_open(&self) -> bool {
        matches!(self.phase, GroupingPhase::SelectionOpen { .. } | GroupingPhase::Submitting { .. })
    }

    pub fn is_submitting(&self) -> bool {
        matches!(self.phase, GroupingPhase::Submitting { .. })
    }

    /// Commit is enabled iff at least one entry is checked and nothing is in flight
    pub fn commit_enabled(&self) -> bool {
        matches!(self.phase, GroupingPhase::SelectionOpen { .. }) && self.checked_count() > 0
    }

    pub fn cancel_enabled(&self) -> bool {
        !self.is_submitting()
    }

    /// Close the selection without sending anything
    pub fn cancel(&mut self) {
        if self.is_submitting() {
            return;
        }
        self.phase = GroupingPhase::Idle;
    }

    /// Leave `Done` so the next invocation starts clean
    pub fn reset(&mut self) {
        if matches!(self.phase, GroupingPhase::Done(_)) {
            self.phase = GroupingPhase::Idle;
        }
    }

    /// Move to Submitting and build the single add-items request
    pub fn begin_submit(&mut self, config: &Config) -> Result<ApiRequest, GuardError> {
        if !matches!(self.phase, GroupingPhase::SelectionOpen { .. }) {
            return Err(self.wrong_phase("submit"));
        }
        if self.checked_count() == 0 {
            return Err(GuardError::EmptySelection);
        }
        let GroupingPhase::SelectionOpen { block_id, entries } = std::mem::take(&mut self.phase) else {
            return Err(self.wrong_phase("submit"));
        };
        let selected: Vec<ItemId> = entries
            .iter()
            .filter(|e| e.checked)
            .map(|e| e.candidate.item_id.clone())
            .collect();
        log::info!("adding {} to block {}", commands::join_ids(&selected), block_id);
        let request = commands::add_to_block_request(config, &block_id, &selected);
        self.notice = None;
        self.phase = GroupingPhase::Submitting { block_id, entries };
        Ok(request)
    }

    /// Apply the response. Success re-derives state from the returned
    /// snapshot, or asks for a reload; failure reopens the selection.
    pub fn finish_submit(
        &mut self,
        state: &mut TemplateState,
        result: ApiResult<ApiResponse>,
        messages: &Messages,
        listeners: &EventListeners,
    ) -> ApiResult<GroupingOutcome> {
        let (block_id, entries) = match std::mem::take(&mut self.phase) {
            GroupingPhase::Submitting { block_id, entries } => (block_id, entries),
            other => {
                log::warn!("grouping response arrived while {}", other.name());
                self.phase = other;
                return Ok(GroupingOutcome::ReloadRequired);
            }
        };

        match result {
            Ok(response) => {
                let outcome = match commands::decode_snapshot(&response) {
                    Some(snapshot) => {
                        state.apply_snapshot(snapshot);
                        listeners.emit(&TemplateEvent::StructureChanged { version: state.version() });
                        GroupingOutcome::Refreshed
                    }
                    None => {
                        listeners.emit(&TemplateEvent::ReloadRequired);
                        GroupingOutcome::ReloadRequired
                    }
                };
                self.phase = GroupingPhase::Done(outcome.clone());
                Ok(outcome)
            }
            Err(e) => {
                log::error!("adding items to block {} failed: {}", block_id, e);
                self.notice = Some(Notice::transport(messages.get(messages::REQUEST_FAILED)));
                self.phase = GroupingPhase::SelectionOpen { block_id, entries };
                Err(e)
            }
        }
    }

    /// Begin, send and finish a submission in one step
    pub async fn submit<T: Transport + ?Sized>(
        &mut self,
        state: &mut TemplateState,
        transport: &T,
        config: &Config,
        messages: &Messages,
        listeners: &EventListeners,
    ) -> Result<ApiResult<GroupingOutcome>, GuardError> {
        let request = self.begin_submit(config)?;
        let result = transport.send(&request).await;
        Ok(self.finish_submit(state, result, messages, listeners))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::testing::RecordingTransport;
    use crate::error::ApiError;
    use crate::events::tests::recording;
    use crate::models::{NoticeKind, TemplateSnapshot};
    use crate::store::tests::{raw, raw_block, raw_child, sample_state};

    fn open(state: &TemplateState, block: &str) -> GroupingWorkflow {
        let mut wf = GroupingWorkflow::new();
        wf.begin(state, &ItemId::new(block), &Messages::default()).unwrap();
        wf.open_selection().unwrap();
        wf
    }

    #[test]
    fn test_only_matching_type_is_offered() {
        let state = sample_state();
        let wf = open(&state, "10");
        let offered: Vec<_> = wf.entries().iter().map(|e| e.candidate.item_id.as_str()).collect();
        assert_eq!(offered, vec!["1", "2"]);
    }

    #[test]
    fn test_no_candidates_stays_idle_with_notice() {
        let state = TemplateState::from_snapshot(TemplateSnapshot {
            template_id: "1".to_string(),
            begin_eval_label: None,
            items: vec![
                raw_block("20", "item-scale-20", 1),
                raw_child("21", "20", "item-scale-21", 1),
                raw_child("22", "20", "item-scale-22", 2),
                raw("3", "item-text-3", 2),
            ],
        });
        let mut wf = GroupingWorkflow::new();
        let err = wf.begin(&state, &ItemId::new("20"), &Messages::default()).unwrap_err();
        assert_eq!(err, GuardError::NoItemsToAdd { block_id: ItemId::new("20") });
        assert_eq!(wf.phase(), &GroupingPhase::Idle);
        assert_eq!(wf.notice().map(|n| n.kind), Some(NoticeKind::Validation));
    }

    #[test]
    fn test_busy_block_cannot_start_grouping() {
        let mut state = sample_state();
        state.set_busy(&ItemId::new("10"), true);
        let mut wf = GroupingWorkflow::new();
        let err = wf.begin(&state, &ItemId::new("10"), &Messages::default()).unwrap_err();
        assert_eq!(err, GuardError::Busy(ItemId::new("10")));
        assert_eq!(wf.phase(), &GroupingPhase::Idle);
        assert!(wf.open_selection().is_err());

        state.set_busy(&ItemId::new("10"), false);
        assert_eq!(wf.begin(&state, &ItemId::new("10"), &Messages::default()), Ok(2));
    }

    #[test]
    fn test_commit_enabled_tracks_checked_count() {
        let state = sample_state();
        let mut wf = open(&state, "10");
        assert!(!wf.commit_enabled());

        let one = ItemId::new("1");
        let two = ItemId::new("2");
        wf.toggle(&one);
        assert!(wf.commit_enabled());
        wf.toggle(&two);
        wf.toggle(&one);
        assert!(wf.commit_enabled());
        wf.toggle(&two);
        assert!(!wf.commit_enabled());

        wf.select_all();
        assert_eq!(wf.checked_count(), 2);
        assert!(wf.commit_enabled());
        wf.select_none();
        assert!(!wf.commit_enabled());
    }

    #[test]
    fn test_submit_disables_controls() {
        let state = sample_state();
        let mut wf = open(&state, "10");
        wf.set_checked(&ItemId::new("2"), true);
        wf.set_checked(&ItemId::new("1"), true);

        let request = wf.begin_submit(&Config::default()).unwrap();
        assert_eq!(request.field_value("blockid"), Some("10"));
        assert_eq!(request.field_value("additems"), Some("1,2"));
        assert!(wf.is_submitting());
        assert!(!wf.commit_enabled());
        assert!(!wf.cancel_enabled());
        // Double submission is structurally impossible
        assert!(wf.begin_submit(&Config::default()).is_err());
    }

    #[test]
    fn test_empty_selection_rejected() {
        let state = sample_state();
        let mut wf = open(&state, "10");
        assert_eq!(wf.begin_submit(&Config::default()), Err(GuardError::EmptySelection));
    }

    #[tokio::test]
    async fn test_success_without_snapshot_requires_reload() {
        let mut state = sample_state();
        let mut wf = open(&state, "10");
        wf.toggle(&ItemId::new("1"));
        let transport = RecordingTransport::new();
        let (listeners, seen) = recording();

        let outcome = wf
            .submit(&mut state, &transport, &Config::default(), &Messages::default(), &listeners)
            .await
            .unwrap()
            .unwrap();

        assert_eq!(outcome, GroupingOutcome::ReloadRequired);
        assert_eq!(transport.sent().len(), 1);
        assert_eq!(seen.borrow().as_slice(), &[TemplateEvent::ReloadRequired]);
        assert_eq!(wf.phase(), &GroupingPhase::Done(GroupingOutcome::ReloadRequired));
    }

    #[tokio::test]
    async fn test_success_with_snapshot_rederives_in_place() {
        let mut state = sample_state();
        let mut wf = open(&state, "10");
        wf.toggle(&ItemId::new("1"));
        let body = r#"{"templateId":"7","items":[
            {"itemId":"10","itemType":"item-scale-10","displayOrder":1,"blockParent":true},
            {"itemId":"1","itemType":"item-scale-1","displayOrder":1,"blockId":"10"},
            {"itemId":"11","itemType":"item-scale-11","displayOrder":2,"blockId":"10"},
            {"itemId":"3","itemType":"item-text-3","displayOrder":2}
        ]}"#;
        let transport = RecordingTransport::new().respond_with(Ok(ApiResponse { status: 200, body: body.to_string() }));
        let (listeners, _seen) = recording();

        let outcome = wf
            .submit(&mut state, &transport, &Config::default(), &Messages::default(), &listeners)
            .await
            .unwrap()
            .unwrap();

        assert_eq!(outcome, GroupingOutcome::Refreshed);
        assert_eq!(state.visible_count(), 2);
        assert_eq!(state.block(&ItemId::new("10")).unwrap().children.len(), 2);
        assert!(registry::rebuild_groupable_candidates(&state).iter().all(|c| c.item_id != ItemId::new("1")));
    }

    #[tokio::test]
    async fn test_failure_reopens_selection_with_notice() {
        let mut state = sample_state();
        let mut wf = open(&state, "10");
        wf.toggle(&ItemId::new("2"));
        let transport = RecordingTransport::failing(503);
        let (listeners, seen) = recording();

        let result = wf
            .submit(&mut state, &transport, &Config::default(), &Messages::default(), &listeners)
            .await
            .unwrap();

        assert!(matches!(result, Err(ApiError::Status { status: 503, .. })));
        assert!(wf.commit_enabled());
        assert!(wf.cancel_enabled());
        assert_eq!(wf.checked_count(), 1);
        assert_eq!(wf.notice().map(|n| n.kind), Some(NoticeKind::Transport));
        assert!(seen.borrow().is_empty());
    }

    #[test]
    fn test_cancel_returns_to_idle() {
        let state = sample_state();
        let mut wf = open(&state, "10");
        wf.cancel();
        assert_eq!(wf.phase(), &GroupingPhase::Idle);
        assert!(!wf.is_open());
    }
}
