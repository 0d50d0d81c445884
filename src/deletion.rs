//! Deletion / Ungrouping Workflow
//!
//! Confirm-then-commit removal of a standalone item, a block child, or a
//! whole block. At most one confirmation is open at a time.
//!
//! Idle -> ConfirmPending -> Committing -> Done, with ConfirmPending -> Idle on cancel.

use crate::commands::{self, ApiRequest, ApiResponse, Transport};
use crate::config::Config;
use crate::error::{ApiResult, GuardError};
use crate::events::{EventListeners, TemplateEvent};
use crate::messages::{self, Messages};
use crate::models::{ItemId, ItemRef, Notice, PendingConfirmation, TargetKind};
use crate::order;
use crate::store::TemplateState;
use crate::text;

#[derive(Debug, Clone, PartialEq, Default)]
pub enum DeletionPhase {
    #[default]
    Idle,
    ConfirmPending(PendingConfirmation),
    Committing(PendingConfirmation),
    Done(DeletionOutcome),
}

impl DeletionPhase {
    fn name(&self) -> &'static str {
        match self {
            DeletionPhase::Idle => "idle",
            DeletionPhase::ConfirmPending(_) => "awaiting confirmation",
            DeletionPhase::Committing(_) => "committing",
            DeletionPhase::Done(_) => "done",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DeletionOutcome {
    /// Block removed or ungrouped; state re-derived from the response
    Refreshed,
    /// Block removed or ungrouped; the view must reload
    ReloadRequired,
    ChildRemoved { block_id: ItemId, child_id: ItemId },
    ItemRemoved { item_id: ItemId },
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct DeletionWorkflow {
    phase: DeletionPhase,
    notice: Option<Notice>,
    /// Row highlighted while its confirmation is open
    highlighted: Option<ItemId>,
}

impl DeletionWorkflow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> &DeletionPhase {
        &self.phase
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub fn dismiss_notice(&mut self) {
        self.notice = None;
    }

    pub fn highlighted(&self) -> Option<&ItemId> {
        self.highlighted.as_ref()
    }

    /// The confirmation currently shown, if any
    pub fn pending(&self) -> Option<&PendingConfirmation> {
        match &self.phase {
            DeletionPhase::ConfirmPending(p) => Some(p),
            _ => None,
        }
    }

    pub fn is_committing(&self) -> bool {
        matches!(self.phase, DeletionPhase::Committing(_))
    }

    /// Label for the confirm button of the open popup
    pub fn action_label(&self, messages: &Messages) -> Option<String> {
        self.pending().map(|p| {
            if p.is_ungroup() {
                messages.get(messages::UNGROUP_COMMAND)
            } else {
                messages.get(messages::DELETE_COMMAND)
            }
        })
    }

    /// Open the confirmation for a row, hiding any other one. Triggering
    /// the same action of the row that is already open closes it instead;
    /// another action of that row replaces it. Returns whether a
    /// confirmation is now open.
    pub fn open(
        &mut self,
        state: &TemplateState,
        target: &ItemId,
        kind: TargetKind,
        reference: ItemRef,
        config: &Config,
    ) -> Result<bool, GuardError> {
        if self.is_committing() {
            return Err(GuardError::WrongPhase { action: "open confirmation", phase: self.phase.name() });
        }
        if self.pending().is_some_and(|p| &p.target == target && p.reference == reference) {
            self.cancel();
            return Ok(false);
        }

        let item = match kind {
            TargetKind::StandaloneItem => state
                .row_index(target)
                .and_then(|i| state.rows[i].as_block().is_none().then(|| state.rows[i].head())),
            TargetKind::BlockChildItem => state
                .block_of_child(target)
                .and_then(|b| b.children.iter().find(|c| &c.id == target)),
            TargetKind::Block => state.block(target).map(|b| &b.parent),
        }
        .ok_or_else(|| GuardError::UnknownItem(target.clone()))?;

        let pending = PendingConfirmation {
            target: target.clone(),
            kind,
            reference,
            label: text::preview(&item.text, config.preview_chars),
        };
        log::debug!("confirm {:?} of {} via {}", kind, target, pending.reference.as_str());
        self.highlighted = Some(target.clone());
        self.phase = DeletionPhase::ConfirmPending(pending);
        Ok(true)
    }

    /// Dismiss the confirmation without sending anything
    pub fn cancel(&mut self) {
        if let DeletionPhase::ConfirmPending(_) = self.phase {
            self.phase = DeletionPhase::Idle;
            self.highlighted = None;
        }
    }

    /// Leave `Done` so the next invocation starts clean
    pub fn reset(&mut self) {
        if matches!(self.phase, DeletionPhase::Done(_)) {
            self.phase = DeletionPhase::Idle;
        }
    }

    /// Confirm the open action. Block children are guarded: a block never
    /// shrinks below its minimum, and a rejected delete sends nothing.
    pub fn confirm(&mut self, state: &mut TemplateState, config: &Config, messages: &Messages) -> Result<ApiRequest, GuardError> {
        let pending = match std::mem::take(&mut self.phase) {
            DeletionPhase::ConfirmPending(p) => p,
            other => {
                let phase = other.name();
                self.phase = other;
                return Err(GuardError::WrongPhase { action: "confirm", phase });
            }
        };

        if pending.kind == TargetKind::BlockChildItem {
            let Some(block) = state.block_of_child(&pending.target) else {
                self.highlighted = None;
                return Err(GuardError::UnknownItem(pending.target));
            };
            let remaining = block.children.len();
            if remaining <= config.min_block_children {
                log::info!("block {} has {} children; refusing to remove {}", block.id(), remaining, pending.target);
                let block_id = block.id().clone();
                self.highlighted = None;
                self.notice = Some(Notice::validation(messages.get(messages::CANNOT_DELETE_ITEM)));
                return Err(GuardError::BlockTooSmall { block_id, remaining });
            }
        }

        let request = if pending.kind == TargetKind::BlockChildItem && pending.reference == ItemRef::Unblock {
            commands::unblock_request(config, &pending.target)
        } else {
            commands::delete_request(config, &pending.reference, &pending.target)
        };
        log::info!("{} {} for {:?} {}", request.method, request.path, pending.kind, pending.target);

        self.notice = None;
        state.set_busy(&pending.target, true);
        self.phase = DeletionPhase::Committing(pending);
        Ok(request)
    }

    /// Apply the response of the committed request
    pub fn finish(
        &mut self,
        state: &mut TemplateState,
        result: ApiResult<ApiResponse>,
        messages: &Messages,
        listeners: &EventListeners,
    ) -> ApiResult<DeletionOutcome> {
        let pending = match std::mem::take(&mut self.phase) {
            DeletionPhase::Committing(p) => p,
            other => {
                log::warn!("delete response arrived while {}", other.name());
                self.phase = other;
                return Ok(DeletionOutcome::ReloadRequired);
            }
        };
        self.highlighted = None;

        let response = match result {
            Ok(response) => response,
            Err(e) => {
                log::error!("removing {} failed: {}", pending.target, e);
                state.set_busy(&pending.target, false);
                self.notice = Some(Notice::transport(messages.get(messages::REQUEST_FAILED)));
                self.phase = DeletionPhase::Idle;
                return Err(e);
            }
        };

        let outcome = match pending.kind {
            TargetKind::Block => refresh_from(state, &response, listeners),
            TargetKind::BlockChildItem if pending.reference == ItemRef::Unblock => {
                refresh_from(state, &response, listeners)
            }
            TargetKind::BlockChildItem => match state.remove_child(&pending.target) {
                Some(block_id) => {
                    listeners.emit(&TemplateEvent::ChildrenResort { block_id: block_id.clone() });
                    listeners.emit(&TemplateEvent::StructureChanged { version: state.version() });
                    DeletionOutcome::ChildRemoved { block_id, child_id: pending.target }
                }
                None => refresh_from(state, &response, listeners),
            },
            TargetKind::StandaloneItem => {
                state.remove_row(&pending.target);
                // Positions were renumbered server-side; nothing left to save
                order::mark_order_persisted(state);
                listeners.emit(&TemplateEvent::StructureChanged { version: state.version() });
                DeletionOutcome::ItemRemoved { item_id: pending.target }
            }
        };
        log::info!("removal finished: {:?}", outcome);
        self.phase = DeletionPhase::Done(outcome.clone());
        Ok(outcome)
    }

    /// Confirm, send and finish in one step
    pub async fn commit<T: Transport + ?Sized>(
        &mut self,
        state: &mut TemplateState,
        transport: &T,
        config: &Config,
        messages: &Messages,
        listeners: &EventListeners,
    ) -> Result<ApiResult<DeletionOutcome>, GuardError> {
        let request = self.confirm(state, config, messages)?;
        let result = transport.send(&request).await;
        Ok(self.finish(state, result, messages, listeners))
    }
}

fn refresh_from(state: &mut TemplateState, response: &ApiResponse, listeners: &EventListeners) -> DeletionOutcome {
    match commands::decode_snapshot(response) {
        Some(snapshot) => {
            state.apply_snapshot(snapshot);
            listeners.emit(&TemplateEvent::StructureChanged { version: state.version() });
            DeletionOutcome::Refreshed
        }
        None => {
            listeners.emit(&TemplateEvent::ReloadRequired);
            DeletionOutcome::ReloadRequired
        }
    }
}
