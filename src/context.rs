//! Application Context
//!
//! Shared state provided via Leptos Context API, plus the async glue that
//! drives workflows against the REST backend.

use gloo_timers::future::TimeoutFuture;
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::commands::{RestClient, Transport};
use crate::config::Config;
use crate::deletion::{DeletionOutcome, DeletionWorkflow};
use crate::events::{EventListeners, TemplateEvent};
use crate::grouping::{GroupingOutcome, GroupingWorkflow};
use crate::messages::{self, Messages};
use crate::models::{ItemId, ItemRef, TargetKind};
use crate::order;
use crate::store::TemplateState;

/// Fade-out before a removed row leaves the list
const REMOVE_FADE_MS: u32 = 100;

/// App-wide signals provided via context
#[derive(Clone, Copy)]
pub struct AppContext {
    pub state: RwSignal<TemplateState>,
    pub grouping: RwSignal<GroupingWorkflow>,
    pub deletion: RwSignal<DeletionWorkflow>,
    pub config: StoredValue<Config>,
    pub messages: StoredValue<Messages>,
    /// Row currently fading out after a successful delete
    pub fading: RwSignal<Option<ItemId>>,
    /// Bumped whenever a block's children re-sort
    pub resort_trigger: RwSignal<u32>,
    /// Error from the last order save, if it failed
    pub order_error: RwSignal<Option<String>>,
}

impl AppContext {
    pub fn new(state: TemplateState, config: Config) -> Self {
        let messages = Messages::new(config.messages.clone());
        Self {
            state: RwSignal::new(state),
            grouping: RwSignal::new(GroupingWorkflow::new()),
            deletion: RwSignal::new(DeletionWorkflow::new()),
            config: StoredValue::new(config),
            messages: StoredValue::new(messages),
            fading: RwSignal::new(None),
            resort_trigger: RwSignal::new(0),
            order_error: RwSignal::new(None),
        }
    }

    /// Localized text for a message key
    pub fn msg(&self, key: &str) -> String {
        self.messages.with_value(|m| m.get(key))
    }

    fn client(&self) -> RestClient {
        self.config.with_value(RestClient::new)
    }

    /// Listeners attached for one workflow completion
    pub fn listeners(&self) -> EventListeners {
        let resort_trigger = self.resort_trigger;
        let mut listeners = EventListeners::new();
        listeners.subscribe(move |event| match event {
            TemplateEvent::ChildrenResort { block_id } => {
                log::debug!("children of block {} re-sorted", block_id);
                resort_trigger.update(|v| *v += 1);
            }
            TemplateEvent::StructureChanged { version } => {
                log::debug!("structure changed, now at version {}", version);
            }
            TemplateEvent::ReloadRequired => reload_page(),
        });
        listeners
    }

    // ========================
    // Grouping
    // ========================

    /// "Add existing items to group" clicked on a block
    pub fn start_grouping(&self, block_id: ItemId) {
        let state = self.state.get_untracked();
        let messages = self.messages.get_value();
        self.grouping.update(|wf| {
            if wf.begin(&state, &block_id, &messages).is_ok() {
                let _ = wf.open_selection();
            }
        });
    }

    /// Commit the checked entries of the open selection
    pub fn submit_grouping(&self) {
        let ctx = *self;
        let config = self.config.get_value();
        let mut request = None;
        self.grouping.update(|wf| request = wf.begin_submit(&config).ok());
        let Some(request) = request else {
            return;
        };

        spawn_local(async move {
            let result = ctx.client().send(&request).await;
            let mut state = ctx.state.get_untracked();
            let mut wf = ctx.grouping.get_untracked();
            let messages = ctx.messages.get_value();
            let outcome = wf.finish_submit(&mut state, result, &messages, &ctx.listeners());
            if let Ok(GroupingOutcome::Refreshed) = outcome {
                wf.reset();
            }
            ctx.state.set(state);
            ctx.grouping.set(wf);
        });
    }

    // ========================
    // Deletion
    // ========================

    /// Delete/ungroup trigger clicked on a row
    pub fn toggle_confirmation(&self, target: ItemId, kind: TargetKind, reference: &str) {
        let state = self.state.get_untracked();
        let config = self.config.get_value();
        self.deletion.update(|wf| {
            wf.reset();
            if let Err(e) = wf.open(&state, &target, kind, ItemRef::parse(reference), &config) {
                log::warn!("cannot open confirmation for {}: {}", target, e);
            }
        });
    }

    /// Confirm button of the open popup
    pub fn confirm_deletion(&self) {
        let ctx = *self;
        let config = self.config.get_value();
        let messages = self.messages.get_value();
        let mut state = self.state.get_untracked();
        let mut wf = self.deletion.get_untracked();
        let kind = wf.pending().map(|p| (p.kind, p.target.clone()));
        let confirmed = wf.confirm(&mut state, &config, &messages);
        self.state.set(state);
        self.deletion.set(wf);

        let (Ok(request), Some((kind, target))) = (confirmed, kind) else {
            return;
        };

        spawn_local(async move {
            let result = ctx.client().send(&request).await;
            if result.is_ok() && kind != TargetKind::Block {
                ctx.fading.set(Some(target));
                TimeoutFuture::new(REMOVE_FADE_MS).await;
            }
            let mut state = ctx.state.get_untracked();
            let mut wf = ctx.deletion.get_untracked();
            let messages = ctx.messages.get_value();
            let outcome = wf.finish(&mut state, result, &messages, &ctx.listeners());
            if matches!(
                outcome,
                Ok(DeletionOutcome::ChildRemoved { .. } | DeletionOutcome::ItemRemoved { .. } | DeletionOutcome::Refreshed)
            ) {
                wf.reset();
            }
            ctx.fading.set(None);
            ctx.state.set(state);
            ctx.deletion.set(wf);
        });
    }

    // ========================
    // Order
    // ========================

    pub fn move_row(&self, id: &ItemId, position: usize) {
        self.state.update(|s| {
            order::reorder_to_position(s, id, position);
        });
    }

    pub fn save_order(&self) {
        let ctx = *self;
        let config = self.config.get_value();
        let mut pending = None;
        self.state.update(|s| pending = order::begin_save(s, &config));
        let Some(pending) = pending else {
            return;
        };
        self.order_error.set(None);

        spawn_local(async move {
            let result = ctx.client().send(&pending.request).await;
            let mut state = ctx.state.get_untracked();
            if let Err(e) = order::finish_save(&mut state, pending, result) {
                ctx.order_error.set(Some(format!("{} ({})", ctx.msg(messages::REQUEST_FAILED), e)));
            }
            ctx.state.set(state);
        });
    }
}

/// Full page reload; last-resort refresh when no updated state came back
pub fn reload_page() {
    log::info!("reloading view from server");
    if let Some(window) = web_sys::window() {
        if let Err(e) = window.location().reload() {
            log::error!("page reload failed: {:?}", e);
        }
    }
}

/// Get the app context
pub fn use_app_context() -> AppContext {
    expect_context::<AppContext>()
}
