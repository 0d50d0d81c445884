//! Template Items App
//!
//! Item list editor: header totals, order controls, the list itself and
//! the grouping modal.

use leptos::prelude::*;

use crate::aggregates::refresh_aggregates;
use crate::components::{GroupItemsModal, ItemList, NoticeBar, OrderControls, TakeEvalLink};
use crate::config::{self, Config, SNAPSHOT_ELEMENT_ID};
use crate::context::AppContext;
use crate::messages;
use crate::models::TemplateSnapshot;
use crate::store::TemplateState;

/// Initial item list from the page, or an empty one if it is missing or broken
pub fn load_initial_snapshot(config: &Config) -> TemplateSnapshot {
    let mut snapshot = config::read_page_json(SNAPSHOT_ELEMENT_ID)
        .map_err(|e| e.to_string())
        .and_then(|json| serde_json::from_str::<TemplateSnapshot>(&json).map_err(|e| e.to_string()))
        .unwrap_or_else(|e| {
            log::error!("no usable item snapshot: {}", e);
            TemplateSnapshot::default()
        });
    if snapshot.template_id.is_empty() {
        snapshot.template_id = config.template_id.clone();
    }
    snapshot
}

#[component]
pub fn App(config: Config) -> impl IntoView {
    let state = TemplateState::from_snapshot(load_initial_snapshot(&config));
    let ctx = AppContext::new(state, config);
    provide_context(ctx);

    let item_count = move || ctx.state.with(|s| {
        ctx.config.with_value(|c| refresh_aggregates(s, c)).item_count
    });

    view! {
        <div class="template-items">
            <div class="items-header">
                <span class="items-total-label">{ctx.msg(messages::ITEMS_TOTAL)} ": "</span>
                <span id="level-header-number">{item_count}</span>
                <TakeEvalLink />
            </div>

            <NoticeBar />
            <OrderControls />
            <ItemList />
            <GroupItemsModal />
        </div>
    }
}
