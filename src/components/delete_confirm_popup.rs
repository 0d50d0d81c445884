//! Delete Confirm Popup Component
//!
//! Inline confirmation for the delete/ungroup action of one row.

use leptos::prelude::*;

use crate::context::use_app_context;
use crate::messages;
use crate::models::ItemId;

/// Shown under a row while its confirmation is open
#[component]
pub fn DeleteConfirmPopup(target: ItemId) -> impl IntoView {
    let ctx = use_app_context();
    let is_open = {
        let target = target.clone();
        move || ctx.deletion.with(|wf| wf.pending().is_some_and(|p| p.target == target))
    };
    let action = move || ctx.deletion.with(|wf| ctx.messages.with_value(|m| wf.action_label(m)).unwrap_or_default());
    let label = move || ctx.deletion.with(|wf| wf.pending().map(|p| p.label.clone()).unwrap_or_default());

    view! {
        <Show when=is_open.clone()>
            <div class="delete-confirm">
                <span class="delete-confirm-text">
                    {action} " item \"" {label} "\"?"
                </span>
                <button
                    class="confirm-btn"
                    on:click=move |ev| {
                        ev.stop_propagation();
                        ctx.confirm_deletion();
                    }
                >
                    {action}
                </button>
                <button
                    class="cancel-btn"
                    on:click=move |ev| {
                        ev.stop_propagation();
                        ctx.deletion.update(|wf| wf.cancel());
                    }
                >
                    {ctx.msg(messages::CANCEL_BUTTON)}
                </button>
            </div>
        </Show>
    }
}
