//! Group Items Modal Component
//!
//! Selection surface for adding existing items to a block.

use leptos::prelude::*;

use crate::context::use_app_context;
use crate::grouping::SelectionEntry;
use crate::messages;
use crate::text;

#[component]
pub fn GroupItemsModal() -> impl IntoView {
    let ctx = use_app_context();
    let is_open = move || ctx.grouping.with(|wf| wf.is_open());
    let submitting = move || ctx.grouping.with(|wf| wf.is_submitting());
    let entries = move || ctx.grouping.with(|wf| wf.entries().to_vec());
    let commit_disabled = move || ctx.grouping.with(|wf| !wf.commit_enabled());
    let cancel_disabled = move || ctx.grouping.with(|wf| !wf.cancel_enabled());
    let notice = move || ctx.grouping.with(|wf| wf.notice().map(|n| n.message.clone()));
    let long_text = ctx.config.with_value(|c| c.long_text_chars);

    view! {
        <Show when=is_open>
            <div class="modal-overlay">
                <div class="modal group-items-modal">
                    <h3 class="modal-title">{ctx.msg(messages::ADD_EXISTING_ITEM)}</h3>

                    <div class="select-controls">
                        <a href="#" on:click=move |ev| {
                            ev.prevent_default();
                            ctx.grouping.update(|wf| wf.select_all());
                        }>
                            {ctx.msg(messages::SELECT_ALL)}
                        </a>
                        " | "
                        <a href="#" on:click=move |ev| {
                            ev.prevent_default();
                            ctx.grouping.update(|wf| wf.select_none());
                        }>
                            {ctx.msg(messages::SELECT_NONE)}
                        </a>
                    </div>

                    <ul class="group-candidates">
                        <For
                            each=entries
                            key=|e: &SelectionEntry| (e.candidate.item_id.clone(), e.checked)
                            children=move |entry| {
                                let id = entry.candidate.item_id.clone();
                                let input_id = format!("group-add-{}", entry.candidate.row_id);
                                let shown = text::collapse_long(&entry.candidate.text, long_text)
                                    .unwrap_or_else(|| entry.candidate.text.clone());
                                view! {
                                    <li class="group-candidate">
                                        <input
                                            type="checkbox"
                                            id=input_id.clone()
                                            title=ctx.msg(messages::ITEM_CHECKBOX_TITLE)
                                            checked=entry.checked
                                            disabled=submitting
                                            on:change=move |ev| {
                                                let checked = event_target_checked(&ev);
                                                ctx.grouping.update(|wf| wf.set_checked(&id, checked));
                                            }
                                        />
                                        <label for=input_id>
                                            <strong>{entry.candidate.row_number}". "</strong>
                                            {shown}
                                        </label>
                                    </li>
                                }
                            }
                        />
                    </ul>

                    {move || notice().map(|message| view! {
                        <div class="notice notice-error">{message}</div>
                    })}

                    <div class="modal-actions">
                        <button
                            class="commit-btn"
                            disabled=commit_disabled
                            on:click=move |_| ctx.submit_grouping()
                        >
                            {ctx.msg(messages::ADD_ITEM_BUTTON)}
                        </button>
                        <button
                            class="cancel-btn"
                            disabled=cancel_disabled
                            on:click=move |_| ctx.grouping.update(|wf| wf.cancel())
                        >
                            {ctx.msg(messages::CANCEL_BUTTON)}
                        </button>
                        <Show when=submitting>
                            <span class="loading-indicator">"…"</span>
                        </Show>
                    </div>
                </div>
            </div>
        </Show>
    }
}
