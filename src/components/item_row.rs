//! Item Row Component
//!
//! One top-level row (a standalone item or a block with its children).

use leptos::prelude::*;

use crate::components::{DeleteConfirmPopup, ItemText};
use crate::context::{use_app_context, AppContext};
use crate::messages;
use crate::models::{ItemId, ItemRef, TargetKind, TemplateItem, TopLevelRow};
use crate::order;

use leptos_dragdrop::*;

fn row_class(ctx: AppContext, id: &ItemId, base: &str) -> String {
    let mut c = String::from(base);
    if ctx.deletion.with(|wf| wf.highlighted() == Some(id)) { c.push_str(" highlight"); }
    if ctx.fading.with(|f| f.as_ref() == Some(id)) { c.push_str(" fading"); }
    c
}

/// Delete/ungroup trigger; clicking it again closes the popup
#[component]
fn ActionTrigger(target: ItemId, kind: TargetKind, reference: &'static str, label: String) -> impl IntoView {
    let ctx = use_app_context();
    view! {
        <a
            href="#"
            class="item-action"
            on:click=move |ev| {
                ev.prevent_default();
                ctx.toggle_confirmation(target.clone(), kind, reference);
            }
        >
            {label}
        </a>
    }
}

#[component]
pub fn ItemRow(row: TopLevelRow, label: usize, dnd: DndSignals) -> impl IntoView {
    let ctx = use_app_context();
    let head = row.head().clone();
    let id = head.id.clone();
    let is_block = row.as_block().is_some();

    let busy = {
        let id = id.clone();
        move || ctx.state.with(|s| s.is_busy(&id))
    };
    let select_disabled = {
        let busy = busy.clone();
        move || busy() || ctx.state.with(|s| s.order_submitting)
    };
    let max = move || ctx.state.with(order::dropdown_max);

    let on_mousedown = make_on_mousedown(dnd, id.to_string());
    let class = {
        let id = id.clone();
        let base = if is_block { "item-row block-row" } else { "item-row" };
        move || {
            let mut c = row_class(ctx, &id, base);
            if dnd.dragging_id_read.with(|d| d.as_deref() == Some(id.as_str())) { c.push_str(" dragging"); }
            c
        }
    };

    let move_id = id.clone();
    let on_select = move |ev: web_sys::Event| {
        if let Ok(position) = event_target_value(&ev).parse::<usize>() {
            ctx.move_row(&move_id, position);
        }
    };

    let (kind, action_msg) = if is_block {
        (TargetKind::Block, messages::UNGROUP_COMMAND)
    } else {
        (TargetKind::StandaloneItem, messages::DELETE_COMMAND)
    };

    view! {
        <div class=class on:mousedown=on_mousedown>
            <span class="item-label">{label}"."</span>
            <select class="item-position" disabled=select_disabled on:change=on_select>
                {move || (1..=max()).map(|n| view! {
                    <option value=n.to_string() selected={n == label}>{n}</option>
                }).collect_view()}
            </select>
            <ItemText text=head.text.clone() />

            <span class="item-actions">
                <Show
                    when=busy.clone()
                    fallback={
                        let id = id.clone();
                        move || view! {
                            <ActionTrigger
                                target=id.clone()
                                kind=kind
                                reference=ItemRef::TEMPLATE_ITEM
                                label=ctx.msg(action_msg)
                            />
                        }
                    }
                >
                    <span class="loading-indicator">"…"</span>
                </Show>
                {is_block.then(|| {
                    let start_id = id.clone();
                    let href = ctx.state.with_untracked(|s| {
                        ctx.config.with_value(|c| c.new_group_item_href(id.as_str(), &s.template_id))
                    });
                    let idle = busy.clone();
                    view! {
                        <Show when=move || !idle()>
                            <a
                                href="#"
                                class="item-action add-existing"
                                on:click={
                                    let start_id = start_id.clone();
                                    move |ev| {
                                        ev.prevent_default();
                                        ctx.start_grouping(start_id.clone());
                                    }
                                }
                            >
                                {ctx.msg(messages::ADD_EXISTING_ITEM)}
                            </a>
                            <a href=href.clone() class="item-action add-new">{ctx.msg(messages::ADD_NEW_GROUP_ITEM)}</a>
                        </Show>
                    }
                })}
            </span>
        </div>
        <DeleteConfirmPopup target=id.clone() />
        {is_block.then(|| view! { <BlockChildren block_id=id.clone() /> })}
    }
}

#[component]
fn BlockChildren(block_id: ItemId) -> impl IntoView {
    let ctx = use_app_context();

    let children = move || {
        // Re-render after a re-sort even when the ids did not change
        let _ = ctx.resort_trigger.get();
        ctx.state.with(|s| {
            s.block(&block_id)
                .map(|b| b.children.iter().cloned().enumerate().collect::<Vec<_>>())
                .unwrap_or_default()
        })
    };

    view! {
        <div class="block-children">
            <For
                each=children
                key=move |(i, child): &(usize, TemplateItem)| (child.id.clone(), *i, ctx.resort_trigger.get_untracked())
                children=move |(_, child)| view! { <BlockChildRow child=child /> }
            />
        </div>
    }
}

/// A child of a block, with delete and ungroup triggers
#[component]
pub fn BlockChildRow(child: TemplateItem) -> impl IntoView {
    let ctx = use_app_context();
    let id = child.id.clone();

    let busy = {
        let id = id.clone();
        move || ctx.state.with(|s| s.is_busy(&id))
    };
    let class = {
        let id = id.clone();
        move || row_class(ctx, &id, "item-row block-child")
    };

    view! {
        <div class=class>
            <ItemText text=child.text.clone() />
            <span class="item-actions">
                <Show
                    when=busy
                    fallback={
                        let id = id.clone();
                        move || view! {
                            <ActionTrigger
                                target=id.clone()
                                kind=TargetKind::BlockChildItem
                                reference=ItemRef::TEMPLATE_ITEM
                                label=ctx.msg(messages::DELETE_COMMAND)
                            />
                            <ActionTrigger
                                target=id.clone()
                                kind=TargetKind::BlockChildItem
                                reference=ItemRef::UNBLOCK
                                label=ctx.msg(messages::UNGROUP_COMMAND)
                            />
                        }
                    }
                >
                    <span class="loading-indicator">"…"</span>
                </Show>
            </span>
        </div>
        <DeleteConfirmPopup target=id.clone() />
    }
}
