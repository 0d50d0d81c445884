//! Item List Component
//!
//! Top-level rows with drag-to-reorder. Drop slots sit between rows.

use leptos::prelude::*;

use crate::components::ItemRow;
use crate::context::use_app_context;
use crate::models::{ItemId, TopLevelRow};

use leptos_dragdrop::*;

#[component]
pub fn ItemList() -> impl IntoView {
    let ctx = use_app_context();
    let dnd = create_dnd_signals();

    // No sorting while a save or removal is in flight
    Effect::new(move |_| {
        let locked = ctx.state.with(|s| s.order_submitting) || ctx.deletion.with(|wf| wf.is_committing());
        dnd.locked_write.set(locked);
    });

    bind_global_mouseup(dnd, move |dragged_id, slot| {
        let id = ItemId::new(dragged_id);
        let Some(from) = ctx.state.with_untracked(|s| s.row_index(&id)) else {
            log::debug!("[DND] {} is not a top-level row", id);
            return;
        };
        let to = resolve_position(from, slot.position);
        log::debug!("[DND] drop {} from row {} into slot {}", id, from, slot.position);
        ctx.move_row(&id, to + 1);
    });

    let rows = move || {
        ctx.state.with(|s| {
            s.rows
                .iter()
                .enumerate()
                .map(|(i, row)| (i + 1, row.clone()))
                .collect::<Vec<_>>()
        })
    };

    view! {
        <div class="item-list">
            <DropSlotLine dnd=dnd slot={DropSlot { position: 0 }} />
            <For
                each=rows
                key=|(label, row): &(usize, TopLevelRow)| {
                    let children: Vec<ItemId> = row
                        .as_block()
                        .map(|b| b.children.iter().map(|c| c.id.clone()).collect())
                        .unwrap_or_default();
                    (row.id().clone(), *label, row.head().text.clone(), children)
                }
                children=move |(label, row)| {
                    view! {
                        <ItemRow row=row label=label dnd=dnd />
                        <DropSlotLine dnd=dnd slot={DropSlot { position: label }} />
                    }
                }
            />
        </div>
    }
}

/// Horizontal gap a dragged row can be dropped into
#[component]
pub fn DropSlotLine(dnd: DndSignals, slot: DropSlot) -> impl IntoView {
    let on_mouseenter = make_on_slot_mouseenter(dnd, slot.clone());
    let on_mouseleave = make_on_mouseleave(dnd);

    let is_active = move || dnd.drop_slot_read.get().as_ref() == Some(&slot);
    let is_dragging = move || dnd.dragging_id_read.get().is_some();

    let slot_class = move || {
        let mut c = String::from("drop-zone");
        if !is_dragging() { c.push_str(" hidden"); }
        if is_active() { c.push_str(" active"); }
        c
    };

    view! {
        <div
            class=slot_class
            on:mouseenter=on_mouseenter
            on:mouseleave=on_mouseleave
        />
    }
}
