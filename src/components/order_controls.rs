//! Order Controls Component
//!
//! Save-order button, armed only while the order differs from the saved one.

use leptos::prelude::*;

use crate::context::use_app_context;
use crate::messages;
use crate::order;

#[component]
pub fn OrderControls() -> impl IntoView {
    let ctx = use_app_context();
    let enabled = Memo::new(move |_| ctx.state.with(order::save_enabled));
    let submitting = move || ctx.state.with(|s| s.order_submitting);

    view! {
        <div class="order-controls">
            <button
                class="save-order-btn"
                disabled=move || !enabled.get()
                on:click=move |_| ctx.save_order()
            >
                {ctx.msg(messages::SAVE_ORDER_BUTTON)}
            </button>
            <Show when=submitting>
                <span class="loading-indicator">"…"</span>
            </Show>
            {move || ctx.order_error.get().map(|e| view! {
                <span class="notice notice-error">{e}</span>
            })}
        </div>
    }
}
