//! Item Text Component
//!
//! Item text with a more/less toggle for long entries.

use leptos::prelude::*;

use crate::context::use_app_context;
use crate::text;

#[component]
pub fn ItemText(text: String) -> impl IntoView {
    let ctx = use_app_context();
    let limit = ctx.config.with_value(|c| c.long_text_chars);
    let (expanded, set_expanded) = signal(false);

    match text::collapse_long(&text, limit) {
        None => view! { <span class="item-text">{text}</span> }.into_any(),
        Some(short) => view! {
            <span class="item-text">
                {move || if expanded.get() { text.clone() } else { short.clone() }}
                " "
                <a
                    href="#"
                    class="item-text-toggle"
                    on:click=move |ev| {
                        ev.prevent_default();
                        set_expanded.update(|v| *v = !*v);
                    }
                >
                    {move || if expanded.get() { "less" } else { "...more" }}
                </a>
            </span>
        }
        .into_any(),
    }
}
