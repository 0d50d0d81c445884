//! Take Evaluation Link Component
//!
//! Live link while the template has items, an inert placeholder otherwise.

use leptos::prelude::*;

use crate::aggregates::{refresh_aggregates, CallToAction};
use crate::context::use_app_context;

#[component]
pub fn TakeEvalLink() -> impl IntoView {
    let ctx = use_app_context();
    let call_to_action = Memo::new(move |_| {
        ctx.state.with(|s| ctx.config.with_value(|c| refresh_aggregates(s, c)).call_to_action)
    });

    move || match call_to_action.get() {
        CallToAction::Live { label, href } => view! {
            <a id="begin_eval_link" href=href>{label}</a>
        }
        .into_any(),
        CallToAction::Placeholder { label } => view! {
            <span id="begin-eval-dummylink">{label}</span>
        }
        .into_any(),
    }
}
