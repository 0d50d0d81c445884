//! Notice Bar Component
//!
//! Dismissible notices left behind by the grouping and deletion workflows.
//! Request failures offer the recent log lines for bug reports.

use leptos::prelude::*;

use crate::context::use_app_context;
use crate::models::{Notice, NoticeKind};

fn notice_class(notice: &Notice) -> &'static str {
    match notice.kind {
        NoticeKind::Validation => "notice notice-validation",
        NoticeKind::Transport => "notice notice-error",
    }
}

/// Log lines shown under a request failure
const LOG_DETAIL_LINES: usize = 20;

#[component]
fn LogDetails() -> impl IntoView {
    let (open, set_open) = signal(false);
    view! {
        <a
            href="#"
            class="notice-details-toggle"
            on:click=move |ev| {
                ev.prevent_default();
                set_open.update(|v| *v = !*v);
            }
        >
            {move || if open.get() { "hide details" } else { "details" }}
        </a>
        <Show when=move || open.get()>
            <pre class="notice-log">{rolling_logger::tail(LOG_DETAIL_LINES).join("\n")}</pre>
        </Show>
    }
}

#[component]
pub fn NoticeBar() -> impl IntoView {
    let ctx = use_app_context();
    // An open selection shows its own notice
    let grouping_notice = move || ctx.grouping.with(|wf| wf.notice().filter(|_| !wf.is_open()).cloned());
    let deletion_notice = move || ctx.deletion.with(|wf| wf.notice().cloned());

    view! {
        {move || grouping_notice().map(|notice| view! {
            <div class=notice_class(&notice)>
                <span class="notice-text">{notice.message.clone()}</span>
                {(notice.kind == NoticeKind::Transport).then(|| view! { <LogDetails /> })}
                <button
                    class="notice-dismiss"
                    on:click=move |_| ctx.grouping.update(|wf| wf.dismiss_notice())
                >
                    "×"
                </button>
            </div>
        })}
        {move || deletion_notice().map(|notice| view! {
            <div class=notice_class(&notice)>
                <span class="notice-text">{notice.message.clone()}</span>
                {(notice.kind == NoticeKind::Transport).then(|| view! { <LogDetails /> })}
                <button
                    class="notice-dismiss"
                    on:click=move |_| ctx.deletion.update(|wf| wf.dismiss_notice())
                >
                    "×"
                </button>
            </div>
        })}
    }
}
