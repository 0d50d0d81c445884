//! Derived-State Refresher
//!
//! Visible item count and the primary call-to-action.

use crate::config::Config;
use crate::store::TemplateState;

/// The "take evaluation" action: a live link, or an inert placeholder
/// carrying the same label when the template has no items
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallToAction {
    Live { label: String, href: String },
    Placeholder { label: String },
}

impl CallToAction {
    pub fn label(&self) -> &str {
        match self {
            CallToAction::Live { label, .. } | CallToAction::Placeholder { label } => label,
        }
    }

    pub fn is_live(&self) -> bool {
        matches!(self, CallToAction::Live { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Aggregates {
    pub item_count: usize,
    pub call_to_action: CallToAction,
}

/// Recompute aggregates from state. Run after every workflow completion
/// that changes top-level visibility.
pub fn refresh_aggregates(state: &TemplateState, config: &Config) -> Aggregates {
    let item_count = state.visible_count();
    let label = state.begin_eval_label.clone();
    let call_to_action = if item_count == 0 {
        CallToAction::Placeholder { label }
    } else {
        CallToAction::Live {
            label,
            href: config.take_evaluation_href(&state.template_id),
        }
    };
    log::debug!("aggregates: {} items, live={}", item_count, call_to_action.is_live());
    Aggregates { item_count, call_to_action }
}
