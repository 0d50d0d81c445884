//! Workflow Notifications
//!
//! Explicit subscriptions replace document-level custom events.

use std::fmt;

use crate::models::ItemId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateEvent {
    /// A child left the block; remaining children should re-sort
    ChildrenResort { block_id: ItemId },
    /// Top-level rows were added, removed or regrouped
    StructureChanged { version: u64 },
    /// The view cannot be patched in place and must reload from the server
    ReloadRequired,
}

type Listener = Box<dyn Fn(&TemplateEvent)>;

/// Listener registry; attach once per rendered view
#[derive(Default)]
pub struct EventListeners {
    listeners: Vec<Listener>,
}

impl EventListeners {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, listener: impl Fn(&TemplateEvent) + 'static) {
        self.listeners.push(Box::new(listener));
    }

    pub fn emit(&self, event: &TemplateEvent) {
        log::debug!("event {:?} -> {} listeners", event, self.listeners.len());
        for listener in &self.listeners {
            listener(event);
        }
    }
}

impl fmt::Debug for EventListeners {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventListeners").field("count", &self.listeners.len()).finish()
    }
}
