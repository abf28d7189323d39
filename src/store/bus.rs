//! Change notification bus
//!
//! Synchronous in-process publish/subscribe. Saving through the store
//! publishes a typed event carrying the new value, so long-running
//! callers can refresh open views without re-reading the whole document.
//! The allocator never touches this; it stays a pure function.

use crate::dmx::plan::{AddressingParameters, PlanEntry};
use crate::library::FixtureRecord;
use std::fmt;
use std::sync::{Arc, Mutex};

/// A state change, with the new value as payload
#[derive(Clone, Debug)]
pub enum ChangeEvent {
    PlanChanged(Vec<PlanEntry>),
    ParamsChanged(AddressingParameters),
    LibraryChanged(Vec<FixtureRecord>),
    DipChanged(u16),
}

type Listener = Box<dyn Fn(&ChangeEvent) + Send>;

/// Listener registry shared by clones of the store
#[derive(Clone, Default)]
pub struct ChangeBus {
    listeners: Arc<Mutex<Vec<Listener>>>,
}

impl ChangeBus {
    /// Create an empty bus
    pub fn new() -> Self {
        ChangeBus::default()
    }

    /// Register a listener for every subsequent event
    pub fn subscribe<F>(&self, listener: F)
    where
        F: Fn(&ChangeEvent) + Send + 'static,
    {
        if let Ok(mut listeners) = self.listeners.lock() {
            listeners.push(Box::new(listener));
        }
    }

    /// Deliver an event to every listener, in subscription order
    pub fn publish(&self, event: &ChangeEvent) {
        if let Ok(listeners) = self.listeners.lock() {
            for listener in listeners.iter() {
                listener(event);
            }
        }
    }
}

impl fmt::Debug for ChangeBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let count = self.listeners.lock().map(|l| l.len()).unwrap_or(0);
        f.debug_struct("ChangeBus").field("listeners", &count).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn events_reach_every_listener_in_order() {
        let bus = ChangeBus::new();
        let seen = Arc::new(Mutex::new(Vec::new()));

        for tag in ["a", "b"] {
            let seen = Arc::clone(&seen);
            bus.subscribe(move |event| {
                if let ChangeEvent::DipChanged(address) = event {
                    seen.lock().unwrap().push((tag, *address));
                }
            });
        }

        bus.publish(&ChangeEvent::DipChanged(101));
        assert_eq!(*seen.lock().unwrap(), vec![("a", 101), ("b", 101)]);
    }

    #[test]
    fn plan_events_carry_the_new_plan() {
        let bus = ChangeBus::new();
        let count = Arc::new(Mutex::new(0usize));
        {
            let count = Arc::clone(&count);
            bus.subscribe(move |event| {
                if let ChangeEvent::PlanChanged(plan) = event {
                    *count.lock().unwrap() = plan.len();
                }
            });
        }

        let plan = vec![crate::dmx::plan::PlanEntry::new(
            crate::dmx::plan::FixtureSpec::adhoc(8),
            2,
        )];
        bus.publish(&ChangeEvent::PlanChanged(plan));
        assert_eq!(*count.lock().unwrap(), 1);
    }
}
