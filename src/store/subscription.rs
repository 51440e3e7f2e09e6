//! Observer registry and subscription handles.

use crate::core::Change;
use parking_lot::Mutex;
use std::fmt;
use std::sync::{Arc, Weak};

type ChangeListener = Arc<dyn Fn(&Change) + Send + Sync>;
type ActionListener<A> = Arc<dyn Fn(&A) + Send + Sync>;

struct Listeners<A> {
    next_id: u64,
    changes: Vec<(u64, ChangeListener)>,
    actions: Vec<(u64, ActionListener<A>)>,
}

/// Change and action observers of one store.
///
/// Listeners are cloned out of the registry before they run, so a listener
/// may subscribe, unsubscribe or commit without deadlocking.
pub(crate) struct Observers<A> {
    listeners: Mutex<Listeners<A>>,
}

impl<A: 'static> Observers<A> {
    pub(crate) fn new() -> Arc<Self> {
        Arc::new(Self {
            listeners: Mutex::new(Listeners {
                next_id: 0,
                changes: Vec::new(),
                actions: Vec::new(),
            }),
        })
    }

    pub(crate) fn on_change(self: &Arc<Self>, listener: ChangeListener) -> Subscription {
        let id = {
            let mut listeners = self.listeners.lock();
            let id = listeners.allocate_id();
            listeners.changes.push((id, listener));
            id
        };
        self.handle(id)
    }

    pub(crate) fn on_action(self: &Arc<Self>, listener: ActionListener<A>) -> Subscription {
        let id = {
            let mut listeners = self.listeners.lock();
            let id = listeners.allocate_id();
            listeners.actions.push((id, listener));
            id
        };
        self.handle(id)
    }

    pub(crate) fn notify_change(&self, change: &Change) {
        let current: Vec<ChangeListener> = {
            let listeners = self.listeners.lock();
            listeners.changes.iter().map(|(_, l)| Arc::clone(l)).collect()
        };
        for listener in current {
            listener(change);
        }
    }

    pub(crate) fn notify_action(&self, action: &A) {
        let current: Vec<ActionListener<A>> = {
            let listeners = self.listeners.lock();
            listeners.actions.iter().map(|(_, l)| Arc::clone(l)).collect()
        };
        for listener in current {
            listener(action);
        }
    }

    pub(crate) fn len(&self) -> usize {
        let listeners = self.listeners.lock();
        listeners.changes.len() + listeners.actions.len()
    }

    fn remove(&self, id: u64) {
        let mut listeners = self.listeners.lock();
        listeners.changes.retain(|(existing, _)| *existing != id);
        listeners.actions.retain(|(existing, _)| *existing != id);
    }

    fn handle(self: &Arc<Self>, id: u64) -> Subscription {
        let registry: Weak<Self> = Arc::downgrade(self);
        Subscription {
            unsubscribe: Some(Box::new(move || {
                if let Some(registry) = registry.upgrade() {
                    registry.remove(id);
                }
            })),
        }
    }
}

impl<A> Listeners<A> {
    fn allocate_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }
}

/// Handle to a registered observer.
///
/// Dropping the handle unsubscribes. Call [`detach`](Subscription::detach)
/// to keep the observer for as long as the store lives.
#[must_use = "dropping a Subscription unsubscribes immediately"]
pub struct Subscription {
    unsubscribe: Option<Box<dyn FnOnce() + Send + Sync>>,
}

impl Subscription {
    /// Keep the observer registered for the lifetime of the store.
    pub fn detach(mut self) {
        self.unsubscribe = None;
    }

    /// Unsubscribe now.
    pub fn cancel(self) {
        drop(self);
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(unsubscribe) = self.unsubscribe.take() {
            unsubscribe();
        }
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.unsubscribe.is_some())
            .finish()
    }
}
