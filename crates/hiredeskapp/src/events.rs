//! "Collection updated" notifications.
//!
//! Views re-render when a collection changes; the store tells them through
//! listeners registered with [`crate::store::Storage::subscribe`]. Listeners
//! run synchronously, after the write, in registration order.

use crate::model::Namespace;
use serde::Serialize;
use std::cell::RefCell;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ChangeKind {
    Saved { id: String },
    Deleted { id: String },
    Replaced { count: usize },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChangeEvent {
    pub namespace: Namespace,
    #[serde(flatten)]
    pub kind: ChangeKind,
}

type Listener = Box<dyn Fn(&ChangeEvent)>;

#[derive(Default)]
pub struct Listeners {
    listeners: RefCell<Vec<Listener>>,
}

impl Listeners {
    pub fn subscribe(&self, listener: impl Fn(&ChangeEvent) + 'static) {
        self.listeners.borrow_mut().push(Box::new(listener));
    }

    pub fn notify(&self, event: &ChangeEvent) {
        for listener in self.listeners.borrow().iter() {
            listener(event);
        }
    }

    pub fn len(&self) -> usize {
        self.listeners.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
