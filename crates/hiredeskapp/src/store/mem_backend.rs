use super::backend::KvBackend;
use crate::error::{HireError, Result};
use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, BTreeSet};
use std::rc::Rc;

#[derive(Default)]
struct MemState {
    entries: RefCell<BTreeMap<String, String>>,
    simulate_write_error: Cell<bool>,
    failing_keys: RefCell<BTreeSet<String>>,
    unavailable: Cell<bool>,
}

/// In-process key-value backend.
///
/// This is the last tier of every `TieredStore`: it never fails unless told
/// to, and its contents vanish with the process. It is also the backend
/// tests build on.
///
/// Uses `RefCell` for interior mutability since the store is single-threaded.
/// Clones share the same map, so a test can keep a handle to a backend it has
/// handed to a `TieredStore` and corrupt or inspect its contents directly.
#[derive(Clone, Default)]
pub struct MemKvBackend {
    state: Rc<MemState>,
}

impl MemKvBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable write error simulation for testing error handling.
    pub fn set_simulate_write_error(&self, simulate: bool) {
        self.state.simulate_write_error.set(simulate);
    }

    /// Reject writes to one key only, as a quota-exceeded store rejects a
    /// single oversized value.
    pub fn fail_writes_to(&self, key: &str) {
        self.state.failing_keys.borrow_mut().insert(key.to_string());
    }

    /// Undo [`MemKvBackend::fail_writes_to`].
    pub fn allow_writes_to(&self, key: &str) {
        self.state.failing_keys.borrow_mut().remove(key);
    }

    /// Make the availability probe fail, as a disabled or full store would.
    pub fn set_available(&self, available: bool) {
        self.state.unavailable.set(!available);
    }

    /// Write a value bypassing the simulated failure switch.
    pub fn insert_raw(&self, key: &str, value: &str) {
        self.state
            .entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
    }

    pub fn len(&self) -> usize {
        self.state.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl KvBackend for MemKvBackend {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.state.entries.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        if self.state.simulate_write_error.get() || self.state.unavailable.get() {
            return Err(HireError::Store("Simulated write error".to_string()));
        }
        if self.state.failing_keys.borrow().contains(key) {
            return Err(HireError::Store(format!("Simulated write error for {}", key)));
        }
        self.insert_raw(key, value);
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.state.entries.borrow_mut().remove(key);
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        self.state.entries.borrow_mut().clear();
        Ok(())
    }

    fn keys(&self, prefix: &str) -> Result<Vec<String>> {
        Ok(self
            .state
            .entries
            .borrow()
            .keys()
            .filter(|k| k.starts_with(prefix))
            .cloned()
            .collect())
    }

    fn is_available(&self) -> bool {
        !self.state.unavailable.get()
    }

    fn describe(&self) -> String {
        "memory".to_string()
    }
}
