//! # Storage Layer
//!
//! hiredesk keeps every collection in a plain key-value store. There is no
//! database engine underneath: a collection is one JSON array under one key,
//! read whole and rewritten whole.
//!
//! ## Layers
//!
//! ```text
//! RecordStore<R>      findAll / findById / save / delete per namespace
//!   ├─ SoftValidator  sanitize or reject strings, stamp updatedAt
//!   ├─ BackupManager  snapshot after writes, restore on unreadable reads
//!   └─ TieredStore    durable → session → memory fallback chain
//!        └─ KvBackend FsKvBackend (files), MemKvBackend (process memory)
//! TtlCache            expiring entries for derived data (dashboard)
//! ```
//!
//! ## Key Layout
//!
//! | Key | Contents |
//! |-----|----------|
//! | `wf:<namespace>` | JSON array of records |
//! | `wf:<namespace>_emergency` | JSON array, written only when the primary write fails |
//! | `backup_wf:<namespace>` | `{timestamp, data, namespace}` snapshot |
//! | `cache:dashboard` | TTL envelope around the dashboard summary |
//! | `theme` | `light` or `dark` |
//! | `auth_session` | `{email, name, role, loginTime}` |
//!
//! ## Failure Policy
//!
//! - Reads never fail. A pending emergency copy is newer than the primary
//!   key and is read first. Otherwise an unreadable or missing primary
//!   falls back to the snapshot, then an empty list.
//! - Writes fail only on validation. Storage failures are logged and the
//!   collection is written to the emergency key instead.
//!
//! ## Concurrency
//!
//! Everything is single-threaded (`Rc`, `RefCell`). Two writers sharing the
//! same durable directory race on whole-collection rewrites and the last one
//! wins; there is no locking.

use crate::clock::Clock;
use crate::events::{ChangeEvent, Listeners};
use crate::model::{Namespace, Record};
use crate::validate::SoftValidator;
use std::cell::Cell;
use std::rc::Rc;

pub mod backend;
pub mod backup;
pub mod fs_backend;
pub mod mem_backend;
pub mod record_store;
pub mod tiered;
pub mod ttl;

use backup::BackupManager;
use record_store::RecordStore;
use tiered::TieredStore;
use ttl::TtlCache;

pub mod keys {
    use crate::model::Namespace;

    pub const THEME: &str = "theme";
    pub const AUTH_SESSION: &str = "auth_session";
    pub const DASHBOARD: &str = "cache:dashboard";

    pub fn primary(namespace: Namespace) -> String {
        format!("wf:{}", namespace)
    }

    pub fn emergency(namespace: Namespace) -> String {
        format!("wf:{}_emergency", namespace)
    }

    pub fn backup(namespace: Namespace) -> String {
        format!("backup_wf:{}", namespace)
    }
}

/// Hands out numeric string ids: the current time in milliseconds, bumped
/// so ids are strictly increasing within the process and never collide with
/// ids already in the collection.
#[derive(Debug, Default)]
pub struct IdGenerator {
    last: Cell<i64>,
}

impl IdGenerator {
    pub fn next(&self, now_ms: i64, taken: impl Fn(&str) -> bool) -> String {
        let mut candidate = now_ms.max(self.last.get() + 1);
        while taken(&candidate.to_string()) {
            candidate += 1;
        }
        self.last.set(candidate);
        candidate.to_string()
    }
}

/// Everything the record stores share, built once at startup and passed
/// around behind an `Rc`.
pub struct Storage {
    kv: Rc<TieredStore>,
    clock: Rc<dyn Clock>,
    validator: SoftValidator,
    backup: BackupManager,
    cache: TtlCache,
    ids: IdGenerator,
    listeners: Listeners,
}

impl Storage {
    pub fn new(
        kv: TieredStore,
        validator: SoftValidator,
        retention: chrono::Duration,
        clock: Rc<dyn Clock>,
    ) -> Rc<Self> {
        let kv = Rc::new(kv);
        Rc::new(Self {
            backup: BackupManager::new(kv.clone(), clock.clone(), retention),
            cache: TtlCache::new(kv.clone(), clock.clone()),
            kv,
            clock,
            validator,
            ids: IdGenerator::default(),
            listeners: Listeners::default(),
        })
    }

    /// The store of one record type.
    pub fn records<R: Record>(self: &Rc<Self>) -> RecordStore<R> {
        RecordStore::new(self.clone())
    }

    pub fn kv(&self) -> &TieredStore {
        &self.kv
    }

    pub fn clock(&self) -> &dyn Clock {
        self.clock.as_ref()
    }

    pub fn validator(&self) -> &SoftValidator {
        &self.validator
    }

    pub fn backup(&self) -> &BackupManager {
        &self.backup
    }

    pub fn cache(&self) -> &TtlCache {
        &self.cache
    }

    pub(crate) fn ids(&self) -> &IdGenerator {
        &self.ids
    }

    pub fn subscribe(&self, listener: impl Fn(&ChangeEvent) + 'static) {
        self.listeners.subscribe(listener);
    }

    pub(crate) fn notify(&self, event: ChangeEvent) {
        self.listeners.notify(&event);
    }

    /// Namespaces that currently have a primary collection key.
    pub fn populated_namespaces(&self) -> Vec<Namespace> {
        Namespace::ALL
            .into_iter()
            .filter(|ns| self.kv.get(&keys::primary(*ns)).is_some())
            .collect()
    }
}
