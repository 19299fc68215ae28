//! # API Facade
//!
//! The API layer is a **thin facade** over the storage layer. It is the single
//! entry point for every hiredesk operation, regardless of the UI being used.
//!
//! ## Role and Responsibilities
//!
//! The API facade:
//! - **Owns** the shared [`Storage`] and the snapshot timer
//! - **Dispatches** namespace-addressed calls (`list candidates`) to the typed
//!   [`RecordStore`] for that namespace
//! - **Returns structured types**: records, JSON values, reports
//!
//! ## What the API Does NOT Do
//!
//! - **Business logic**: validation and id rules live in `store` and `model`
//! - **Presentation concerns**: no stdout, no formatting
//!
//! ## Lifecycle
//!
//! 1. [`HireApi::startup`] seeds empty namespaces. Call it before the first
//!    read so no view ever observes a half-seeded store.
//! 2. [`HireApi::tick`] is called from the host loop; every
//!    `backup_interval` it snapshots each namespace.
//! 3. [`HireApi::cleanup`] stops the timer at teardown.

use crate::clock::Clock;
use crate::config::HireConfig;
use crate::dashboard::{self, DashboardSummary};
use crate::error::{HireError, Result};
use crate::model::{Candidate, Interview, Job, Namespace, Record};
use crate::prefs::{self, AuthSession, Theme};
use crate::seed::{self, SeedReport};
use crate::store::backup::{SnapshotInfo, SnapshotTimer};
use crate::store::record_store::RecordStore;
use crate::store::tiered::{TierKind, TieredStore};
use crate::store::Storage;
use serde::Serialize;
use serde_json::Value;
use std::cell::RefCell;
use std::path::PathBuf;
use std::rc::Rc;
use tracing::{debug, info};

/// Where the durable and session tiers keep their files.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct HirePaths {
    pub data: Option<PathBuf>,
    pub session: Option<PathBuf>,
}

/// Status of the storage layer, for `hiredesk backup status`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageStatus {
    pub active_tier: TierKind,
    pub snapshots: Vec<SnapshotInfo>,
}

/// The main API facade for hiredesk operations.
pub struct HireApi {
    storage: Rc<Storage>,
    config: HireConfig,
    paths: HirePaths,
    timer: RefCell<SnapshotTimer>,
}

impl HireApi {
    pub fn new(kv: TieredStore, config: HireConfig, clock: Rc<dyn Clock>, paths: HirePaths) -> Self {
        let now = clock.now();
        let storage = Storage::new(kv, config.validator(), config.backup_retention(), clock);
        dashboard::invalidate_on_change(&storage);
        let timer = SnapshotTimer::new(config.backup_interval(), now);
        Self {
            storage,
            config,
            paths,
            timer: RefCell::new(timer),
        }
    }

    pub fn storage(&self) -> &Rc<Storage> {
        &self.storage
    }

    pub fn config(&self) -> &HireConfig {
        &self.config
    }

    pub fn paths(&self) -> &HirePaths {
        &self.paths
    }

    pub fn candidates(&self) -> RecordStore<Candidate> {
        self.storage.records()
    }

    pub fn jobs(&self) -> RecordStore<Job> {
        self.storage.records()
    }

    pub fn interviews(&self) -> RecordStore<Interview> {
        self.storage.records()
    }

    /// Seed empty namespaces with the bundled fixtures.
    pub fn startup(&self) -> Result<SeedReport> {
        let report = seed::seed(&self.storage)?;
        if report.total() > 0 {
            info!(records = report.total(), "first run, sample data loaded");
        }
        Ok(report)
    }

    /// Poll the snapshot timer. Returns true when snapshots were taken.
    pub fn tick(&self) -> bool {
        let now = self.storage.clock().now();
        if !self.timer.borrow_mut().poll(now) {
            return false;
        }
        debug!("periodic snapshot due");
        self.snapshot_all();
        true
    }

    /// Snapshot every namespace from its primary collection. Returns the
    /// namespaces that were written.
    pub fn snapshot_all(&self) -> Vec<Namespace> {
        Namespace::ALL
            .into_iter()
            .filter(|ns| self.snapshot(*ns))
            .collect()
    }

    pub fn snapshot(&self, namespace: Namespace) -> bool {
        match namespace {
            Namespace::Candidates => self.candidates().snapshot(),
            Namespace::Jobs => self.jobs().snapshot(),
            Namespace::Interviews => self.interviews().snapshot(),
        }
    }

    pub fn cleanup(&self) {
        self.timer.borrow_mut().cancel();
    }

    pub fn timer_active(&self) -> bool {
        self.timer.borrow().is_active()
    }

    pub fn list_values(&self, namespace: Namespace) -> Result<Vec<Value>> {
        match namespace {
            Namespace::Candidates => to_values(self.candidates().find_all()),
            Namespace::Jobs => to_values(self.jobs().find_all()),
            Namespace::Interviews => to_values(self.interviews().find_all()),
        }
    }

    pub fn get_value(&self, namespace: Namespace, id: &str) -> Result<Value> {
        let found = match namespace {
            Namespace::Candidates => to_value(self.candidates().find_by_id(id))?,
            Namespace::Jobs => to_value(self.jobs().find_by_id(id))?,
            Namespace::Interviews => to_value(self.interviews().find_by_id(id))?,
        };
        found.ok_or_else(|| HireError::NotFound {
            namespace,
            id: id.to_string(),
        })
    }

    pub fn save_value(&self, namespace: Namespace, value: Value) -> Result<Value> {
        let saved = match namespace {
            Namespace::Candidates => serde_json::to_value(self.candidates().save_value(value)?)?,
            Namespace::Jobs => serde_json::to_value(self.jobs().save_value(value)?)?,
            Namespace::Interviews => serde_json::to_value(self.interviews().save_value(value)?)?,
        };
        Ok(saved)
    }

    pub fn delete(&self, namespace: Namespace, id: &str) -> Result<()> {
        let deleted = match namespace {
            Namespace::Candidates => self.candidates().delete(id),
            Namespace::Jobs => self.jobs().delete(id),
            Namespace::Interviews => self.interviews().delete(id),
        };
        if deleted {
            Ok(())
        } else {
            Err(HireError::NotFound {
                namespace,
                id: id.to_string(),
            })
        }
    }

    /// Replace a namespace's collection with its snapshot. Fails when there is
    /// no fresh snapshot. Returns the number of records restored.
    pub fn restore_from_snapshot(&self, namespace: Namespace) -> Result<usize> {
        let restored = match namespace {
            Namespace::Candidates => restore_into(&self.storage, self.candidates()),
            Namespace::Jobs => restore_into(&self.storage, self.jobs()),
            Namespace::Interviews => restore_into(&self.storage, self.interviews()),
        };
        restored.ok_or_else(|| {
            HireError::Store(format!("No restorable snapshot for {}", namespace))
        })
    }

    pub fn status(&self) -> StorageStatus {
        StorageStatus {
            active_tier: self.storage.kv().active_tier(),
            snapshots: Namespace::ALL
                .into_iter()
                .filter_map(|ns| self.storage.backup().info(ns))
                .collect(),
        }
    }

    pub fn dashboard(&self) -> DashboardSummary {
        dashboard::summary(&self.storage, self.config.dashboard_ttl())
    }

    pub fn theme(&self) -> Theme {
        prefs::load_theme(self.storage.kv())
    }

    pub fn set_theme(&self, theme: Theme) -> bool {
        prefs::save_theme(self.storage.kv(), theme)
    }

    pub fn session(&self) -> Option<AuthSession> {
        prefs::load_session(self.storage.kv())
    }

    pub fn sign_in(&self, session: &AuthSession, remember: bool) -> Result<bool> {
        prefs::save_session(self.storage.kv(), session, remember)
    }

    pub fn sign_out(&self) {
        prefs::clear_session(self.storage.kv());
    }
}

fn to_values<R: Record>(records: Vec<R>) -> Result<Vec<Value>> {
    records
        .iter()
        .map(|r| serde_json::to_value(r).map_err(HireError::from))
        .collect()
}

fn to_value<R: Record>(record: Option<R>) -> Result<Option<Value>> {
    record
        .map(|r| serde_json::to_value(r).map_err(HireError::from))
        .transpose()
}

fn restore_into<R: Record>(storage: &Storage, store: RecordStore<R>) -> Option<usize> {
    let records = storage.backup().restore::<R>(R::NAMESPACE)?;
    let count = records.len();
    store.replace_all(records);
    Some(count)
}
