use super::keys;
use super::tiered::TieredStore;
use crate::clock::Clock;
use crate::model::Namespace;
use chrono::{DateTime, Duration, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::rc::Rc;
use tracing::{debug, warn};

pub const DEFAULT_RETENTION_DAYS: i64 = 7;
pub const DEFAULT_SNAPSHOT_INTERVAL_SECS: i64 = 300;

#[derive(Debug, Serialize, Deserialize)]
struct Snapshot<D> {
    timestamp: DateTime<Utc>,
    data: D,
    namespace: Namespace,
}

/// Summary of the snapshot currently held for a namespace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotInfo {
    pub namespace: Namespace,
    pub captured_at: DateTime<Utc>,
    pub records: usize,
    pub stale: bool,
}

/// Single-slot snapshots of whole collections under `backup_wf:<namespace>`.
///
/// Each snapshot overwrites the previous one. Snapshots older than the
/// retention window are ignored on restore but left in place.
///
/// Both directions are best-effort: failures are logged and reported as
/// `false`/`None`, never as errors, so a broken backup cannot block the
/// primary read and write paths.
pub struct BackupManager {
    kv: Rc<TieredStore>,
    clock: Rc<dyn Clock>,
    retention: Duration,
}

impl BackupManager {
    pub fn new(kv: Rc<TieredStore>, clock: Rc<dyn Clock>, retention: Duration) -> Self {
        Self {
            kv,
            clock,
            retention,
        }
    }

    pub fn retention(&self) -> Duration {
        self.retention
    }

    pub fn snapshot<R: Serialize>(&self, namespace: Namespace, records: &[R]) -> bool {
        let snapshot = Snapshot {
            timestamp: self.clock.now(),
            data: records,
            namespace,
        };
        let raw = match serde_json::to_string(&snapshot) {
            Ok(raw) => raw,
            Err(e) => {
                warn!(%namespace, error = %e, "could not encode snapshot");
                return false;
            }
        };
        let written = self.kv.set(&keys::backup(namespace), &raw);
        if written {
            debug!(%namespace, records = records.len(), "snapshot written");
        } else {
            warn!(%namespace, "snapshot write failed");
        }
        written
    }

    fn load<T: DeserializeOwned>(&self, namespace: Namespace) -> Option<Snapshot<Vec<T>>> {
        let raw = self.kv.get(&keys::backup(namespace))?;
        match serde_json::from_str(&raw) {
            Ok(snapshot) => Some(snapshot),
            Err(e) => {
                warn!(%namespace, error = %e, "snapshot is unreadable");
                None
            }
        }
    }

    fn is_stale(&self, captured_at: DateTime<Utc>) -> bool {
        self.clock.now() - captured_at > self.retention
    }

    /// The snapshot's records, unless it is missing, unreadable or stale.
    pub fn restore<R: DeserializeOwned>(&self, namespace: Namespace) -> Option<Vec<R>> {
        let snapshot = self.load::<R>(namespace)?;
        if self.is_stale(snapshot.timestamp) {
            warn!(
                %namespace,
                captured_at = %snapshot.timestamp,
                "snapshot is past retention, ignoring"
            );
            return None;
        }
        Some(snapshot.data)
    }

    pub fn info(&self, namespace: Namespace) -> Option<SnapshotInfo> {
        let snapshot = self.load::<Value>(namespace)?;
        Some(SnapshotInfo {
            namespace,
            captured_at: snapshot.timestamp,
            records: snapshot.data.len(),
            stale: self.is_stale(snapshot.timestamp),
        })
    }
}

/// Interval timer for periodic snapshots, polled from the host's loop.
///
/// `poll` reports at most one due run per call and schedules the next run one
/// interval after the poll, so a host that was asleep does not replay missed
/// runs.
#[derive(Debug, Clone)]
pub struct SnapshotTimer {
    interval: Duration,
    next_due: Option<DateTime<Utc>>,
}

impl SnapshotTimer {
    pub fn new(interval: Duration, now: DateTime<Utc>) -> Self {
        Self {
            interval,
            next_due: Some(due_after(now, interval)),
        }
    }

    pub fn poll(&mut self, now: DateTime<Utc>) -> bool {
        match self.next_due {
            Some(due) if now >= due => {
                self.next_due = Some(due_after(now, self.interval));
                true
            }
            _ => false,
        }
    }

    pub fn next_due(&self) -> Option<DateTime<Utc>> {
        self.next_due
    }

    pub fn cancel(&mut self) {
        self.next_due = None;
    }

    pub fn is_active(&self) -> bool {
        self.next_due.is_some()
    }
}

fn due_after(now: DateTime<Utc>, interval: Duration) -> DateTime<Utc> {
    now.checked_add_signed(interval)
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}
