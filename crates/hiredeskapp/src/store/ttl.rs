use super::tiered::TieredStore;
use crate::clock::Clock;
use chrono::Duration;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::rc::Rc;
use tracing::{debug, warn};

/// A stored value together with its write time and optional expiry,
/// both in milliseconds since the Unix epoch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub value: T,
    pub timestamp: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiry: Option<i64>,
}

impl<T> Envelope<T> {
    pub fn is_expired(&self, now_ms: i64) -> bool {
        matches!(self.expiry, Some(expiry) if now_ms > expiry)
    }
}

/// Cache of short-lived values. Expiry is fixed at write time; reads never
/// extend it. Expired or unreadable entries are removed on read.
pub struct TtlCache {
    kv: Rc<TieredStore>,
    clock: Rc<dyn Clock>,
}

impl TtlCache {
    pub fn new(kv: Rc<TieredStore>, clock: Rc<dyn Clock>) -> Self {
        Self { kv, clock }
    }

    pub fn set<T: Serialize>(&self, key: &str, value: &T, ttl: Option<Duration>) -> bool {
        let now = self.clock.now().timestamp_millis();
        let envelope = Envelope {
            value,
            timestamp: now,
            expiry: ttl.map(|ttl| now.saturating_add(ttl.num_milliseconds())),
        };
        match serde_json::to_string(&envelope) {
            Ok(raw) => self.kv.set(key, &raw),
            Err(e) => {
                warn!(key, error = %e, "could not encode cache entry");
                false
            }
        }
    }

    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = self.kv.get(key)?;
        let envelope: Envelope<T> = match serde_json::from_str(&raw) {
            Ok(envelope) => envelope,
            Err(e) => {
                debug!(key, error = %e, "dropping undecodable cache entry");
                self.kv.remove(key);
                return None;
            }
        };
        if envelope.is_expired(self.clock.now().timestamp_millis()) {
            debug!(key, "cache entry expired");
            self.kv.remove(key);
            return None;
        }
        Some(envelope.value)
    }

    pub fn get_or<T: DeserializeOwned>(&self, key: &str, default: T) -> T {
        self.get(key).unwrap_or(default)
    }

    pub fn invalidate(&self, key: &str) {
        self.kv.remove(key);
    }
}
