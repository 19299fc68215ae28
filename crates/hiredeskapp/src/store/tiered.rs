use super::backend::KvBackend;
use super::mem_backend::MemKvBackend;
use serde::Serialize;
use std::cell::Cell;
use std::collections::BTreeSet;
use std::fmt;
use tracing::{debug, error, warn};

/// Storage tiers, from most to least durable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TierKind {
    /// Survives restarts.
    Durable,
    /// Survives until the session directory is wiped.
    Session,
    /// Lives as long as the process.
    Memory,
}

impl fmt::Display for TierKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TierKind::Durable => "durable",
            TierKind::Session => "session",
            TierKind::Memory => "memory",
        };
        f.write_str(name)
    }
}

pub struct Tier {
    kind: TierKind,
    backend: Box<dyn KvBackend>,
}

impl Tier {
    pub fn new(kind: TierKind, backend: impl KvBackend + 'static) -> Self {
        Self {
            kind,
            backend: Box::new(backend),
        }
    }
}

/// Uniform key-value interface over a durable → session → memory fallback chain.
///
/// On construction each tier is probed and the first writable one becomes
/// active. Writes that fail on the active tier move down one tier at a time
/// until one succeeds; that tier then stays active. Reads look at the active
/// tier first and then at the tiers it was demoted from, newest first, so data
/// written before a demotion stays visible.
///
/// None of the methods return errors: a failed read is a miss and a failed
/// write is reported as `false`.
pub struct TieredStore {
    tiers: Vec<Tier>,
    active: Cell<usize>,
}

impl TieredStore {
    /// Build a store from tiers ordered most durable first. A memory tier is
    /// appended when the list does not end with one.
    pub fn new(mut tiers: Vec<Tier>) -> Self {
        if tiers.last().map(|t| t.kind) != Some(TierKind::Memory) {
            tiers.push(Tier::new(TierKind::Memory, MemKvBackend::new()));
        }

        let active = tiers
            .iter()
            .position(|t| t.backend.is_available())
            .unwrap_or(tiers.len() - 1);

        for skipped in &tiers[..active] {
            warn!(
                tier = %skipped.kind,
                backend = %skipped.backend.describe(),
                "storage tier unavailable, skipping"
            );
        }
        debug!(tier = %tiers[active].kind, "storage tier selected");

        Self {
            tiers,
            active: Cell::new(active),
        }
    }

    /// A store backed only by process memory.
    pub fn in_memory() -> Self {
        Self::new(Vec::new())
    }

    pub fn active_tier(&self) -> TierKind {
        self.tiers[self.active.get()].kind
    }

    /// Tier indexes to consult on reads: active first, then the tiers it was
    /// demoted from.
    fn read_order(&self) -> impl Iterator<Item = usize> {
        let active = self.active.get();
        std::iter::once(active).chain((0..active).rev())
    }

    fn read_tier(&self, idx: usize, key: &str) -> Option<String> {
        let tier = &self.tiers[idx];
        match tier.backend.get(key) {
            Ok(value) => value,
            Err(e) => {
                debug!(tier = %tier.kind, key, error = %e, "read failed");
                None
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.read_order().find_map(|idx| self.read_tier(idx, key))
    }

    pub fn set(&self, key: &str, value: &str) -> bool {
        let start = self.active.get();
        for idx in start..self.tiers.len() {
            let tier = &self.tiers[idx];
            match tier.backend.set(key, value) {
                Ok(()) => {
                    if idx != start {
                        warn!(
                            from = %self.tiers[start].kind,
                            to = %tier.kind,
                            "storage tier demoted after write failure"
                        );
                        self.active.set(idx);
                    }
                    return true;
                }
                Err(e) => {
                    warn!(tier = %tier.kind, key, error = %e, "write failed");
                }
            }
        }
        error!(key, "every storage tier rejected the write");
        false
    }

    /// Remove a key from every tier.
    pub fn remove(&self, key: &str) {
        for tier in &self.tiers {
            if let Err(e) = tier.backend.remove(key) {
                debug!(tier = %tier.kind, key, error = %e, "remove failed");
            }
        }
    }

    pub fn clear(&self) {
        for tier in &self.tiers {
            if let Err(e) = tier.backend.clear() {
                warn!(tier = %tier.kind, error = %e, "clear failed");
            }
        }
    }

    pub fn keys(&self, prefix: &str) -> Vec<String> {
        let mut keys = BTreeSet::new();
        for idx in self.read_order() {
            match self.tiers[idx].backend.keys(prefix) {
                Ok(found) => keys.extend(found),
                Err(e) => debug!(tier = %self.tiers[idx].kind, error = %e, "key listing failed"),
            }
        }
        keys.into_iter().collect()
    }

    fn tier(&self, kind: TierKind) -> Option<&Tier> {
        self.tiers.iter().find(|t| t.kind == kind)
    }

    /// Read from one specific tier, without fallback.
    pub fn get_in(&self, kind: TierKind, key: &str) -> Option<String> {
        let idx = self.tiers.iter().position(|t| t.kind == kind)?;
        self.read_tier(idx, key)
    }

    /// Write to one specific tier, without fallback.
    pub fn set_in(&self, kind: TierKind, key: &str, value: &str) -> bool {
        let Some(tier) = self.tier(kind) else {
            return false;
        };
        match tier.backend.set(key, value) {
            Ok(()) => true,
            Err(e) => {
                warn!(tier = %kind, key, error = %e, "write failed");
                false
            }
        }
    }

    pub fn remove_in(&self, kind: TierKind, key: &str) {
        if let Some(tier) = self.tier(kind) {
            if let Err(e) = tier.backend.remove(key) {
                debug!(tier = %kind, key, error = %e, "remove failed");
            }
        }
    }
}
