//! # Startup Wiring
//!
//! [`initialize`] resolves where data lives, loads configuration and builds
//! the storage tiers a [`HireApi`] runs on.
//!
//! ## Tiers
//!
//! | Tier | Location | Lifetime |
//! |------|----------|----------|
//! | Durable | data directory | until deleted |
//! | Session | session directory (under the OS temp dir) | until the temp dir is cleaned |
//! | Memory | process memory | this process |
//!
//! A tier whose directory cannot be written is skipped, so a read-only data
//! directory degrades to session storage rather than failing.
//!
//! ## Data Directory Resolution
//!
//! 1. `data_override` (the CLI's `--data`), used as given.
//! 2. `HIREDESK_DATA` environment variable. Tests use this to isolate state.
//! 3. The OS data directory (via the `directories` crate).
//!
//! The session directory is `HIREDESK_SESSION_DATA` when set, otherwise
//! `<temp>/hiredesk-session`.
//!
//! ## Configuration
//!
//! `hiredesk.toml` is read from the data directory by `clapfig`. A missing or
//! broken file falls back to defaults.

use crate::api::{HireApi, HirePaths};
use crate::clock::SystemClock;
use crate::config::HireConfig;
use crate::error::{HireError, Result};
use crate::store::fs_backend::FsKvBackend;
use crate::store::tiered::{Tier, TierKind, TieredStore};
use clapfig::{Clapfig, SearchMode, SearchPath};
use directories::ProjectDirs;
use std::path::PathBuf;
use std::rc::Rc;
use tracing::debug;

pub const DATA_ENV: &str = "HIREDESK_DATA";
pub const SESSION_ENV: &str = "HIREDESK_SESSION_DATA";

pub struct HireContext {
    pub api: HireApi,
    pub config: HireConfig,
}

fn env_path(name: &str) -> Option<PathBuf> {
    std::env::var_os(name)
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
}

pub fn resolve_data_dir(data_override: Option<PathBuf>) -> Result<PathBuf> {
    if let Some(path) = data_override.or_else(|| env_path(DATA_ENV)) {
        return Ok(path);
    }
    ProjectDirs::from("com", "hiredesk", "hiredesk")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .ok_or_else(|| HireError::Store("Could not determine a data directory".to_string()))
}

pub fn resolve_session_dir() -> PathBuf {
    env_path(SESSION_ENV).unwrap_or_else(|| std::env::temp_dir().join("hiredesk-session"))
}

pub fn load_config(data_dir: &std::path::Path) -> HireConfig {
    Clapfig::builder()
        .app_name("hiredesk")
        .file_name("hiredesk.toml")
        .search_paths(vec![SearchPath::Path(data_dir.to_path_buf())])
        .search_mode(SearchMode::Merge)
        .load()
        .unwrap_or_default()
}

pub fn build_tiers(data_dir: PathBuf, session_dir: PathBuf) -> TieredStore {
    TieredStore::new(vec![
        Tier::new(TierKind::Durable, FsKvBackend::new(data_dir)),
        Tier::new(TierKind::Session, FsKvBackend::new(session_dir)),
    ])
}

/// Build the API over the file-backed tiers. Does not seed; call
/// [`HireApi::startup`] before the first read.
pub fn initialize(data_override: Option<PathBuf>) -> Result<HireContext> {
    let data_dir = resolve_data_dir(data_override)?;
    let session_dir = resolve_session_dir();
    debug!(data = %data_dir.display(), session = %session_dir.display(), "resolved storage paths");

    let config = load_config(&data_dir);
    let kv = build_tiers(data_dir.clone(), session_dir.clone());
    let paths = HirePaths {
        data: Some(data_dir),
        session: Some(session_dir),
    };
    let api = HireApi::new(kv, config.clone(), Rc::new(SystemClock), paths);

    Ok(HireContext { api, config })
}
