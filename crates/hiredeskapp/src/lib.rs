//! # hiredeskapp
//!
//! The storage core of a small applicant tracking system: candidates, job
//! postings and interviews kept in a local key-value store.
//!
//! ## Architecture
//!
//! ```text
//! UI (CLI, dashboard) ──► api::HireApi ──► store::RecordStore<R>
//!                                            ├─ validate::SoftValidator
//!                                            ├─ store::backup::BackupManager
//!                                            └─ store::tiered::TieredStore ──► KvBackend
//! ```
//!
//! - [`api`]: the facade every UI talks to. Start here.
//! - [`store`]: key layout, tiered key-value storage, collections, snapshots.
//! - [`model`]: the three record types and their wire format.
//! - [`validate`]: string sanitizing and length limits applied before writes.
//! - [`seed`]: bundled sample data for first runs.
//! - [`dashboard`], [`prefs`]: derived aggregates and per-user settings.
//! - [`init`]: builds an API over the filesystem with loaded configuration.
//!
//! The library is single-threaded (`Rc`/`RefCell`) and does no I/O of its own
//! beyond the storage backends. It never prints; diagnostics go through
//! `tracing`.

pub mod api;
pub mod clock;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod events;
pub mod init;
pub mod model;
pub mod prefs;
pub mod seed;
pub mod store;
#[cfg(any(test, feature = "test_utils"))]
pub mod test_utils;
pub mod validate;
