//! # hiredesk CLI Architecture
//!
//! hiredesk ships with a command-line client, but the binary is intentionally thin:
//! the CLI lives in `src/cli/`, while this file only invokes `cli::run()` and
//! handles process termination.
//!
//! ## Workspace Structure
//!
//! - `crates/hiredeskapp/`: Core library, UI-agnostic storage and domain logic
//! - `crates/hiredesk/`: This CLI tool, depends on the `hiredeskapp` library
//!
//! ## Layering
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI Layer (crates/hiredesk/src/cli/)                       │
//! │  - clap argument parsing (setup.rs)                         │
//! │  - Context wiring + dispatch (commands.rs)                  │
//! │  - Terminal rendering with console styles (render.rs)       │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API Layer (crates/hiredeskapp/src/api.rs)                  │
//! │  - Maps namespace names to typed record stores              │
//! │  - Returns records, JSON values and reports                 │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Storage Layer (crates/hiredeskapp/src/store/)              │
//! │  - Validation, snapshots, tiered key-value storage          │
//! │  - No knowledge of stdout/stderr or process exits           │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Logging
//!
//! The library reports through `tracing`. This binary installs a
//! `tracing-subscriber` formatter on stderr, filtered by `HIREDESK_LOG`
//! (default `warn`, `-v` raises it to `debug`).
//!
//! ## Testing Approach
//!
//! - **Library**: unit tests per module plus filesystem integration tests.
//! - **CLI layer**: clap parsing and rendering unit tests, and end-to-end runs
//!   of the binary in `tests/` against a temporary data directory.

mod cli;

fn main() {
    if let Err(e) = cli::run() {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
