//! # CLI Behavior
//!
//! This is **one possible UI client** for hiredesk, not the application itself.
//! The CLI is the only place that knows about terminal I/O, exit codes, and output formatting.
//!
//! For the overall architecture, see the crate-level documentation in [`crate`].
//!
//! ## Startup
//!
//! Every invocation seeds empty collections before running its command, the
//! way the dashboard seeds before its first view renders. After the command,
//! the snapshot timer is polled once and stopped.
//!
//! ## Output
//!
//! - Default: aligned, colored text (`render`).
//! - `--json`: the API's JSON values, pretty-printed, for scripting.
//!
//! ## Module Structure
//!
//! - `commands`: Per-command handlers that call the API and print output
//! - `render`: Output formatting (lists, records, status)
//! - `setup`: Argument parsing via clap, help text
//! - `styles`: Terminal styling constants

mod commands;
mod render;
pub mod setup;
mod styles;

pub use commands::run;
