//! # CLI Layer
//!
//! The CLI layer is the **only** place in the codebase that:
//! - Knows about terminal I/O (stdout, stderr, stdin)
//! - Handles argument parsing
//! - Formats output for human consumption
//!
//! ## Responsibilities
//!
//! 1. **Argument Parsing**: Convert shell arguments into typed commands via clap
//! 2. **Context Setup**: Initialize logging, the API and configuration
//! 3. **Dispatch**: Route commands to the API facade
//! 4. **Output Formatting**: Text via `render`, or JSON with `--json`
//! 5. **Error Handling**: Library errors are wrapped with `anyhow` context

use super::render;
use super::setup::{BackupAction, Cli, Commands};
use super::styles;
use anyhow::{bail, Context, Result};
use clap::Parser;
use hiredeskapp::api::HireApi;
use hiredeskapp::init::{initialize, HireContext};
use hiredeskapp::model::Namespace;
use hiredeskapp::seed::SeedReport;
use serde::Serialize;
use serde_json::Value;
use std::io::{IsTerminal, Read};
use std::path::Path;
use tracing::debug;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

const LOG_ENV: &str = "HIREDESK_LOG";

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let ctx = initialize(cli.data.clone()).context("could not set up storage")?;
    let seeded = ctx.api.startup().context("could not load sample data")?;

    let command = cli.command.unwrap_or(Commands::List {
        namespace: Namespace::Candidates,
    });
    debug!(?command, "dispatching");
    let result = dispatch(&ctx, command, &seeded, cli.json);

    ctx.api.tick();
    ctx.api.cleanup();
    result
}

fn init_logging(verbose: bool) {
    let default = if verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::WARN
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(default.into())
                .with_env_var(LOG_ENV)
                .from_env_lossy(),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn dispatch(ctx: &HireContext, command: Commands, seeded: &SeedReport, json: bool) -> Result<()> {
    let api = &ctx.api;
    match command {
        Commands::Seed => {
            if json {
                return print_json(seeded);
            }
            print!("{}", render::render_seed(seeded));
        }
        Commands::List { namespace } => {
            let records = api.list_values(namespace)?;
            if json {
                return print_json(&records);
            }
            print!("{}", render::render_list(namespace, &records));
        }
        Commands::Get { namespace, id } => {
            let record = api.get_value(namespace, &id)?;
            if json {
                return print_json(&record);
            }
            print!("{}", render::render_record(&record));
        }
        Commands::Save { namespace, file } => {
            let input = read_input(file.as_deref())?;
            let value: Value = serde_json::from_str(&input).context("input is not valid JSON")?;
            let saved = api.save_value(namespace, value)?;
            if json {
                return print_json(&saved);
            }
            let id = saved.get("id").and_then(Value::as_str).unwrap_or_default();
            println!(
                "{} {}",
                styles::SUCCESS.apply_to("Saved"),
                styles::ID.apply_to(id)
            );
        }
        Commands::Delete { namespace, id } => {
            api.delete(namespace, &id)?;
            if json {
                return print_json(&serde_json::json!({ "deleted": id }));
            }
            println!("{} {}", styles::SUCCESS.apply_to("Deleted"), styles::ID.apply_to(&id));
        }
        Commands::Backup { action } => backup(api, action, json)?,
        Commands::Stats => {
            let summary = api.dashboard();
            if json {
                return print_json(&summary);
            }
            print!("{}", render::render_summary(&summary));
        }
        Commands::Theme { value } => {
            if let Some(theme) = value {
                if !api.set_theme(theme.into()) {
                    bail!("could not store the theme");
                }
            }
            let theme = api.theme();
            if json {
                return print_json(&theme);
            }
            println!("{}", theme);
        }
        Commands::Config => {
            let settings = serde_json::to_value(&ctx.config)?;
            if json {
                return print_json(&settings);
            }
            print!("{}", render::render_settings(&settings));
        }
    }
    Ok(())
}

fn backup(api: &HireApi, action: BackupAction, json: bool) -> Result<()> {
    match action {
        BackupAction::Now => {
            let written = api.snapshot_all();
            if json {
                return print_json(&written);
            }
            if written.is_empty() {
                println!("{}", styles::MUTED.apply_to("Nothing to snapshot."));
            }
            for ns in written {
                println!("{} {}", styles::SUCCESS.apply_to("Snapshot"), ns);
            }
        }
        BackupAction::Status => {
            let status = api.status();
            if json {
                return print_json(&status);
            }
            let now = chrono::Utc::now();
            print!("{}", render::render_status(&status, now));
        }
        BackupAction::Restore { namespace } => {
            let count = api
                .restore_from_snapshot(namespace)
                .with_context(|| format!("could not restore {}", namespace))?;
            if json {
                return print_json(&serde_json::json!({ "namespace": namespace, "restored": count }));
            }
            println!(
                "{} {} {}",
                styles::SUCCESS.apply_to("Restored"),
                count,
                namespace
            );
        }
    }
    Ok(())
}

/// JSON input from a file, or from stdin when no file (or `-`) is given.
fn read_input(file: Option<&Path>) -> Result<String> {
    match file {
        Some(path) if path != Path::new("-") => std::fs::read_to_string(path)
            .with_context(|| format!("could not read {}", path.display())),
        _ => {
            let mut stdin = std::io::stdin();
            if stdin.is_terminal() {
                bail!("no input: pass a JSON file or pipe JSON on stdin");
            }
            let mut buf = String::new();
            stdin.read_to_string(&mut buf)?;
            Ok(buf)
        }
    }
}
