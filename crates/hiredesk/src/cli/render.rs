//! Plain-text rendering of API results.
//!
//! Every function returns a `String`; printing happens in `commands.rs`.
//! Colors come from [`super::styles`] and are dropped automatically by
//! `console` when stdout is not a terminal.

use super::styles;
use chrono::{DateTime, Utc};
use hiredeskapp::api::StorageStatus;
use hiredeskapp::dashboard::DashboardSummary;
use hiredeskapp::model::Namespace;
use hiredeskapp::seed::SeedReport;
use serde_json::Value;
use std::fmt::Write;

fn text<'a>(record: &'a Value, field: &str) -> &'a str {
    record.get(field).and_then(Value::as_str).unwrap_or("")
}

/// One line per record, columns chosen per namespace.
pub fn render_list(namespace: Namespace, records: &[Value]) -> String {
    if records.is_empty() {
        return format!("{}\n", styles::MUTED.apply_to(format!("No {}.", namespace)));
    }
    let mut out = String::new();
    for record in records {
        let id = styles::ID.apply_to(format!("{:>14}", text(record, "id")));
        let line = match namespace {
            Namespace::Candidates => format!(
                "{}  {}  {}  {}",
                id,
                styles::TITLE.apply_to(text(record, "name")),
                text(record, "position"),
                styles::STATUS.apply_to(text(record, "status")),
            ),
            Namespace::Jobs => format!(
                "{}  {}  {}  {}",
                id,
                styles::TITLE.apply_to(text(record, "title")),
                text(record, "department"),
                styles::STATUS.apply_to(text(record, "status")),
            ),
            Namespace::Interviews => format!(
                "{}  {} {}  {}  {}",
                id,
                text(record, "date"),
                text(record, "time"),
                styles::TITLE.apply_to(text(record, "candidateName")),
                styles::STATUS.apply_to(text(record, "status")),
            ),
        };
        let _ = writeln!(out, "{}", line);
    }
    out
}

/// Every field of a record, nested values as compact JSON.
pub fn render_record(record: &Value) -> String {
    let mut out = String::new();
    if let Value::Object(map) = record {
        let width = map.keys().map(|k| k.chars().count()).max().unwrap_or(0);
        for (key, value) in map {
            let shown = match value {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            let _ = writeln!(
                out,
                "{}  {}",
                styles::MUTED.apply_to(format!("{:<width$}", key, width = width)),
                shown
            );
        }
    }
    out
}

pub fn render_seed(report: &SeedReport) -> String {
    if report.total() == 0 {
        return "Collections already populated, nothing seeded.\n".to_string();
    }
    let mut out = String::new();
    for ns in Namespace::ALL {
        let count = report.get(ns);
        if count > 0 {
            let _ = writeln!(out, "Seeded {} {}", count, ns);
        }
    }
    out
}

fn age(captured_at: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let minutes = (now - captured_at).num_minutes();
    match minutes {
        m if m < 1 => "just now".to_string(),
        m if m < 60 => format!("{}m ago", m),
        m if m < 60 * 24 => format!("{}h ago", m / 60),
        m => format!("{}d ago", m / (60 * 24)),
    }
}

pub fn render_status(status: &StorageStatus, now: DateTime<Utc>) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Active tier: {}", styles::TITLE.apply_to(status.active_tier));
    if status.snapshots.is_empty() {
        let _ = writeln!(out, "{}", styles::MUTED.apply_to("No snapshots yet."));
        return out;
    }
    for snap in &status.snapshots {
        let state = if snap.stale {
            styles::ERROR.apply_to("stale").to_string()
        } else {
            styles::STATUS.apply_to("fresh").to_string()
        };
        let _ = writeln!(
            out,
            "{:<12} {:>4} records  {}  {}",
            snap.namespace.to_string(),
            snap.records,
            age(snap.captured_at, now),
            state
        );
    }
    out
}

pub fn render_summary(summary: &DashboardSummary) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{} candidates, {} jobs ({} open), {} interviews ({} upcoming)",
        summary.total_candidates,
        summary.total_jobs,
        summary.open_jobs,
        summary.total_interviews,
        summary.upcoming_interviews
    );
    match summary.average_score {
        Some(avg) => {
            let _ = writeln!(out, "Average score: {:.1}", avg);
        }
        None => {
            let _ = writeln!(out, "Average score: {}", styles::MUTED.apply_to("n/a"));
        }
    }
    for (status, count) in summary.candidates_by_status.iter().filter(|(_, c)| **c > 0) {
        let _ = writeln!(out, "  {:<8} {}", status, count);
    }
    out
}

/// `key = value` lines for a flat JSON object.
pub fn render_settings(settings: &Value) -> String {
    let mut out = String::new();
    if let Value::Object(map) = settings {
        for (key, value) in map {
            let _ = writeln!(out, "{} = {}", key, value);
        }
    }
    out
}
