//! Named console styles. Output code refers to these by meaning, never to
//! raw colors, so the palette can change in one place.

use console::Style;
use once_cell::sync::Lazy;

/// Record ids.
pub static ID: Lazy<Style> = Lazy::new(|| Style::new().yellow());

/// The main label of a row: candidate name, job title.
pub static TITLE: Lazy<Style> = Lazy::new(|| Style::new().bold());

/// Status labels.
pub static STATUS: Lazy<Style> = Lazy::new(|| Style::new().cyan());

/// Secondary text: field names, empty-state hints.
pub static MUTED: Lazy<Style> = Lazy::new(|| Style::new().dim());

pub static SUCCESS: Lazy<Style> = Lazy::new(|| Style::new().green());

pub static ERROR: Lazy<Style> = Lazy::new(|| Style::new().red().bold());
