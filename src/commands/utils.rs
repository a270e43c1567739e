//! Shared utilities for commands

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDateTime};
use comfy_table::{presets::UTF8_FULL_CONDENSED, Cell, ContentArrangement, Table};
use owo_colors::OwoColorize;
use serde::de::DeserializeOwned;
use std::fs;
use std::path::Path;

use stockup::notify::{Notification, NotificationKind};

/// Table with the standard preset and the given header
pub fn new_table(header: &[&str]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header.iter().map(Cell::new).collect::<Vec<_>>());
    table
}

/// Read and parse a JSON file
pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content =
        fs::read_to_string(path).with_context(|| format!("Failed to read: {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("Failed to parse: {}", path.display()))
}

/// Write text to a file, or return it for stdout when no path is given
pub fn write_or_return(content: String, output: Option<&Path>) -> Result<String> {
    match output {
        Some(path) => {
            fs::write(path, &content)
                .with_context(|| format!("Failed to write: {}", path.display()))?;
            Ok(format!("Written to {}", path.display()))
        }
        None => Ok(content),
    }
}

/// Render a backend timestamp as `YYYY-MM-DD HH:MM`
///
/// Accepts RFC 3339 and zone-less ISO date-times; anything else is shown as is.
pub fn format_timestamp(raw: &str) -> String {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return dt.format("%Y-%m-%d %H:%M").to_string();
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|dt| dt.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| raw.to_string())
}

/// Colored one-line rendering of a notification
pub fn render_notification(notification: &Notification) -> String {
    match notification.kind {
        NotificationKind::Success => format!("{} {}", "✓".green(), notification.message),
        NotificationKind::Error => format!("{} {}", "✗".red(), notification.message.red()),
        NotificationKind::Info => format!("{} {}", "i".blue(), notification.message),
    }
}
