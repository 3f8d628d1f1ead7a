//! Bounded JSON log of past aggregation runs.
//!
//! Entries are prepended; anything beyond the cap falls off the tail. The
//! log is owned entirely by this module: the aggregation engine writes
//! through [`record`] and never reads history back.

use std::{fs, path::Path};

use anyhow::{Context, Result};
use chrono::Local;
use log::warn;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::aggregate::{AggregationResult, TimeMode};

pub const HISTORY_FILE_NAME: &str = "chart_history.json";
pub const HISTORY_CAP: usize = 20;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub id: String,
    pub timestamp: String,
    pub labels: Vec<String>,
    pub values: Vec<f64>,
    pub revenue: f64,
    pub product: String,
    pub time_mode: TimeMode,
    #[serde(default)]
    pub filename: String,
}

/// Loads the history list; a missing or unreadable file reads as empty.
pub fn load(path: &Path) -> Vec<HistoryEntry> {
    let Ok(text) = fs::read_to_string(path) else {
        return Vec::new();
    };
    match serde_json::from_str(&text) {
        Ok(entries) => entries,
        Err(err) => {
            warn!("Ignoring malformed history {path:?}: {err}");
            Vec::new()
        }
    }
}

pub fn find(path: &Path, id: &str) -> Option<HistoryEntry> {
    load(path).into_iter().find(|entry| entry.id == id)
}

/// Prepends one entry for `result`, evicting the oldest entries beyond
/// [`HISTORY_CAP`], and returns the new entry's id.
pub fn record(
    path: &Path,
    result: &AggregationResult,
    time_mode: TimeMode,
    filename: &str,
) -> Result<String> {
    let id = short_id();
    let entry = HistoryEntry {
        id: id.clone(),
        timestamp: Local::now().format("%Y-%m-%dT%H:%M:%S%.6f").to_string(),
        labels: result.labels.clone(),
        values: result.values.clone(),
        revenue: result.total_revenue,
        product: result.best_product.clone(),
        time_mode,
        filename: filename.to_string(),
    };

    let mut entries = load(path);
    entries.insert(0, entry);
    entries.truncate(HISTORY_CAP);

    let json = serde_json::to_string_pretty(&entries).context("Serializing history JSON")?;
    fs::write(path, json).with_context(|| format!("Writing history to {path:?}"))?;
    Ok(id)
}

fn short_id() -> String {
    Uuid::new_v4().simple().to_string()[..8].to_string()
}
