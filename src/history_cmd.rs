//! The `tone history` and `tone copy` commands.
//!
//! Thin terminal front-ends over [`HistoryStore`], backed by the SQLite
//! key/value table.

use std::io::{BufRead, IsTerminal, Write};
use std::sync::Arc;

use anyhow::{bail, Context, Result};

use tonecheck_core::history::HistoryStore;
use tonecheck_core::models::SavedEntry;

use crate::analyze::print_analysis;
use crate::clipboard;
use crate::config::Config;
use crate::sqlite_store::SqliteStore;

/// Open the history stored in the configured database.
pub async fn open_history(config: &Config) -> Result<HistoryStore> {
    let store = SqliteStore::open(config).await?;
    Ok(HistoryStore::new(Arc::new(store)))
}

pub async fn run_list(config: &Config, limit: Option<usize>, json: bool) -> Result<()> {
    let history = open_history(config).await?;
    let mut entries = history.get_results().await;
    if let Some(limit) = limit {
        entries.truncate(limit);
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    if entries.is_empty() {
        println!("No saved results.");
        return Ok(());
    }

    println!("{:<34} {:<17} {:<9} TEXT", "ID", "SAVED", "TONE");
    for entry in &entries {
        println!(
            "{:<34} {:<17} {:<9} {}",
            entry.id,
            format_timestamp(entry.timestamp),
            entry.result.tone,
            preview(&entry.text, 48)
        );
    }
    Ok(())
}

pub async fn run_show(config: &Config, id: &str, json: bool) -> Result<()> {
    let history = open_history(config).await?;
    let entry = history
        .get_result(id)
        .await
        .with_context(|| format!("no history entry with id {}", id))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&entry)?);
        return Ok(());
    }

    println!("--- Entry ---");
    println!("id:           {}", entry.id);
    println!("saved:        {}", format_timestamp(entry.timestamp));
    println!();
    println!("--- Text ---");
    println!("{}", entry.text);
    println!();
    println!("--- Analysis ---");
    print_analysis(&entry.result);
    Ok(())
}

pub async fn run_delete(config: &Config, id: &str) -> Result<()> {
    let history = open_history(config).await?;
    history.delete_result(id).await;
    println!("Deleted {} (if it existed).", id);
    Ok(())
}

pub async fn run_clear(config: &Config, yes: bool) -> Result<()> {
    let history = open_history(config).await?;
    let count = history.get_results().await.len();
    if count == 0 {
        println!("History is already empty.");
        return Ok(());
    }

    if !yes && !confirm(&format!("Delete all {} saved results?", count))? {
        println!("Aborted.");
        return Ok(());
    }

    history.clear_results().await;
    println!("Cleared {} saved results.", count);
    Ok(())
}

/// Which part of a saved entry `tone copy` puts on the clipboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum CopyField {
    /// The suggested alternative phrasing.
    Alternative,
    /// The original input text.
    Text,
}

pub async fn run_copy(config: &Config, id: &str, field: CopyField) -> Result<()> {
    let history = open_history(config).await?;
    let entry = history
        .get_result(id)
        .await
        .with_context(|| format!("no history entry with id {}", id))?;

    if clipboard::copy_to_clipboard(copy_payload(&entry, field)) {
        println!("Copied to clipboard.");
        Ok(())
    } else {
        bail!("could not copy to clipboard")
    }
}

fn copy_payload(entry: &SavedEntry, field: CopyField) -> &str {
    match field {
        CopyField::Alternative => &entry.result.alternative_text,
        CopyField::Text => &entry.text,
    }
}

fn confirm(question: &str) -> Result<bool> {
    if !std::io::stdin().is_terminal() {
        bail!("refusing to clear history without --yes in a non-interactive session");
    }
    print!("{} [y/N] ", question);
    std::io::stdout().flush()?;
    let mut answer = String::new();
    std::io::stdin().lock().read_line(&mut answer)?;
    Ok(matches!(answer.trim(), "y" | "Y" | "yes" | "YES"))
}

/// Local date and time of an epoch-millisecond timestamp.
pub fn format_timestamp(ms: i64) -> String {
    chrono::DateTime::from_timestamp_millis(ms)
        .map(|dt| {
            dt.with_timezone(&chrono::Local)
                .format("%Y-%m-%d %H:%M")
                .to_string()
        })
        .unwrap_or_else(|| ms.to_string())
}

/// First line of `text`, cut to `max` characters.
fn preview(text: &str, max: usize) -> String {
    let line = text.lines().next().unwrap_or("");
    if line.chars().count() > max {
        let cut: String = line.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", cut)
    } else if line.len() < text.trim_end().len() {
        format!("{} ...", line)
    } else {
        line.to_string()
    }
}
