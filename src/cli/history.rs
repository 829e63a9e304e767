//! `history` subcommands

use super::commands::{pack_with_spinner, write_output};
use super::{print_header, print_warning};
use crate::config::WizardConfig;
use crate::history::{HistoryStore, JsonFileBackend};
use crate::models::HistoryRecord;
use crate::packager::{archive_file_name, load_file_set, PackRequest};
use crate::parser::manifest::extension_name;
use crate::utils::helpers::sanitize_name;
use crate::workbench::UNTITLED_EXTENSION;
use anyhow::{Context, Result};
use colored::*;
use dialoguer::{theme::ColorfulTheme, Confirm};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

fn open_store(config: &WizardConfig) -> HistoryStore<JsonFileBackend> {
    let path = config.history_path();
    tracing::debug!("history at {:?}", path);
    HistoryStore::load(JsonFileBackend::new(path))
}

pub fn list(config: &WizardConfig) -> Result<()> {
    let store = open_store(config);
    if store.is_empty() {
        println!("{}", "History is empty.".dimmed());
        return Ok(());
    }

    print_header(&format!("History ({} entries)", store.len()));
    for record in store.records() {
        println!(
            "{}  {}  {} ({} files)",
            record.id.dimmed(),
            record.created_at.format("%Y-%m-%d %H:%M"),
            record.name.bold(),
            record.files.len()
        );
    }
    Ok(())
}

pub fn show(config: &WizardConfig, id: &str) -> Result<()> {
    let store = open_store(config);
    let record = find(&store, id)?;

    print_header(&record.name);
    println!("Id: {}", record.id);
    println!("Created: {}", record.created_at.to_rfc3339());
    if let Some(summary) = &record.summary {
        println!();
        println!("{}", summary);
    }
    println!();
    println!("📁 Files:");
    for entry in &record.files {
        println!("  - {} ({} chars)", entry.path, entry.char_len());
    }
    Ok(())
}

/// Record a directory or archive in history
pub fn add(config: &WizardConfig, input: &Path) -> Result<()> {
    let files =
        load_file_set(input).with_context(|| format!("Failed to load {}", input.display()))?;
    let record = HistoryRecord::new(extension_name(&files, UNTITLED_EXTENSION), files, None);
    let (id, name) = (record.id.clone(), record.name.clone());

    let mut store = open_store(config);
    store.append(record).context("Failed to save history")?;

    println!("{} {} ({})", "✅ Added".green().bold(), name, id.dimmed());
    Ok(())
}

pub fn delete(config: &WizardConfig, ids: &[String]) -> Result<()> {
    let mut store = open_store(config);
    for id in ids {
        if store.remove(id).context("Failed to save history")? {
            println!("{} {}", "🗑️  Deleted".green(), id);
        } else {
            print_warning(&format!("No history entry with id {}", id));
        }
    }
    Ok(())
}

pub fn clear(config: &WizardConfig, yes: bool) -> Result<()> {
    let mut store = open_store(config);
    if store.is_empty() {
        println!("{}", "History is already empty.".dimmed());
        return Ok(());
    }

    let confirmed = yes
        || Confirm::with_theme(&ColorfulTheme::default())
            .with_prompt(format!("Delete all {} history entries?", store.len()))
            .default(false)
            .interact()?;
    if !confirmed {
        println!("Cancelled.");
        return Ok(());
    }

    let ids: HashSet<String> = store.records().iter().map(|r| r.id.clone()).collect();
    let removed = store.remove_many(&ids).context("Failed to save history")?;
    println!("{}", format!("🗑️  Deleted {} entries", removed).green());
    Ok(())
}

/// Package a history entry as it was saved
pub async fn export(config: &WizardConfig, id: &str, output: Option<&Path>) -> Result<()> {
    let store = open_store(config);
    let record = find(&store, id)?;

    let output = match output {
        Some(path) => path.to_path_buf(),
        None => {
            let name = sanitize_name(&record.name);
            let name = if name.is_empty() { config.archive_name.clone() } else { name };
            PathBuf::from(archive_file_name(&name))
        }
    };

    let archive = pack_with_spinner(config, PackRequest::new(&record.files)).await?;
    write_output(&output, &archive.bytes)?;

    println!("{} {}", "✅ Exported to".green().bold(), output.display());
    Ok(())
}

fn find<'a>(store: &'a HistoryStore<JsonFileBackend>, id: &str) -> Result<&'a HistoryRecord> {
    store
        .get(id)
        .ok_or_else(|| crate::error::WizardError::HistoryNotFound(id.to_string()).into())
}
