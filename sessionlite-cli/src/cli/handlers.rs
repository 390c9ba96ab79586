// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! CLI command handlers for SessionLite

use colored::Colorize;
use sessionlite::{SessionConfig, SessionManager};
use std::path::PathBuf;

use super::commands::OutputFormat;
use super::output::SessionFormatter;

/// Options shared by every store command
#[derive(Debug, Clone)]
pub struct StoreArgs {
    pub path: PathBuf,
    pub config: Option<PathBuf>,
    pub table: Option<String>,
}

/// Open the store without the startup sweep; `gc` sweeps explicitly
fn open_manager(args: &StoreArgs) -> Result<SessionManager, Box<dyn std::error::Error>> {
    let mut config = match &args.config {
        Some(file) => {
            let json = std::fs::read_to_string(file)
                .map_err(|e| format!("Failed to read config {:?}: {}", file, e))?;
            SessionConfig::from_json_str(&json)?
        }
        None => SessionConfig::default(),
    };
    if let Some(table) = &args.table {
        config = config.with_table(table.clone());
    }
    config = config.with_gc_probability(0);

    log::debug!("Opening session store at {:?}", args.path);
    let manager = SessionManager::open(&args.path, config)
        .map_err(|e| format!("Failed to open session store at {:?}: {}", args.path, e))?;
    Ok(manager)
}

/// Handle the gc command
pub fn handle_gc(args: &StoreArgs, max_age: Option<u64>) -> Result<(), Box<dyn std::error::Error>> {
    let manager = open_manager(args)?;
    let max_age = max_age.unwrap_or(manager.config().lifetime);

    let removed = manager.store().garbage_collect(max_age)?;
    manager.shutdown()?;

    println!(
        "{}",
        format!(
            "Removed {} session(s) idle longer than {}s",
            removed, max_age
        )
        .green()
    );
    Ok(())
}

/// Handle the list command
pub fn handle_list(args: &StoreArgs, format: OutputFormat) -> Result<(), Box<dyn std::error::Error>> {
    let manager = open_manager(args)?;
    let records = manager.store().list()?;
    let now = manager.store().now();
    print!("{}", SessionFormatter::format_list(&records, now, format));
    Ok(())
}

/// Handle the show command
pub fn handle_show(
    args: &StoreArgs,
    id: &str,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let manager = open_manager(args)?;
    match manager.inspect(id)? {
        Some((record, payload)) => {
            print!("{}", SessionFormatter::format_session(&record, &payload, format));
            Ok(())
        }
        None => {
            println!("{}", format!("Session {} not found", id).yellow());
            Err("Session not found".into())
        }
    }
}

/// Handle the delete command
pub fn handle_delete(args: &StoreArgs, id: &str) -> Result<(), Box<dyn std::error::Error>> {
    let manager = open_manager(args)?;
    let existed = manager.store().find(id)?.is_some();
    manager.destroy(id)?;
    manager.shutdown()?;

    if existed {
        println!("{}", format!("Deleted session {}", id).green());
    } else {
        println!("{}", format!("Session {} not found, nothing deleted", id).yellow());
    }
    Ok(())
}
