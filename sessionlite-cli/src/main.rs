// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! SessionLite CLI entry point

use clap::Parser;
use colored::Colorize;

mod cli;
use cli::{Cli, Commands};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // -v/--verbose wins over --log-level; RUST_LOG can still override the default
    let log_level = if cli.verbose {
        log::LevelFilter::Debug
    } else if let Some(level) = cli.log_level {
        level.to_level_filter()
    } else {
        log::LevelFilter::Warn
    };

    env_logger::Builder::from_default_env()
        .filter_level(log_level)
        .init();

    let store = cli::StoreArgs {
        path: cli.path,
        config: cli.config,
        table: cli.table,
    };

    match cli.command {
        Commands::Version => {
            println!("{} {}", "SessionLite".bold().green(), sessionlite::VERSION);
            println!("Database-persisted HTTP session store");
            Ok(())
        }

        Commands::Gc { max_age } => cli::handle_gc(&store, max_age),

        Commands::List { format } => cli::handle_list(&store, format),

        Commands::Show { id, format } => cli::handle_show(&store, &id, format),

        Commands::Delete { id } => cli::handle_delete(&store, &id),
    }
}
