pub mod aggregate;
pub mod cli;
pub mod config;
pub mod data;
pub mod derive;
pub mod error;
pub mod history;
pub mod io_utils;
pub mod leaderboard;
pub mod mapping;
pub mod pipeline;
pub mod report;
pub mod schema;
pub mod table;
pub mod uploads;

use std::{env, path::Path, sync::OnceLock};

use anyhow::{Context, Result};
use clap::Parser;
use log::{LevelFilter, info};

use crate::cli::{Cli, Commands, ConfigCommands, HistoryCommands};
use crate::config::StorageConfig;

static LOGGER: OnceLock<()> = OnceLock::new();

fn init_logging() {
    LOGGER.get_or_init(|| {
        let mut builder = env_logger::Builder::from_env(env_logger::Env::default());
        if env::var("RUST_LOG").is_err() {
            builder.filter_module("salescope", LevelFilter::Info);
        }
        let _ = builder.format_timestamp_millis().try_init();
    });
}

pub fn run() -> Result<()> {
    init_logging();
    let cli = Cli::parse();
    let config_path = cli.base_dir.join(config::CONFIG_FILE_NAME);
    let history_path = cli.base_dir.join(history::HISTORY_FILE_NAME);
    let storage = StorageConfig::load(&config_path, &cli.base_dir);

    match cli.command {
        Commands::Probe(args) => handle_probe(&args),
        Commands::Upload(args) => handle_upload(&args, &storage),
        Commands::Report(args) => pipeline::execute(&args, &storage, &history_path),
        Commands::History(args) => handle_history(&args, &history_path),
        Commands::Reports => handle_reports(&storage),
        Commands::Config(args) => handle_config(&args, &storage, &config_path, &cli.base_dir),
    }
}

fn handle_probe(args: &cli::ProbeArgs) -> Result<()> {
    info!(
        "Probing '{}' with delimiter '{}'",
        args.input.display(),
        io_utils::printable_delimiter(io_utils::resolve_input_delimiter(
            &args.input,
            args.delimiter
        ))
    );
    let probe = schema::probe(&args.input, args.delimiter)?;
    println!("Columns: {}", probe.columns.join(", "));
    print_suggestion("product", &probe.suggestions.product);
    print_suggestion("total", &probe.suggestions.total);
    print_suggestion("quantity", &probe.suggestions.quantity);
    print_suggestion("price", &probe.suggestions.price);
    print_suggestion("date", &probe.suggestions.date);
    print_suggestion("year", &probe.suggestions.year);
    print_suggestion("month", &probe.suggestions.month);
    if let Some(out) = &args.out {
        probe
            .save(out)
            .with_context(|| format!("Writing probe to {out:?}"))?;
        info!("Probe for {} column(s) written to {out:?}", probe.columns.len());
    }
    Ok(())
}

fn print_suggestion(role: &str, column: &Option<String>) {
    match column {
        Some(name) => println!("  {role:<8} -> {name}"),
        None => println!("  {role:<8} -> (none)"),
    }
}

fn handle_upload(args: &cli::UploadArgs, storage: &StorageConfig) -> Result<()> {
    storage.ensure_directories()?;
    let token = uploads::store(&args.input, &storage.upload_folder)?;
    println!("{token}");
    Ok(())
}

fn handle_history(args: &cli::HistoryArgs, history_path: &Path) -> Result<()> {
    match &args.command {
        HistoryCommands::List => {
            let entries = history::load(history_path);
            if entries.is_empty() {
                println!("No history recorded yet");
                return Ok(());
            }
            for entry in entries {
                println!(
                    "{}  {}  {}  revenue {}  best {}  {}",
                    entry.id,
                    entry.timestamp,
                    entry.time_mode,
                    data::format_number(entry.revenue),
                    entry.product,
                    entry.filename
                );
            }
            Ok(())
        }
        HistoryCommands::Show { id } => {
            let entry = history::find(history_path, id)
                .with_context(|| format!("No history entry with id '{id}'"))?;
            let json = serde_json::to_string_pretty(&entry).context("Rendering history entry")?;
            println!("{json}");
            Ok(())
        }
    }
}

fn handle_reports(storage: &StorageConfig) -> Result<()> {
    storage.ensure_directories()?;
    let reports = report::list_reports(&storage.output_folder)?;
    if reports.is_empty() {
        println!("No reports generated yet");
        return Ok(());
    }
    for file in reports {
        println!(
            "{:<40} {:<6} {:>10.2} KB  {}",
            file.name,
            file.kind.as_str(),
            file.size_kb,
            file.updated_at.format("%Y-%m-%d %H:%M:%S")
        );
    }
    Ok(())
}

fn handle_config(
    args: &cli::ConfigArgs,
    storage: &StorageConfig,
    config_path: &Path,
    base_dir: &Path,
) -> Result<()> {
    match &args.command {
        ConfigCommands::Show => {
            println!("upload_folder: {}", storage.upload_folder.display());
            println!("output_folder: {}", storage.output_folder.display());
            Ok(())
        }
        ConfigCommands::Set {
            upload_folder,
            output_folder,
        } => {
            let updated = storage.with_updates(
                upload_folder.as_deref(),
                output_folder.as_deref(),
                base_dir,
            );
            updated.apply_and_save(config_path)?;
            println!("Storage paths updated successfully");
            println!("upload_folder: {}", updated.upload_folder.display());
            println!("output_folder: {}", updated.output_folder.display());
            Ok(())
        }
    }
}
