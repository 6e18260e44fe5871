use anyhow::{Context, Result};
use clap::Parser;
use cliptui::app::AppState;
use cliptui::cli::{Cli, Commands};
use cliptui::clipboard::SystemClipboard;
use cliptui::engine::ClipboardEngine;
use cliptui::monitor::spawn_monitor;
use cliptui::ui::{self, theme::Theme};
use cliptui::utils::paths::{ensure_directories_exist, get_log_path, resolve_data_dir};
use cliptui::{history::CategoryFilter, logging};
use dialoguer::Confirm;
use std::fs;
use std::path::Path;
use std::sync::mpsc;
use std::time::Duration;
use tracing::info;

fn main() -> Result<()> {
    let cli = Cli::parse();
    let data_dir = resolve_data_dir(cli.data_dir)?;
    ensure_directories_exist(&data_dir)?;

    match cli.command {
        Some(command) => {
            logging::init_stderr();
            let mut engine = ClipboardEngine::open(&data_dir);
            match command {
                Commands::Show { filter } => handle_show(&mut engine, filter),
                Commands::Export { path } => handle_export(&engine, &path),
                Commands::Import { path } => handle_import(&mut engine, &path),
                Commands::Clear { yes } => handle_clear(&mut engine, yes),
            }
        }
        None => run_interactive(&data_dir),
    }
}

fn run_interactive(data_dir: &Path) -> Result<()> {
    logging::init_file(&get_log_path(data_dir))?;
    info!(data_dir = %data_dir.display(), "Starting cliptui");

    let engine = ClipboardEngine::open(data_dir);
    let interval = Duration::from_millis(engine.config().poll_interval_ms);
    let theme = Theme::from_config(engine.config());
    let engine = engine.shared();

    let (refresh_tx, refresh_rx) = mpsc::channel();
    let monitor = spawn_monitor(engine.clone(), SystemClipboard::new, interval, Some(refresh_tx))
        .context("Failed to start clipboard monitor")?;

    let state = AppState::new(engine, Box::new(SystemClipboard::new()), theme);
    let result = ui::run_tui(state, refresh_rx);

    monitor.stop();
    info!("Exiting cliptui");
    result
}

fn handle_show(engine: &mut ClipboardEngine, filter: Option<String>) -> Result<()> {
    if let Some(filter) = filter {
        engine.set_filter(filter);
    }

    let show_timestamps = engine.config().show_timestamps;
    let displayed = engine.displayed();
    if displayed.is_empty() {
        println!("No clipboard history!");
        return Ok(());
    }

    let category_filter = engine.config().filter_type;
    if category_filter == CategoryFilter::All {
        println!("\n📋 Clipboard History ({} items)\n", displayed.len());
    } else {
        println!("\n📋 Clipboard History - {} ({} items)\n", category_filter, displayed.len());
    }

    for (idx, (_, item)) in displayed.iter().enumerate() {
        println!("{}. {}", idx + 1, item.summary(show_timestamps));
    }

    println!();

    Ok(())
}

fn handle_export(engine: &ClipboardEngine, path: &Path) -> Result<()> {
    let data = engine.export_history()?;
    fs::write(path, data)
        .with_context(|| format!("Failed to write export file: {}", path.display()))?;

    println!("✓ Exported {} items to {}", engine.store().len(), path.display());

    Ok(())
}

fn handle_import(engine: &mut ClipboardEngine, path: &Path) -> Result<()> {
    let data = fs::read_to_string(path)
        .with_context(|| format!("Failed to read import file: {}", path.display()))?;
    engine.import_history(&data)?;

    println!("✓ Imported {} items from {}", engine.store().len(), path.display());

    Ok(())
}

fn handle_clear(engine: &mut ClipboardEngine, yes: bool) -> Result<()> {
    if engine.store().is_empty() {
        println!("History is already empty.");
        return Ok(());
    }

    let confirmed = yes
        || Confirm::new()
            .with_prompt(format!("Delete all {} clipboard items?", engine.store().len()))
            .default(false)
            .interact()?;

    if !confirmed {
        println!("Cancelled.");
        return Ok(());
    }

    engine.clear()?;
    println!("✓ Clipboard history cleared!");

    Ok(())
}
