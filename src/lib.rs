pub mod api;
pub mod cache;
pub mod catalog;
pub mod cli;
pub mod config;
pub mod domain;
pub mod errors;
pub mod http;
pub mod pagination;
pub mod rate_limiter;
pub mod report;
pub mod repository;
pub mod scoring;
pub mod services;
pub mod tournament;

use anyhow::Result;
use clap::{CommandFactory, Parser};
use clap_complete::Shell;
use cli::Cli;
use log::info;
use std::path::{Path, PathBuf};

use crate::cache::Cache;
use crate::cli::Command;
use crate::config::settings::AppConfig;
use crate::report::{CsvSheetWriter, SheetWriter, TerminalPreview};
use crate::repository::{ScoreRepository, SmxRepository};
use crate::services::event::{EventDefinition, EventService};

pub fn interpret() -> Command {
    let cli = Cli::parse();
    cli.command
}

pub fn handle_event(folder: &Path, output: Option<&Path>) -> Result<()> {
    let event = EventDefinition::load(folder)?;
    run_event(event, output)
}

pub fn handle_gauntlet(config: &Path, entrants: &Path, output: Option<&Path>) -> Result<()> {
    let event = EventDefinition::single_gauntlet(config, entrants)?;
    run_event(event, output)
}

pub fn handle_ladder(config: &Path, entrants: &Path, output: Option<&Path>) -> Result<()> {
    let event = EventDefinition::single_ladder(config, entrants)?;
    run_event(event, output)
}

pub fn handle_catalog(find: Option<&str>, rebuild: bool) -> Result<()> {
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(async {
        let config = AppConfig::new();
        if rebuild {
            Cache::new(&config.cache.data_dir)?.clear()?;
        }
        let repo = SmxRepository::connect(&config).await?;
        let catalog = repo.catalog();
        info!(
            "Catalog cached in {}: {} songs, {} charts",
            config.cache.data_dir.display(),
            catalog.songs().len(),
            catalog.charts().len()
        );

        if let Some(title) = find {
            let song = catalog.find_song(title)?;
            println!("{} (id {})", song.title, song.id);
            for chart in catalog.charts().iter().filter(|chart| chart.song_id == song.id) {
                println!("  {:>2}  {:<10} id {}", chart.difficulty, chart.difficulty_name, chart.id);
            }
        }
        Ok(())
    })
}

pub fn handle_completions(shell: Shell) -> Result<()> {
    let mut command = Cli::command();
    let name = command.get_name().to_string();
    clap_complete::generate(shell, &mut command, name, &mut std::io::stdout());
    Ok(())
}

fn run_event(event: EventDefinition, output: Option<&Path>) -> Result<()> {
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(async {
        let config = AppConfig::new();
        let mut service = EventService::new(config, build_writers(output)?);
        service.run(event).await?;
        Ok(())
    })
}

fn build_writers(output: Option<&Path>) -> Result<Vec<Box<dyn SheetWriter>>> {
    let mut writers: Vec<Box<dyn SheetWriter>> = vec![Box::new(TerminalPreview)];
    if let Some(dir) = output.map(PathBuf::from) {
        writers.push(Box::new(CsvSheetWriter::new(dir)?));
    }
    Ok(writers)
}
