use anyhow::{Context, Result};
use log::info;
use std::path::{Path, PathBuf};

use crate::config::{AppConfig, EventManifest, GauntletEntry, GauntletFile, LadderFile, load_config_file};
use crate::report::{Sheet, SheetWriter, eligibility_sheet};
use crate::repository::{ScoreRepository, SmxRepository};
use crate::tournament::{GauntletTournament, LadderTournament, Tournament};

const MANIFEST_FILE: &str = "event.yaml";

/// A gauntlet file and, when it has one, its own entrant list
pub struct GauntletRun {
    pub file: GauntletFile,
    pub entrants: Option<Vec<String>>,
}

/// Everything one run needs, read from config files up front
pub struct EventDefinition {
    pub entrants: Vec<String>,
    pub gauntlets: Vec<GauntletRun>,
    pub ladders: Vec<LadderFile>,
    pub eligibility_sheet_name: Option<String>,
}

impl EventDefinition {
    /// Read `event.yaml` and every file it names, relative to `folder`
    pub fn load(folder: &Path) -> Result<Self> {
        let manifest_path = folder.join(MANIFEST_FILE);
        let manifest: EventManifest = load_config_file(&manifest_path)
            .with_context(|| format!("Failed to read {}", manifest_path.display()))?;

        Ok(Self {
            entrants: load_entrant_names(&folder.join(&manifest.entrants))?,
            gauntlets: load_gauntlets(folder, &manifest.gauntlets)?,
            ladders: load_all(folder, &manifest.ladders)?,
            eligibility_sheet_name: Some(manifest.eligibility_sheet_name),
        })
    }

    pub fn single_gauntlet(config: &Path, entrants: &Path) -> Result<Self> {
        Ok(Self {
            entrants: load_entrant_names(entrants)?,
            gauntlets: vec![GauntletRun {
                file: load_one(config)?,
                entrants: None,
            }],
            ladders: Vec::new(),
            eligibility_sheet_name: None,
        })
    }

    pub fn single_ladder(config: &Path, entrants: &Path) -> Result<Self> {
        Ok(Self {
            entrants: load_entrant_names(entrants)?,
            gauntlets: Vec::new(),
            ladders: vec![load_one(config)?],
            eligibility_sheet_name: None,
        })
    }
}

/// Runs every tournament of an event and hands the sheets to the writers
pub struct EventService {
    config: AppConfig,
    writers: Vec<Box<dyn SheetWriter>>,
}

impl EventService {
    pub fn new(config: AppConfig, writers: Vec<Box<dyn SheetWriter>>) -> Self {
        Self { config, writers }
    }

    pub async fn run(&mut self, event: EventDefinition) -> Result<Vec<Sheet>> {
        info!("Connecting to {}", self.config.api.base_url);
        let repo = SmxRepository::connect(&self.config)
            .await
            .context("Failed to load the song/chart catalog")?;
        self.run_with(&repo, event).await
    }

    pub async fn run_with<R: ScoreRepository>(&mut self, repo: &R, event: EventDefinition) -> Result<Vec<Sheet>> {
        info!("=== Starting Event Run ===\n");
        let mut sheets = Vec::new();

        // Step 1: Gauntlet setup and eligibility
        let mut gauntlets = self.prepare_gauntlets(repo, &event).await?;
        info!("  → Prepared {} gauntlets\n", gauntlets.len());

        if let Some(name) = &event.eligibility_sheet_name {
            if !gauntlets.is_empty() {
                let columns = gauntlets.iter().map(|g| (g.name(), g.entrants()));
                sheets.push(eligibility_sheet(name, columns));
            }
        }

        // Step 2: Gauntlet scores
        for gauntlet in &mut gauntlets {
            sheets.extend(self.score_gauntlet(repo, gauntlet).await?);
        }

        // Step 3: Ladders
        for file in event.ladders {
            sheets.extend(self.run_ladder(repo, file, &event.entrants).await?);
        }

        // Step 4: Publish
        self.publish(&sheets)?;
        info!("  → Wrote {} sheets\n", sheets.len());

        info!("=== Event Run Complete ===");
        Ok(sheets)
    }

    async fn prepare_gauntlets<R: ScoreRepository>(
        &self,
        repo: &R,
        event: &EventDefinition,
    ) -> Result<Vec<GauntletTournament>> {
        info!("Step 1: Resolving charts and checking eligibility...");

        let mut gauntlets = Vec::with_capacity(event.gauntlets.len());
        for run in &event.gauntlets {
            let name = run.file.config.name.clone();
            let entrants = run.entrants.as_deref().unwrap_or(&event.entrants);
            let mut gauntlet = GauntletTournament::from_file(run.file.clone())
                .with_concurrency(self.config.batch.max_concurrency);
            gauntlet
                .filter_songs_and_charts(repo.catalog())
                .with_context(|| format!("Failed to resolve charts of {}", name))?;
            gauntlet
                .load_entrants(repo, entrants)
                .await
                .with_context(|| format!("Failed to check eligibility for {}", name))?;
            gauntlets.push(gauntlet);
        }
        Ok(gauntlets)
    }

    async fn score_gauntlet<R: ScoreRepository>(
        &self,
        repo: &R,
        gauntlet: &mut GauntletTournament,
    ) -> Result<Vec<Sheet>> {
        let name = gauntlet.name().to_string();
        info!("Step 2: Collecting scores for {}...", name);
        gauntlet
            .get_all_scores(repo)
            .await
            .with_context(|| format!("Failed to collect scores for {}", name))?;
        Ok(gauntlet.report_results()?)
    }

    async fn run_ladder<R: ScoreRepository>(
        &self,
        repo: &R,
        file: LadderFile,
        entrants: &[String],
    ) -> Result<Vec<Sheet>> {
        let name = file.name.clone();
        let mut ladder = LadderTournament::from_file(file).with_concurrency(self.config.batch.max_concurrency);
        info!("Step 3: Running ladder {}...", name);

        let sheets = ladder
            .run(repo, entrants)
            .await
            .with_context(|| format!("Failed to run ladder {}", name))?;
        if let Some((total, leader)) = ladder.standings().first() {
            info!("  → {} leads {} with {:.2} points", leader.name, name, total);
        }
        Ok(sheets)
    }

    fn publish(&mut self, sheets: &[Sheet]) -> Result<()> {
        info!("Step 4: Publishing results...");
        for writer in &mut self.writers {
            for sheet in sheets {
                writer
                    .write_sheet(sheet)
                    .with_context(|| format!("Failed to write sheet {}", sheet.name))?;
            }
        }
        Ok(())
    }
}

fn load_entrant_names(path: &Path) -> Result<Vec<String>> {
    load_config_file(path).with_context(|| format!("Failed to read entrants from {}", path.display()))
}

fn load_one<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    load_config_file(path).with_context(|| format!("Failed to read {}", path.display()))
}

fn load_gauntlets(folder: &Path, entries: &[GauntletEntry]) -> Result<Vec<GauntletRun>> {
    entries
        .iter()
        .map(|entry| {
            let entrants = match entry.entrants() {
                Some(path) => Some(load_entrant_names(&folder.join(path))?),
                None => None,
            };
            Ok(GauntletRun {
                file: load_one(&folder.join(entry.file()))?,
                entrants,
            })
        })
        .collect()
}

fn load_all<T: serde::de::DeserializeOwned>(folder: &Path, files: &[PathBuf]) -> Result<Vec<T>> {
    files.iter().map(|file| load_one(&folder.join(file))).collect()
}
