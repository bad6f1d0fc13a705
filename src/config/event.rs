use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer};
use std::path::{Path, PathBuf};

use crate::domain::{EligibilityRequirement, timestamps};

/// One `{title, difficulty, difficulty_name}` entry of a gauntlet chart list
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ChartFilter {
    #[serde(deserialize_with = "string_or_number")]
    pub title: String,
    pub difficulty: i32,
    #[serde(default)]
    pub difficulty_name: Option<String>,
}

/// Gauntlet event file: a `config` block and the chart list
#[derive(Debug, Clone, Deserialize)]
pub struct GauntletFile {
    pub config: GauntletSettings,
    pub charts: Vec<ChartFilter>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GauntletSettings {
    #[serde(default = "default_gauntlet_name")]
    pub name: String,
    #[serde(deserialize_with = "timestamps::deserialize")]
    pub start_date: DateTime<Utc>,
    #[serde(deserialize_with = "timestamps::deserialize")]
    pub end_date: DateTime<Utc>,
    pub attempts_to_count: usize,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub disqualify_if: Vec<EligibilityRequirement>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LadderFile {
    #[serde(default = "default_ladder_name")]
    pub name: String,
    #[serde(deserialize_with = "timestamps::deserialize")]
    pub start_date: DateTime<Utc>,
    #[serde(deserialize_with = "timestamps::deserialize")]
    pub end_date: DateTime<Utc>,
    #[serde(default)]
    pub scoring_floor: i64,
    #[serde(default = "default_scaling", alias = "difficulty_scaling")]
    pub ladder_point_scalar: f64,
    #[serde(default = "default_scores_to_count")]
    pub num_scores_to_count: usize,
    #[serde(default = "default_overall_sheet")]
    pub overall_results_sheet_name: String,
    #[serde(default = "default_details_sheet")]
    pub score_details_sheet_name: String,
    #[serde(default)]
    pub restrict_to_difficulty_name: Option<String>,
}

/// `event.yaml` at the root of an event folder
#[derive(Debug, Clone, Deserialize)]
pub struct EventManifest {
    #[serde(default = "default_entrants_file")]
    pub entrants: PathBuf,
    #[serde(default)]
    pub gauntlets: Vec<GauntletEntry>,
    #[serde(default)]
    pub ladders: Vec<PathBuf>,
    #[serde(default = "default_eligibility_sheet")]
    pub eligibility_sheet_name: String,
}

/// A manifest gauntlet: a bare file name, or a file with its own entrant list
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum GauntletEntry {
    File(PathBuf),
    WithEntrants { file: PathBuf, entrants: PathBuf },
}

impl GauntletEntry {
    pub fn file(&self) -> &Path {
        match self {
            GauntletEntry::File(file) | GauntletEntry::WithEntrants { file, .. } => file.as_path(),
        }
    }

    /// Entrant list replacing the event-wide one for this gauntlet
    pub fn entrants(&self) -> Option<&Path> {
        match self {
            GauntletEntry::File(_) => None,
            GauntletEntry::WithEntrants { entrants, .. } => Some(entrants.as_path()),
        }
    }
}

fn default_gauntlet_name() -> String {
    "unknown tournament".to_string()
}

fn default_ladder_name() -> String {
    "Full".to_string()
}

fn default_scaling() -> f64 {
    2.0
}

fn default_scores_to_count() -> usize {
    20
}

fn default_overall_sheet() -> String {
    "Ladder Overall".to_string()
}

fn default_details_sheet() -> String {
    "Ladder Details".to_string()
}

fn default_entrants_file() -> PathBuf {
    PathBuf::from("entrants.yaml")
}

fn default_eligibility_sheet() -> String {
    "Bracket Eligibility".to_string()
}

// --- Deserialization Helpers ---

fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

/// Song titles such as `1000` arrive as numbers from YAML
fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Int(i64),
        Float(f64),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Text(text) => text,
        Raw::Int(value) => value.to_string(),
        Raw::Float(value) => value.to_string(),
    })
}
