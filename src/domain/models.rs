use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::timestamps;

pub type SongId = i64;
pub type ChartId = i64;

/// Song catalog entry from the scores API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Song {
    pub id: SongId,
    pub title: String,
    /// Alternate title, matched alongside `title`
    #[serde(default)]
    pub subtitle: Option<String>,
    #[serde(default)]
    pub artist: Option<String>,
    #[serde(default = "enabled")]
    pub is_enabled: bool,
    #[serde(default)]
    pub updated_at: Option<String>,
}

impl Song {
    pub fn matches_title(&self, title: &str) -> bool {
        let wanted = title.to_lowercase();
        self.title.to_lowercase() == wanted
            || self
                .subtitle
                .as_deref()
                .is_some_and(|subtitle| subtitle.to_lowercase() == wanted)
    }
}

/// A difficulty-tier rendition of a song
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chart {
    pub id: ChartId,
    pub song_id: SongId,
    /// Block rating
    pub difficulty: i32,
    /// Tier name, e.g. "wild"
    pub difficulty_name: String,
    #[serde(default)]
    pub difficulty_display: String,
    #[serde(default = "enabled")]
    pub is_enabled: bool,
    #[serde(default)]
    pub updated_at: Option<String>,
}

impl Chart {
    pub fn tier_starts_with(&self, prefix: &str) -> bool {
        self.difficulty_name
            .to_lowercase()
            .starts_with(&prefix.to_lowercase())
    }

    /// Display name of the tier, falling back to the raw tier name
    pub fn tier_label(&self) -> &str {
        if self.difficulty_display.is_empty() {
            &self.difficulty_name
        } else {
            &self.difficulty_display
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Gamer {
    #[serde(default)]
    pub id: Option<i64>,
    pub username: String,
}

/// One submitted attempt
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Score {
    pub id: i64,
    pub gamer: Gamer,
    pub chart: Chart,
    pub song: Song,
    pub score: i64,
    #[serde(deserialize_with = "timestamps::deserialize")]
    pub created_at: DateTime<Utc>,
}

impl Score {
    pub fn chart_id(&self) -> ChartId {
        self.chart.id
    }

    pub fn entrant(&self) -> &str {
        &self.gamer.username
    }
}

fn enabled() -> bool {
    true
}
