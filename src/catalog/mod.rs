//! Song/chart catalog and resolution of human-written chart lists against it

use log::{debug, warn};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::config::ChartFilter;
use crate::domain::{Chart, ChartId, Song};
use crate::errors::{Error, Result};

/// Immutable snapshot of songs and charts for one run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Catalog {
    songs: Vec<Song>,
    charts: Vec<Chart>,
}

impl Catalog {
    pub fn new(songs: Vec<Song>, charts: Vec<Chart>) -> Self {
        Self { songs, charts }
    }

    /// Build from cached API records, skipping any that no longer parse
    pub fn from_records(songs: &[Value], charts: &[Value]) -> Self {
        Self {
            songs: parse_records(songs, "song"),
            charts: parse_records(charts, "chart"),
        }
    }

    pub fn songs(&self) -> &[Song] {
        &self.songs
    }

    pub fn charts(&self) -> &[Chart] {
        &self.charts
    }

    pub fn chart_ids(&self) -> Vec<ChartId> {
        self.charts.iter().map(|chart| chart.id).collect()
    }

    pub fn song_for(&self, chart: &Chart) -> Option<&Song> {
        self.songs.iter().find(|song| song.id == chart.song_id)
    }

    /// The single song whose title or subtitle equals `title`, ignoring case
    pub fn find_song(&self, title: &str) -> Result<&Song> {
        let matches: Vec<&Song> = self
            .songs
            .iter()
            .filter(|song| song.matches_title(title))
            .collect();

        match matches.as_slice() {
            [song] => Ok(*song),
            _ => Err(Error::CatalogResolution {
                title: title.to_string(),
                matches: matches.len(),
            }),
        }
    }

    /// Narrow the catalog to the songs and charts named by `filters`, in filter order
    pub fn resolve(&self, filters: &[ChartFilter]) -> Result<Catalog> {
        let mut songs = Vec::with_capacity(filters.len());
        let mut charts: Vec<Chart> = Vec::new();

        for filter in filters {
            let song = self.find_song(&filter.title)?;
            let matched = self.matching_charts(song, filter);
            if matched.is_empty() {
                warn!(
                    "No chart of {:?} at difficulty {} matches tier {:?}",
                    song.title, filter.difficulty, filter.difficulty_name
                );
            }

            for chart in matched {
                if !charts.iter().any(|known| known.id == chart.id) {
                    charts.push(chart.clone());
                }
            }
            songs.push(song.clone());
        }

        debug!("Resolved {} filters to {} charts", filters.len(), charts.len());
        Ok(Catalog::new(songs, charts))
    }

    fn matching_charts<'a>(&'a self, song: &Song, filter: &ChartFilter) -> Vec<&'a Chart> {
        self.charts
            .iter()
            .filter(|chart| chart.song_id == song.id && chart.difficulty == filter.difficulty)
            .filter(|chart| {
                filter
                    .difficulty_name
                    .as_deref()
                    .is_none_or(|tier| chart.tier_starts_with(tier))
            })
            .collect()
    }
}

fn parse_records<T: DeserializeOwned>(records: &[Value], label: &str) -> Vec<T> {
    records
        .iter()
        .filter_map(|record| match serde_json::from_value(record.clone()) {
            Ok(parsed) => Some(parsed),
            Err(e) => {
                warn!("Skipping unreadable {} record: {}", label, e);
                None
            }
        })
        .collect()
}
