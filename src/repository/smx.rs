use chrono::Utc;
use log::{debug, info};
use serde_json::Value;

use super::ScoreRepository;
use crate::api::{CatalogKind, ScoreQuery, SmxClient};
use crate::cache::{Cache, Snapshot, merge_by_id};
use crate::catalog::Catalog;
use crate::config::AppConfig;
use crate::domain::Score;
use crate::errors::Result;

/// Score repository backed by the scores API and the on-disk catalog cache
pub struct SmxRepository {
    client: SmxClient,
    catalog: Catalog,
}

impl SmxRepository {
    /// Build the client and refresh songs and charts concurrently
    pub async fn connect(config: &AppConfig) -> Result<Self> {
        let client = SmxClient::new(&config.api)?;
        let cache = Cache::new(&config.cache.data_dir)?;

        let (songs, charts) = tokio::try_join!(
            refresh_kind(&client, &cache, CatalogKind::Songs),
            refresh_kind(&client, &cache, CatalogKind::Charts),
        )?;

        let catalog = Catalog::from_records(&songs, &charts);
        info!("{} songs loaded", catalog.songs().len());
        info!("{} charts loaded", catalog.charts().len());

        Ok(Self { client, catalog })
    }
}

impl ScoreRepository for SmxRepository {
    fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    async fn query_scores(&self, query: &ScoreQuery) -> Result<Vec<Score>> {
        self.client.fetch_scores(query).await
    }
}

/// Fetch records updated since the last marker, merge them into the snapshot and rewrite it
async fn refresh_kind(client: &SmxClient, cache: &Cache, kind: CatalogKind) -> Result<Vec<Value>> {
    let snapshot = cache.load_snapshot(kind.as_str())?;
    match snapshot.fetched_at {
        Some(since) => debug!("Refreshing {} updated since {}", kind.as_str(), since),
        None => info!("No cached {}, fetching everything", kind.as_str()),
    }

    // Marked before fetching; records updated mid-fetch come in on the next run
    let fetched_at = Utc::now();
    let updates = client.fetch_catalog_updates(kind, snapshot.fetched_at).await?;

    let refreshed = Snapshot {
        records: merge_by_id(snapshot.records, updates),
        fetched_at: Some(fetched_at),
    };
    cache.save_snapshot(kind.as_str(), &refreshed)?;

    Ok(refreshed.records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::settings::ApiSettings;
    use crate::domain::timestamps::parse_timestamp;
    use crate::http::serve_responses;
    use serde_json::json;

    fn client_for(base_url: String) -> SmxClient {
        SmxClient::new(&ApiSettings {
            base_url,
            rate_limit_ms: 0,
            retry_base_delay_ms: 1,
            ..ApiSettings::default()
        })
        .unwrap()
    }

    #[tokio::test]
    async fn test_refresh_merges_updates_since_marker() {
        let temp_dir = tempfile::tempdir().unwrap();
        let cache = Cache::new(temp_dir.path()).unwrap();
        let marker = parse_timestamp("2025-01-02 03:04:05");
        cache
            .save_snapshot(
                "songs",
                &Snapshot {
                    records: vec![json!({"id": 1, "title": "old"}), json!({"id": 2, "title": "kept"})],
                    fetched_at: marker,
                },
            )
            .unwrap();
        let (base_url, received) =
            serve_responses(vec![(200, r#"[{"id": 1, "title": "new"}, {"id": 3, "title": "added"}]"#)]).await;

        let records = refresh_kind(&client_for(base_url), &cache, CatalogKind::Songs)
            .await
            .unwrap();

        let request_line = received.lock().unwrap()[0].clone();
        let decoded = urlencoding::decode(&request_line).unwrap().into_owned();
        assert!(decoded.starts_with("GET /songs?params="));
        assert!(decoded.contains(r#""updated_at":{"gt":"2025-01-02 03:04:05"}"#));

        let titles: Vec<&str> = records.iter().filter_map(|r| r["title"].as_str()).collect();
        assert_eq!(titles, vec!["kept", "new", "added"]);

        let saved = cache.load_snapshot("songs").unwrap();
        assert_eq!(saved.records, records);
        assert!(saved.fetched_at > marker);
    }

    #[tokio::test]
    async fn test_refresh_without_cache_fetches_everything() {
        let temp_dir = tempfile::tempdir().unwrap();
        let cache = Cache::new(temp_dir.path()).unwrap();
        let (base_url, received) =
            serve_responses(vec![(200, r#"[{"id": 10, "song_id": 1, "difficulty": 22, "difficulty_name": "wild"}]"#)])
                .await;

        let records = refresh_kind(&client_for(base_url), &cache, CatalogKind::Charts)
            .await
            .unwrap();

        let request_line = received.lock().unwrap()[0].clone();
        assert!(!urlencoding::decode(&request_line).unwrap().contains("updated_at"));
        assert_eq!(records.len(), 1);
        assert!(temp_dir.path().join("charts_updated_at.txt").exists());
    }
}
