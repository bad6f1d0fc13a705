use chrono::{DateTime, Utc};
use log::info;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};

use crate::api::query::ScoreQuery;
use crate::config::settings::ApiSettings;
use crate::domain::{Score, timestamps};
use crate::errors::Result;
use crate::http::{RateLimitedClient, RetryPolicy};
use crate::pagination::{PageRequest, PaginationConfig, build_params_url, collect_pages, with_page};

/// Catalog endpoints refreshed incrementally
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogKind {
    Songs,
    Charts,
}

impl CatalogKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            CatalogKind::Songs => "songs",
            CatalogKind::Charts => "charts",
        }
    }
}

/// Scores API client
pub struct SmxClient {
    client: RateLimitedClient,
    base_url: String,
    page_size: usize,
}

impl SmxClient {
    pub fn new(settings: &ApiSettings) -> Result<Self> {
        let retry = RetryPolicy::new(settings.max_retries, settings.retry_base_delay_ms);
        let client = RateLimitedClient::new(
            settings.user_agent,
            settings.timeout_secs,
            settings.rate_limit_ms,
            retry,
        )?;
        Ok(Self {
            client,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            page_size: settings.page_size,
        })
    }

    /// Every score matching the query, following pages until exhausted or `take` is met
    pub async fn fetch_scores(&self, query: &ScoreQuery) -> Result<Vec<Score>> {
        let endpoint = self.build_endpoint("scores");
        let params = query.to_params();
        let config = self.pagination().with_take(query.take);

        let scores: Vec<Score> = self.fetch_all(&endpoint, &params, config).await?;
        info!("Returned {} scores for entrant_name={:?}", scores.len(), query.entrant);
        Ok(scores)
    }

    /// Raw catalog records updated after `since` (everything when `None`)
    pub async fn fetch_catalog_updates(
        &self,
        kind: CatalogKind,
        since: Option<DateTime<Utc>>,
    ) -> Result<Vec<Value>> {
        let endpoint = self.build_endpoint(kind.as_str());
        let params = Self::build_updated_since_params(since);

        let records: Vec<Value> = self.fetch_all(&endpoint, &params, self.pagination()).await?;
        info!("Fetched {} updated {}", records.len(), kind.as_str());
        Ok(records)
    }

    // --- Helper Methods ---

    async fn fetch_all<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        params: &Value,
        config: PaginationConfig,
    ) -> Result<Vec<T>> {
        collect_pages(config, move |request| self.fetch_page(endpoint, params, request)).await
    }

    async fn fetch_page<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        params: &Value,
        request: PageRequest,
    ) -> Result<Vec<T>> {
        let url = build_params_url(endpoint, &with_page(params, request));
        self.client.get_json(&url).await
    }

    fn pagination(&self) -> PaginationConfig {
        PaginationConfig::new().with_page_size(self.page_size)
    }

    fn build_endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    fn build_updated_since_params(since: Option<DateTime<Utc>>) -> Value {
        match since {
            Some(ts) => json!({"updated_at": {"gt": timestamps::to_api_string(&ts)}}),
            None => json!({}),
        }
    }
}
