//! reqwest-backed collection source.

use crate::ClientConfig;
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tallyboard_core::{
    CollectionPage, CollectionRequest, CountRequest, Endpoints, FilterOptionGroup,
    TotalRowsResponse,
};
use tallyboard_error::{HttpError, JsonError, TallyboardResult};
use tallyboard_interface::CollectionSource;
use tracing::{debug, error, instrument};

/// Collection source talking to the remote API over HTTP.
///
/// Failed requests are reported once and never retried.
#[derive(Debug, Clone)]
pub struct HttpCollectionSource {
    client: Client,
    endpoints: Endpoints,
}

impl HttpCollectionSource {
    /// Build a source from client configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    #[instrument(skip(config), fields(base_url = %config.base_url()))]
    pub fn new(config: &ClientConfig) -> TallyboardResult<Self> {
        let mut builder = Client::builder().user_agent(config.user_agent().as_str()).gzip(true);
        if let Some(secs) = config.request_timeout_secs() {
            builder = builder.timeout(Duration::from_secs(*secs));
        }
        let client = builder
            .build()
            .map_err(|e| HttpError::new(format!("Failed to build HTTP client: {}", e)))?;

        debug!(timeout = ?config.request_timeout_secs(), "Created HTTP collection source");

        Ok(Self {
            client,
            endpoints: config.endpoints(),
        })
    }

    /// Endpoints this source was configured with.
    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(String, String)],
    ) -> TallyboardResult<T> {
        let response = self
            .client
            .get(url)
            .query(query)
            .send()
            .await
            .map_err(|e| {
                error!(url, error = ?e, "HTTP request failed");
                HttpError::new(format!("Request to {} failed: {}", url, e))
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!(url, status = %status, body = %body, "API error");
            return Err(HttpError::with_status(status.as_u16(), body).into());
        }

        let bytes = response.bytes().await.map_err(|e| {
            error!(url, error = ?e, "Failed to read response body");
            HttpError::new(format!("Failed to read response from {}: {}", url, e))
        })?;

        serde_json::from_slice(&bytes).map_err(|e| {
            error!(url, error = ?e, "Failed to parse response");
            JsonError::new(format!("Failed to parse response from {}: {}", url, e)).into()
        })
    }
}

/// Query pairs for the count endpoint; an unmapped collection sends no variant.
fn count_query(request: &CountRequest) -> Vec<(String, String)> {
    let mut query = Vec::with_capacity(2);
    if let Some(variant) = request.variant {
        query.push(("variant".to_string(), variant.to_string()));
    }
    query.push(("hash".to_string(), request.hash.clone()));
    query
}

#[async_trait]
impl CollectionSource for HttpCollectionSource {
    #[instrument(skip(self, request))]
    async fn fetch_page(
        &self,
        url: &str,
        request: &CollectionRequest,
    ) -> TallyboardResult<CollectionPage> {
        let page: CollectionPage = self.get_json(url, &request.to_query_pairs()).await?;
        debug!(
            rows = page.data.len(),
            hash = ?page.total_rows_hash,
            "Fetched collection page"
        );
        Ok(page)
    }

    #[instrument(skip(self), fields(hash = %request.hash))]
    async fn fetch_total_rows(&self, request: &CountRequest) -> TallyboardResult<u64> {
        let response: TotalRowsResponse = self
            .get_json(self.endpoints.collection_size(), &count_query(request))
            .await?;
        debug!(total_rows = response.total_rows, "Fetched collection size");
        Ok(response.total_rows)
    }

    #[instrument(skip(self))]
    async fn fetch_filter_options(&self, url: &str) -> TallyboardResult<Vec<FilterOptionGroup>> {
        let groups: Vec<FilterOptionGroup> = self.get_json(url, &[]).await?;
        debug!(groups = groups.len(), "Fetched filter options");
        Ok(groups)
    }
}
