//! TMDB-style listing source

use super::PageFetcher;
use crate::error::Result;
use crate::http::{HttpClient, RequestConfig};
use crate::types::{PageNumber, PageResponse};
use async_trait::async_trait;
use tracing::debug;

/// Listing endpoint paged with a `page` query parameter
#[derive(Debug, Clone)]
pub struct TmdbSource {
    client: HttpClient,
    endpoint: String,
    page_param: String,
}

impl TmdbSource {
    /// Create a source for `endpoint`, relative to the client's base URL
    ///
    /// Credentials and locale are expected as default query parameters on
    /// the client.
    pub fn new(client: HttpClient, endpoint: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
            page_param: "page".to_string(),
        }
    }

    /// Use a different page query parameter
    #[must_use]
    pub fn with_page_param(mut self, param: impl Into<String>) -> Self {
        self.page_param = param.into();
        self
    }

    /// Endpoint path
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl PageFetcher for TmdbSource {
    async fn fetch_page(&self, page: PageNumber) -> Result<PageResponse> {
        let request = RequestConfig::new().query(&self.page_param, page.to_string());
        let response: PageResponse = self
            .client
            .get_json_with_config(&self.endpoint, request)
            .await?;
        debug!(
            endpoint = %self.endpoint,
            page,
            items = response.results.len(),
            total_pages = response.total_pages,
            "fetched page"
        );
        Ok(response)
    }
}
