use std::time::Duration;

use engine_logging::engine_warn;
use serde_json::Value;

use crate::extract::ItemExtractor;
use crate::{PageOutcome, ProviderError, RawPage};

#[derive(Debug, Clone)]
pub struct SearchSettings {
    pub base_url: String,
    pub api_token: String,
    pub per_page: u32,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            base_url: "https://api.vimeo.com".to_string(),
            api_token: String::new(),
            per_page: 25,
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
        }
    }
}

#[async_trait::async_trait]
pub trait SearchProvider: Send + Sync {
    async fn search(&self, term: &str, page: u32) -> Result<RawPage, ProviderError>;
}

/// Search provider backed by the Vimeo HTTP API video search endpoint.
#[derive(Debug, Clone)]
pub struct VimeoSearchProvider {
    settings: SearchSettings,
    client: reqwest::Client,
}

impl VimeoSearchProvider {
    pub fn new(settings: SearchSettings) -> Result<Self, ProviderError> {
        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .build()
            .map_err(|err| ProviderError::Network(err.to_string()))?;
        Ok(Self { settings, client })
    }
}

#[async_trait::async_trait]
impl SearchProvider for VimeoSearchProvider {
    async fn search(&self, term: &str, page: u32) -> Result<RawPage, ProviderError> {
        let endpoint = format!("{}/videos", self.settings.base_url.trim_end_matches('/'));
        let response = self
            .client
            .get(&endpoint)
            .bearer_auth(&self.settings.api_token)
            .query(&[
                ("query", term.to_string()),
                ("page", page.to_string()),
                ("per_page", self.settings.per_page.to_string()),
            ])
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(ProviderError::HttpStatus(status.as_u16()));
        }

        let body = response.bytes().await.map_err(map_reqwest_error)?;
        if body.is_empty() {
            return Err(ProviderError::NullResponse);
        }
        let json: Value = serde_json::from_slice(&body)
            .map_err(|err| ProviderError::MalformedResponse(err.to_string()))?;
        parse_page(&json)
    }
}

fn parse_page(json: &Value) -> Result<RawPage, ProviderError> {
    let total = json
        .get("total")
        .and_then(Value::as_u64)
        .ok_or_else(|| ProviderError::MalformedResponse("missing total".to_string()))?;
    if total == 0 {
        // No results at all; the paging block is not consulted.
        return Ok(RawPage {
            total: 0,
            records: Vec::new(),
            has_next: false,
        });
    }

    let records = json
        .get("data")
        .and_then(Value::as_array)
        .cloned()
        .ok_or_else(|| ProviderError::MalformedResponse("missing data".to_string()))?;
    let next = json
        .get("paging")
        .and_then(|paging| paging.get("next"))
        .ok_or_else(|| ProviderError::MalformedResponse("missing paging.next".to_string()))?;

    Ok(RawPage {
        total,
        records,
        has_next: !next.is_null(),
    })
}

/// Fetch one page and run every record through the extractor. Records the
/// extractor rejects are skipped and counted, never failing the page.
pub async fn load_page(
    provider: &dyn SearchProvider,
    extractor: &dyn ItemExtractor,
    term: &str,
    page: u32,
) -> Result<PageOutcome, ProviderError> {
    let raw = provider.search(term, page).await?;
    let mut hits = Vec::with_capacity(raw.records.len());
    let mut skipped = 0usize;
    for record in &raw.records {
        match extractor.extract(record) {
            Some(hit) => hits.push(hit),
            None => {
                skipped += 1;
                engine_warn!("Skipping unextractable record on page {} for {:?}", page, term);
            }
        }
    }
    Ok(PageOutcome {
        total: raw.total,
        hits,
        skipped,
        has_next: raw.has_next,
    })
}

pub(crate) fn map_reqwest_error(err: reqwest::Error) -> ProviderError {
    if err.is_timeout() {
        return ProviderError::Timeout;
    }
    ProviderError::Network(err.to_string())
}
