use std::time::Duration;

use serde_json::Value;
use url::Url;

use crate::search::map_reqwest_error;
use crate::{ProviderError, TrackMetadata};

#[derive(Debug, Clone)]
pub struct BackendSettings {
    pub base_url: String,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
}

impl Default for BackendSettings {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:5000".to_string(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
        }
    }
}

#[async_trait::async_trait]
pub trait MetadataProvider: Send + Sync {
    async fn fetch(&self, source_url: &str) -> Result<TrackMetadata, ProviderError>;
}

/// Metadata provider backed by the backend's `/api/info` endpoint, which
/// resolves a page URL into the canonical title, media URL and container
/// extension for the track behind it.
#[derive(Debug, Clone)]
pub struct BackendMetadataProvider {
    settings: BackendSettings,
    client: reqwest::Client,
}

impl BackendMetadataProvider {
    pub fn new(settings: BackendSettings) -> Result<Self, ProviderError> {
        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .build()
            .map_err(|err| ProviderError::Network(err.to_string()))?;
        Ok(Self { settings, client })
    }
}

#[async_trait::async_trait]
impl MetadataProvider for BackendMetadataProvider {
    async fn fetch(&self, source_url: &str) -> Result<TrackMetadata, ProviderError> {
        let endpoint = format!("{}/api/info", self.settings.base_url.trim_end_matches('/'));
        let request_url = Url::parse_with_params(&endpoint, &[("url", source_url)])
            .map_err(|err| ProviderError::InvalidUrl(err.to_string()))?;

        let response = self
            .client
            .get(request_url)
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
        parse_metadata(&json)
    }
}

fn parse_metadata(json: &Value) -> Result<TrackMetadata, ProviderError> {
    let title = json
        .get("title")
        .and_then(Value::as_str)
        .filter(|title| !title.is_empty())
        .ok_or_else(|| ProviderError::MalformedResponse("missing title".to_string()))?;
    let media_url = json
        .get("url")
        .and_then(Value::as_str)
        .filter(|media_url| !media_url.is_empty())
        .ok_or_else(|| ProviderError::MalformedResponse("missing media url".to_string()))?;
    let extension = json
        .get("ext")
        .and_then(Value::as_str)
        .filter(|ext| !ext.is_empty())
        .unwrap_or("mp3");

    Ok(TrackMetadata {
        title: title.to_string(),
        media_url: media_url.to_string(),
        extension: extension.to_string(),
    })
}
