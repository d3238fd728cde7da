use std::path::PathBuf;

use thiserror::Error;

/// Reset-to-reset lifetime tag of the session a fetch was issued for.
/// Mirrors the tag the core attaches to its fetch effects.
pub type Generation = u64;

/// A normalized search hit produced by an [`crate::ItemExtractor`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchHit {
    pub id: String,
    pub title: String,
    pub source_url: String,
    pub duration_secs: Option<u32>,
    pub thumbnail_url: Option<String>,
}

/// One page as returned by a search provider, records still opaque.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawPage {
    pub total: u64,
    pub records: Vec<serde_json::Value>,
    pub has_next: bool,
}

/// One page after extraction: the hits that survived plus the count of
/// records the extractor rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageOutcome {
    pub total: u64,
    pub hits: Vec<SearchHit>,
    pub skipped: usize,
    pub has_next: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProviderError {
    #[error("invalid url: {0}")]
    InvalidUrl(String),
    #[error("network error: {0}")]
    Network(String),
    #[error("timeout")]
    Timeout,
    #[error("http status {0}")]
    HttpStatus(u16),
    #[error("server returned a null response")]
    NullResponse,
    #[error("malformed response: {0}")]
    MalformedResponse(String),
    #[error("cancelled")]
    Cancelled,
}

/// Canonical download metadata as resolved by the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackMetadata {
    pub title: String,
    pub media_url: String,
    pub extension: String,
}

/// A fully resolved download, as handed to the dispatch sink.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadCandidate {
    pub title: String,
    pub source_url: String,
    pub media_url: String,
    pub destination: PathBuf,
}

/// Terminal outcome of one confirm-and-dispatch invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    Dispatched { title: String },
    AlreadyInLibrary { title: String },
    MetadataFailed { error: ProviderError },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    PageLoaded {
        generation: Generation,
        result: Result<PageOutcome, ProviderError>,
    },
    DownloadResolved {
        source_url: String,
        outcome: DispatchOutcome,
    },
}
