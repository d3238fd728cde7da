//! Grabber engine: async providers and effect execution.
mod confirm;
mod engine;
mod extract;
mod filename;
mod metadata;
mod persist;
mod search;
mod types;

pub use confirm::{
    confirm_and_dispatch, ChannelDispatchSink, DispatchSink, ExistenceChecker, FsExistenceChecker,
};
pub use engine::{EngineConfig, EngineHandle};
pub use extract::{ItemExtractor, VimeoItemExtractor};
pub use filename::destination_filename;
pub use metadata::{BackendMetadataProvider, BackendSettings, MetadataProvider};
pub use persist::{ensure_library_dir, AtomicFileWriter, PersistError};
pub use search::{load_page, SearchProvider, SearchSettings, VimeoSearchProvider};
pub use types::{
    DispatchOutcome, DownloadCandidate, EngineEvent, Generation, PageOutcome, ProviderError,
    RawPage, SearchHit, TrackMetadata,
};
