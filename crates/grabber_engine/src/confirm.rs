use std::path::Path;
use std::sync::mpsc;

use engine_logging::{engine_info, engine_warn};

use crate::filename::destination_filename;
use crate::metadata::MetadataProvider;
use crate::{DispatchOutcome, DownloadCandidate};

/// Pure local query: does the target artifact already exist?
pub trait ExistenceChecker: Send + Sync {
    fn exists(&self, path: &Path) -> bool;
}

#[derive(Debug, Default)]
pub struct FsExistenceChecker;

impl ExistenceChecker for FsExistenceChecker {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }
}

/// Fire-and-forget boundary to the subsystem that actually transfers bytes.
/// The workflow never waits for or retries a dispatch.
pub trait DispatchSink: Send + Sync {
    fn dispatch(&self, candidate: DownloadCandidate);
}

pub struct ChannelDispatchSink {
    tx: mpsc::Sender<DownloadCandidate>,
}

impl ChannelDispatchSink {
    pub fn new(tx: mpsc::Sender<DownloadCandidate>) -> Self {
        Self { tx }
    }
}

impl DispatchSink for ChannelDispatchSink {
    fn dispatch(&self, candidate: DownloadCandidate) {
        let _ = self.tx.send(candidate);
    }
}

/// Resolve canonical metadata for `source_url`, then either report that the
/// destination already exists in the library or hand the resolved candidate
/// to the dispatch sink.
///
/// Every failure path is terminal for this single invocation; the caller
/// may re-invoke manually. The affirmative human confirmation is the
/// caller's concern and has already happened by the time this runs.
pub async fn confirm_and_dispatch(
    metadata: &dyn MetadataProvider,
    checker: &dyn ExistenceChecker,
    sink: &dyn DispatchSink,
    library_dir: &Path,
    source_url: &str,
) -> DispatchOutcome {
    let resolved = match metadata.fetch(source_url).await {
        Ok(resolved) => resolved,
        Err(error) => {
            engine_warn!("Metadata fetch failed for {}: {}", source_url, error);
            return DispatchOutcome::MetadataFailed { error };
        }
    };

    let destination = library_dir.join(destination_filename(
        &resolved.title,
        source_url,
        &resolved.extension,
    ));
    if checker.exists(&destination) {
        engine_info!("{:?} already exists in the library, not dispatching", destination);
        return DispatchOutcome::AlreadyInLibrary {
            title: resolved.title,
        };
    }

    let title = resolved.title.clone();
    sink.dispatch(DownloadCandidate {
        title: resolved.title,
        source_url: source_url.to_string(),
        media_url: resolved.media_url,
        destination,
    });
    engine_info!("Download command dispatched for {}", source_url);
    DispatchOutcome::Dispatched { title }
}
