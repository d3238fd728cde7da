use std::path::PathBuf;
use std::sync::{mpsc, Arc};
use std::thread;

use engine_logging::engine_debug;
use tokio_util::sync::CancellationToken;

use crate::confirm::{confirm_and_dispatch, DispatchSink, ExistenceChecker, FsExistenceChecker};
use crate::extract::{ItemExtractor, VimeoItemExtractor};
use crate::metadata::{BackendMetadataProvider, BackendSettings, MetadataProvider};
use crate::search::{load_page, SearchProvider, SearchSettings, VimeoSearchProvider};
use crate::{EngineEvent, Generation, ProviderError};

pub struct EngineConfig {
    pub search: SearchSettings,
    pub backend: BackendSettings,
    pub library_dir: PathBuf,
}

impl EngineConfig {
    pub fn default_with_library(library_dir: PathBuf) -> Self {
        Self {
            search: SearchSettings::default(),
            backend: BackendSettings::default(),
            library_dir,
        }
    }
}

enum EngineCommand {
    FetchPage {
        generation: Generation,
        term: String,
        page: u32,
    },
    AbandonFetch {
        generation: Generation,
    },
    ConfirmDownload {
        source_url: String,
    },
}

/// Command handle to the engine thread. Cheap to clone; events flow back
/// through the receiver returned by [`EngineHandle::new`].
#[derive(Clone)]
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
}

impl EngineHandle {
    /// Spawns the engine thread with its own tokio runtime and returns the
    /// command handle plus the event stream.
    pub fn new(
        config: EngineConfig,
        dispatch: Arc<dyn DispatchSink>,
    ) -> Result<(Self, mpsc::Receiver<EngineEvent>), ProviderError> {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();

        let search: Arc<dyn SearchProvider> = Arc::new(VimeoSearchProvider::new(config.search)?);
        let extractor: Arc<dyn ItemExtractor> = Arc::new(VimeoItemExtractor);
        let metadata: Arc<dyn MetadataProvider> =
            Arc::new(BackendMetadataProvider::new(config.backend)?);
        let checker: Arc<dyn ExistenceChecker> = Arc::new(FsExistenceChecker);
        let library_dir = config.library_dir;

        thread::spawn(move || {
            let runtime = tokio::runtime::Runtime::new().expect("tokio runtime");
            // At most one fetch is outstanding per session, so tracking the
            // latest (generation, token) pair is enough for cancellation.
            let mut inflight: Option<(Generation, CancellationToken)> = None;

            while let Ok(command) = cmd_rx.recv() {
                match command {
                    EngineCommand::FetchPage {
                        generation,
                        term,
                        page,
                    } => {
                        let token = CancellationToken::new();
                        inflight = Some((generation, token.clone()));
                        let search = search.clone();
                        let extractor = extractor.clone();
                        let event_tx = event_tx.clone();
                        runtime.spawn(async move {
                            let result = tokio::select! {
                                _ = token.cancelled() => Err(ProviderError::Cancelled),
                                result = load_page(search.as_ref(), extractor.as_ref(), &term, page) => result,
                            };
                            let _ = event_tx.send(EngineEvent::PageLoaded { generation, result });
                        });
                    }
                    EngineCommand::AbandonFetch { generation } => {
                        if let Some((current, token)) = inflight.take() {
                            if current == generation {
                                engine_debug!("Abandoning fetch for generation {}", generation);
                                token.cancel();
                            } else {
                                inflight = Some((current, token));
                            }
                        }
                    }
                    EngineCommand::ConfirmDownload { source_url } => {
                        let metadata = metadata.clone();
                        let checker = checker.clone();
                        let sink = dispatch.clone();
                        let library_dir = library_dir.clone();
                        let event_tx = event_tx.clone();
                        runtime.spawn(async move {
                            let outcome = confirm_and_dispatch(
                                metadata.as_ref(),
                                checker.as_ref(),
                                sink.as_ref(),
                                &library_dir,
                                &source_url,
                            )
                            .await;
                            let _ = event_tx.send(EngineEvent::DownloadResolved {
                                source_url,
                                outcome,
                            });
                        });
                    }
                }
            }
        });

        Ok((Self { cmd_tx }, event_rx))
    }

    pub fn fetch_page(&self, generation: Generation, term: impl Into<String>, page: u32) {
        let _ = self.cmd_tx.send(EngineCommand::FetchPage {
            generation,
            term: term.into(),
            page,
        });
    }

    pub fn abandon_fetch(&self, generation: Generation) {
        let _ = self.cmd_tx.send(EngineCommand::AbandonFetch { generation });
    }

    pub fn confirm_download(&self, source_url: impl Into<String>) {
        let _ = self.cmd_tx.send(EngineCommand::ConfirmDownload {
            source_url: source_url.into(),
        });
    }
}
