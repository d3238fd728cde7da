use std::sync::{mpsc, Arc};
use std::thread;

use anyhow::Context;
use engine_logging::{engine_info, engine_warn};
use grabber_core::{DownloadOutcome, Effect, Msg, PageFailure, SearchItem, SearchPage};
use grabber_engine::{
    ChannelDispatchSink, DispatchOutcome, DownloadCandidate, EngineConfig, EngineEvent,
    EngineHandle, PageOutcome, ProviderError, SearchHit,
};

/// Runs core effects on the engine and pumps engine events back into the
/// message channel. Engine types never leak into the core; events are
/// mapped field by field.
pub(crate) struct EffectRunner {
    engine: EngineHandle,
}

impl EffectRunner {
    pub(crate) fn new(
        config: EngineConfig,
        msg_tx: mpsc::Sender<Msg>,
        dispatch_tx: mpsc::Sender<DownloadCandidate>,
    ) -> anyhow::Result<Self> {
        let sink = Arc::new(ChannelDispatchSink::new(dispatch_tx));
        let (engine, event_rx) = EngineHandle::new(config, sink).context("start engine")?;
        spawn_event_loop(event_rx, msg_tx);
        Ok(Self { engine })
    }

    pub(crate) fn run(&self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::FetchPage {
                    generation,
                    term,
                    page,
                } => {
                    engine_info!(
                        "FetchPage generation={} page={} term={:?}",
                        generation,
                        page,
                        term
                    );
                    self.engine.fetch_page(generation, term, page);
                }
                Effect::AbandonFetch { generation } => {
                    self.engine.abandon_fetch(generation);
                }
                Effect::ConfirmDownload { source_url, title } => {
                    engine_info!("ConfirmDownload {:?} ({})", title, source_url);
                    self.engine.confirm_download(source_url);
                }
            }
        }
    }
}

fn spawn_event_loop(event_rx: mpsc::Receiver<EngineEvent>, msg_tx: mpsc::Sender<Msg>) {
    thread::spawn(move || {
        while let Ok(event) = event_rx.recv() {
            let msg = match event {
                EngineEvent::PageLoaded { generation, result } => Msg::PageArrived {
                    generation,
                    outcome: result.map(map_page).map_err(map_failure),
                },
                EngineEvent::DownloadResolved { outcome, .. } => Msg::DownloadResolved {
                    outcome: map_outcome(outcome),
                },
            };
            if msg_tx.send(msg).is_err() {
                break;
            }
        }
    });
}

fn map_page(outcome: PageOutcome) -> SearchPage {
    SearchPage {
        total: outcome.total,
        items: outcome.hits.into_iter().map(map_hit).collect(),
        skipped: outcome.skipped,
        has_next: outcome.has_next,
    }
}

fn map_hit(hit: SearchHit) -> SearchItem {
    SearchItem {
        id: hit.id,
        title: hit.title,
        source_url: hit.source_url,
        duration_secs: hit.duration_secs,
        thumbnail_url: hit.thumbnail_url,
    }
}

fn map_failure(error: ProviderError) -> PageFailure {
    engine_warn!("Page fetch failed: {}", error);
    match error {
        ProviderError::MalformedResponse(_) => PageFailure::Malformed,
        _ => PageFailure::Transport,
    }
}

fn map_outcome(outcome: DispatchOutcome) -> DownloadOutcome {
    match outcome {
        DispatchOutcome::Dispatched { title } => DownloadOutcome::Dispatched { title },
        DispatchOutcome::AlreadyInLibrary { title } => DownloadOutcome::AlreadyInLibrary { title },
        DispatchOutcome::MetadataFailed { error } => {
            engine_warn!("Metadata resolution failed: {}", error);
            DownloadOutcome::MetadataFailed
        }
    }
}
