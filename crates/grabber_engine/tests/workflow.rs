use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::sync::{mpsc, Mutex};

use grabber_engine::{
    confirm_and_dispatch, ChannelDispatchSink, DispatchOutcome, DispatchSink, DownloadCandidate,
    ExistenceChecker, MetadataProvider, ProviderError, TrackMetadata,
};

struct ScriptedMetadata {
    responses: Mutex<VecDeque<Result<TrackMetadata, ProviderError>>>,
}

impl ScriptedMetadata {
    fn new(responses: Vec<Result<TrackMetadata, ProviderError>>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
        }
    }
}

#[async_trait::async_trait]
impl MetadataProvider for ScriptedMetadata {
    async fn fetch(&self, _source_url: &str) -> Result<TrackMetadata, ProviderError> {
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .expect("scripted response")
    }
}

struct FixedExistence(bool);

impl ExistenceChecker for FixedExistence {
    fn exists(&self, _path: &Path) -> bool {
        self.0
    }
}

#[derive(Default)]
struct RecordingSink {
    sent: Mutex<Vec<DownloadCandidate>>,
}

impl RecordingSink {
    fn take(&self) -> Vec<DownloadCandidate> {
        self.sent.lock().unwrap().drain(..).collect()
    }
}

impl DispatchSink for RecordingSink {
    fn dispatch(&self, candidate: DownloadCandidate) {
        self.sent.lock().unwrap().push(candidate);
    }
}

fn track() -> TrackMetadata {
    TrackMetadata {
        title: "My Song".to_string(),
        media_url: "https://cdn.example.com/my-song.mp3".to_string(),
        extension: "mp3".to_string(),
    }
}

#[tokio::test]
async fn existing_destination_suppresses_dispatch_on_every_call() {
    let metadata = ScriptedMetadata::new(vec![Ok(track()), Ok(track())]);
    let sink = RecordingSink::default();
    let library = PathBuf::from("/lib");

    for _ in 0..2 {
        let outcome = confirm_and_dispatch(
            &metadata,
            &FixedExistence(true),
            &sink,
            &library,
            "https://vimeo.com/42",
        )
        .await;
        assert_eq!(
            outcome,
            DispatchOutcome::AlreadyInLibrary {
                title: "My Song".to_string()
            }
        );
    }

    assert!(sink.take().is_empty());
}

#[tokio::test]
async fn metadata_failure_then_retry_dispatches_once() {
    let metadata = ScriptedMetadata::new(vec![
        Err(ProviderError::Network("connection refused".to_string())),
        Ok(track()),
    ]);
    let sink = RecordingSink::default();
    let library = PathBuf::from("/lib");

    let outcome = confirm_and_dispatch(
        &metadata,
        &FixedExistence(false),
        &sink,
        &library,
        "https://vimeo.com/42",
    )
    .await;
    assert!(matches!(outcome, DispatchOutcome::MetadataFailed { .. }));
    assert!(sink.take().is_empty());

    let outcome = confirm_and_dispatch(
        &metadata,
        &FixedExistence(false),
        &sink,
        &library,
        "https://vimeo.com/42",
    )
    .await;
    assert_eq!(
        outcome,
        DispatchOutcome::Dispatched {
            title: "My Song".to_string()
        }
    );
    assert_eq!(sink.take().len(), 1);
}

#[tokio::test]
async fn dispatched_candidate_is_fully_resolved() {
    let metadata = ScriptedMetadata::new(vec![Ok(track())]);
    let sink = RecordingSink::default();
    let library = PathBuf::from("/lib");

    let _ = confirm_and_dispatch(
        &metadata,
        &FixedExistence(false),
        &sink,
        &library,
        "https://vimeo.com/42",
    )
    .await;

    let sent = sink.take();
    assert_eq!(sent.len(), 1);
    let candidate = &sent[0];
    assert_eq!(candidate.title, "My Song");
    assert_eq!(candidate.source_url, "https://vimeo.com/42");
    assert_eq!(candidate.media_url, "https://cdn.example.com/my-song.mp3");
    assert!(candidate.destination.starts_with(&library));
    let filename = candidate.destination.file_name().unwrap().to_string_lossy();
    assert!(filename.starts_with("My Song--"));
    assert!(filename.ends_with(".mp3"));
}

#[tokio::test]
async fn repeated_resolution_lands_on_the_same_destination() {
    let metadata = ScriptedMetadata::new(vec![Ok(track()), Ok(track())]);
    let sink = RecordingSink::default();
    let library = PathBuf::from("/lib");

    for _ in 0..2 {
        let _ = confirm_and_dispatch(
            &metadata,
            &FixedExistence(false),
            &sink,
            &library,
            "https://vimeo.com/42",
        )
        .await;
    }

    let sent = sink.take();
    assert_eq!(sent[0].destination, sent[1].destination);
}

#[tokio::test]
async fn channel_sink_delivers_to_its_receiver() {
    let (tx, rx) = mpsc::channel();
    let metadata = ScriptedMetadata::new(vec![Ok(track())]);
    let sink = ChannelDispatchSink::new(tx);

    let _ = confirm_and_dispatch(
        &metadata,
        &FixedExistence(false),
        &sink,
        Path::new("/lib"),
        "https://vimeo.com/42",
    )
    .await;

    let candidate = rx.try_recv().expect("dispatched candidate");
    assert_eq!(candidate.title, "My Song");
}
