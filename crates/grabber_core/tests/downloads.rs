use std::sync::Once;

use grabber_core::{update, DownloadOutcome, Effect, Msg, Notice, SearchItem, SearchSession};

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(engine_logging::initialize_for_tests);
}

fn item(source_url: &str) -> SearchItem {
    SearchItem {
        id: "/videos/42".to_string(),
        title: "Forty Two".to_string(),
        source_url: source_url.to_string(),
        duration_secs: Some(261),
        thumbnail_url: None,
    }
}

#[test]
fn confirmed_download_emits_a_confirm_effect() {
    init_logging();
    let (_, effects) = update(
        SearchSession::new(),
        Msg::DownloadRequested {
            item: item("https://example.com/videos/42"),
        },
    );

    assert_eq!(
        effects,
        vec![Effect::ConfirmDownload {
            source_url: "https://example.com/videos/42".to_string(),
            title: "Forty Two".to_string(),
        }]
    );
}

#[test]
fn unparseable_source_url_is_rejected_without_dispatch() {
    init_logging();
    let (session, effects) = update(
        SearchSession::new(),
        Msg::DownloadRequested {
            item: item("not a url"),
        },
    );

    assert!(effects.is_empty());
    assert_eq!(session.view().last_notice, Some(Notice::BadSourceUrl));
}

#[test]
fn workflow_outcomes_surface_as_notices() {
    init_logging();
    let (session, effects) = update(
        SearchSession::new(),
        Msg::DownloadResolved {
            outcome: DownloadOutcome::AlreadyInLibrary {
                title: "Forty Two".to_string(),
            },
        },
    );
    assert!(effects.is_empty());
    assert_eq!(
        session.view().last_notice,
        Some(Notice::AlreadyInLibrary {
            title: "Forty Two".to_string()
        })
    );

    let (session, _) = update(
        session,
        Msg::DownloadResolved {
            outcome: DownloadOutcome::MetadataFailed,
        },
    );
    assert_eq!(session.view().last_notice, Some(Notice::MetadataFailed));

    let (session, _) = update(
        session,
        Msg::DownloadResolved {
            outcome: DownloadOutcome::Dispatched {
                title: "Forty Two".to_string(),
            },
        },
    );
    assert_eq!(
        session.view().last_notice,
        Some(Notice::Dispatched {
            title: "Forty Two".to_string()
        })
    );
}

#[test]
fn download_messages_leave_pagination_alone() {
    init_logging();
    let (session, _) = update(
        SearchSession::new(),
        Msg::SearchSubmitted("test".to_string()),
    );
    let before = session.view();

    let (session, _) = update(
        session,
        Msg::DownloadResolved {
            outcome: DownloadOutcome::MetadataFailed,
        },
    );
    let after = session.view();
    assert_eq!(after.term, before.term);
    assert_eq!(after.page, before.page);
    assert_eq!(after.has_more, before.has_more);
    assert_eq!(after.items, before.items);
}
