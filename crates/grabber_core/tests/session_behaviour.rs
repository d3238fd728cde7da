use std::sync::Once;

use grabber_core::{
    update, Effect, FetchPhase, Msg, Notice, PageFailure, SearchItem, SearchPage, SearchSession,
};

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(engine_logging::initialize_for_tests);
}

fn item(n: usize) -> SearchItem {
    SearchItem {
        id: format!("/videos/{n}"),
        title: format!("Track {n}"),
        source_url: format!("https://example.com/videos/{n}"),
        duration_secs: Some(180),
        thumbnail_url: None,
    }
}

fn page(total: u64, count: usize, skipped: usize, has_next: bool) -> SearchPage {
    SearchPage {
        total,
        items: (0..count).map(item).collect(),
        skipped,
        has_next,
    }
}

fn submit(session: SearchSession, term: &str) -> (SearchSession, Vec<Effect>) {
    update(session, Msg::SearchSubmitted(term.to_string()))
}

fn load_more(session: SearchSession) -> (SearchSession, Vec<Effect>) {
    update(session, Msg::LoadMoreRequested)
}

#[test]
fn load_more_fetches_the_current_page() {
    init_logging();
    let (session, _) = submit(SearchSession::new(), "test");
    let (session, effects) = load_more(session);

    assert_eq!(
        effects,
        vec![Effect::FetchPage {
            generation: session.generation(),
            term: "test".to_string(),
            page: 1,
        }]
    );
    assert_eq!(session.view().fetch, FetchPhase::Loading);
}

#[test]
fn at_most_one_fetch_in_flight() {
    init_logging();
    let (session, _) = submit(SearchSession::new(), "test");
    let (session, first) = load_more(session);
    assert_eq!(first.len(), 1);

    // Repeated requests while the fetch is outstanding are no-ops.
    let (session, second) = load_more(session);
    assert!(second.is_empty());
    let (session, third) = load_more(session);
    assert!(third.is_empty());
    assert_eq!(session.view().page, 1);
}

#[test]
fn blank_term_never_fetches() {
    init_logging();
    let (session, effects) = submit(SearchSession::new(), "   ");
    assert!(effects.is_empty());
    let (_, effects) = load_more(session);
    assert!(effects.is_empty());
}

#[test]
fn successful_page_appends_and_advances() {
    init_logging();
    let (session, _) = submit(SearchSession::new(), "test");
    let (session, _) = load_more(session);

    let generation = session.generation();
    let (session, effects) = update(
        session,
        Msg::PageArrived {
            generation,
            outcome: Ok(page(5, 5, 0, true)),
        },
    );

    assert!(effects.is_empty());
    let view = session.view();
    assert_eq!(view.items.len(), 5);
    assert_eq!(view.page, 2);
    assert!(view.has_more);
    assert_eq!(view.fetch, FetchPhase::Idle);
}

#[test]
fn exhaustion_is_terminal_until_reset() {
    init_logging();
    let (session, _) = submit(SearchSession::new(), "test");
    let (session, _) = load_more(session);
    let generation = session.generation();
    let (session, _) = update(
        session,
        Msg::PageArrived {
            generation,
            outcome: Ok(page(5, 5, 0, true)),
        },
    );

    let (session, _) = load_more(session);
    let generation = session.generation();
    let (session, _) = update(
        session,
        Msg::PageArrived {
            generation,
            outcome: Ok(page(5, 0, 0, false)),
        },
    );

    let view = session.view();
    assert!(!view.has_more);
    assert_eq!(view.page, 2);
    assert_eq!(view.items.len(), 5);

    // No further fetch is issued and nothing changes.
    let (session, effects) = load_more(session);
    assert!(effects.is_empty());
    assert_eq!(session.view().items.len(), 5);

    // A reset makes the session fetchable again.
    let (session, _) = submit(session, "other");
    let (_, effects) = load_more(session);
    assert_eq!(effects.len(), 1);
}

#[test]
fn zero_total_produces_empty_notice_without_state_change() {
    init_logging();
    let (session, _) = submit(SearchSession::new(), "zzz");
    let (session, _) = load_more(session);
    let generation = session.generation();
    let (session, _) = update(
        session,
        Msg::PageArrived {
            generation,
            outcome: Ok(page(0, 0, 0, false)),
        },
    );

    let view = session.view();
    assert_eq!(view.last_notice, Some(Notice::EmptyResults));
    assert!(view.items.is_empty());
    assert!(view.has_more);
    assert_eq!(view.page, 1);
    assert_eq!(view.fetch, FetchPhase::Idle);
}

#[test]
fn failed_fetch_retries_the_same_page() {
    init_logging();
    let (session, _) = submit(SearchSession::new(), "test");
    let (session, _) = load_more(session);
    let generation = session.generation();
    let (session, _) = update(
        session,
        Msg::PageArrived {
            generation,
            outcome: Err(PageFailure::Transport),
        },
    );

    let view = session.view();
    assert_eq!(view.last_notice, Some(Notice::LoadFailed));
    assert_eq!(view.fetch, FetchPhase::Failed);
    assert_eq!(view.page, 1);
    assert!(view.has_more);
    assert!(view.items.is_empty());

    let (session, effects) = load_more(session);
    assert_eq!(
        effects,
        vec![Effect::FetchPage {
            generation: session.generation(),
            term: "test".to_string(),
            page: 1,
        }]
    );
}

#[test]
fn partially_malformed_page_still_advances() {
    init_logging();
    let (session, _) = submit(SearchSession::new(), "test");
    let (session, _) = load_more(session);

    // 5 records on the page, 2 rejected by the extractor engine-side.
    let generation = session.generation();
    let (session, _) = update(
        session,
        Msg::PageArrived {
            generation,
            outcome: Ok(page(5, 3, 2, true)),
        },
    );

    let view = session.view();
    assert_eq!(view.items.len(), 3);
    assert_eq!(view.page, 2);
    assert!(view.has_more);
    let stats = view.last_load_stats.expect("load stats");
    assert_eq!(stats.appended, 3);
    assert_eq!(stats.skipped, 2);
}

#[test]
fn reset_is_idempotent() {
    init_logging();
    let (session, _) = submit(SearchSession::new(), "test");
    let (session, _) = load_more(session);
    let generation = session.generation();
    let (session, _) = update(
        session,
        Msg::PageArrived {
            generation,
            outcome: Ok(page(5, 5, 0, true)),
        },
    );

    let (session, _) = submit(session, "fresh");
    let view = session.view();
    assert_eq!(view.term, "fresh");
    assert_eq!(view.page, 1);
    assert!(view.has_more);
    assert!(view.items.is_empty());

    // Resetting again from the reset state yields the same shape.
    let (session, _) = submit(session, "fresh");
    let view = session.view();
    assert_eq!(view.page, 1);
    assert!(view.has_more);
    assert!(view.items.is_empty());
}
