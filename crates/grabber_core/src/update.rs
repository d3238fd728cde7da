use url::Url;

use crate::{Effect, Msg, Notice, SearchSession};

/// Pure update function: applies a message to the session and returns any
/// effects. All session mutation happens here, on the caller's sequence;
/// asynchronous results re-enter as messages tagged with the generation
/// they were issued under.
pub fn update(mut session: SearchSession, msg: Msg) -> (SearchSession, Vec<Effect>) {
    let effects = match msg {
        Msg::SearchSubmitted(term) => {
            let abandoned = session.begin_search(term.trim().to_string());
            match abandoned {
                Some(generation) => vec![Effect::AbandonFetch { generation }],
                None => Vec::new(),
            }
        }
        Msg::LoadMoreRequested => match session.begin_fetch() {
            Some((generation, term, page)) => vec![Effect::FetchPage {
                generation,
                term,
                page,
            }],
            None => Vec::new(),
        },
        Msg::PageArrived { generation, outcome } => {
            if !session.is_current(generation) {
                // Stale response from before a reset or restore. Dropped
                // wholesale: it must not touch the session that replaced it.
                return (session, Vec::new());
            }
            match outcome {
                Err(_failure) => session.apply_failure(),
                Ok(page) if page.total == 0 => session.apply_empty(),
                Ok(page) => session.apply_page(page),
            }
            Vec::new()
        }
        Msg::DownloadRequested { item } => {
            if Url::parse(&item.source_url).is_err() {
                session.set_notice(Notice::BadSourceUrl);
                Vec::new()
            } else {
                // A previous notice must not mask this request's outcome.
                session.clear_notice();
                vec![Effect::ConfirmDownload {
                    source_url: item.source_url,
                    title: item.title,
                }]
            }
        }
        Msg::DownloadResolved { outcome } => {
            session.apply_download_outcome(outcome);
            Vec::new()
        }
        Msg::RestoreSession(snapshot) => {
            session.apply_restore(snapshot);
            Vec::new()
        }
        Msg::NoOp => Vec::new(),
    };

    (session, effects)
}
