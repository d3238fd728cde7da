use crate::state::{
    DownloadOutcome, Generation, PageFailure, SearchItem, SearchPage, SessionSnapshot,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// User submitted a new search term. Starts a fresh session.
    SearchSubmitted(String),
    /// Caller wants the next page (e.g. the list was scrolled to its end).
    /// Safe to send repeatedly; a no-op while a fetch is outstanding or
    /// after the provider reported exhaustion.
    LoadMoreRequested,
    /// Provider response for a fetch issued under `generation`.
    PageArrived {
        generation: Generation,
        outcome: Result<SearchPage, PageFailure>,
    },
    /// User confirmed downloading `item`. The affirmative confirmation gate
    /// lives in the shell; this message is only sent after it.
    DownloadRequested { item: SearchItem },
    /// The confirm-and-dispatch workflow finished for an earlier request.
    DownloadResolved { outcome: DownloadOutcome },
    /// Restore a previously saved session.
    RestoreSession(SessionSnapshot),
    /// Fallback for placeholder wiring.
    NoOp,
}
