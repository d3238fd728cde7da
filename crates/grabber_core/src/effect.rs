use crate::state::Generation;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Fetch one result page from the remote search provider.
    FetchPage {
        generation: Generation,
        term: String,
        page: u32,
    },
    /// Advisory cancellation of a superseded fetch. A fetch past the point
    /// of no return may still complete; its response is discarded as stale.
    AbandonFetch { generation: Generation },
    /// Run the confirm-and-dispatch workflow for a chosen item.
    ConfirmDownload { source_url: String, title: String },
}
