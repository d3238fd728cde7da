use crate::view_model::{ItemRowView, SessionView};

/// Reset-to-reset lifetime tag for a search session. Fetch effects carry the
/// generation they were issued under; responses with a stale generation are
/// discarded instead of being applied to the session that replaced them.
pub type Generation = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FetchPhase {
    #[default]
    Idle,
    Loading,
    /// The last fetch failed; `LoadMoreRequested` retries the same page.
    Failed,
}

/// A normalized search hit. Immutable once created by an extractor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchItem {
    pub id: String,
    pub title: String,
    pub source_url: String,
    pub duration_secs: Option<u32>,
    pub thumbnail_url: Option<String>,
}

/// One page of extracted results, as delivered by the engine.
///
/// Records that failed extraction never reach the core; they arrive only as
/// the `skipped` count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchPage {
    pub total: u64,
    pub items: Vec<SearchItem>,
    pub skipped: usize,
    pub has_next: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageFailure {
    /// Network-level failure, including a null/empty response body.
    Transport,
    /// The response arrived but its top-level shape was unusable.
    Malformed,
}

/// Terminal outcome of one confirm-and-dispatch workflow invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DownloadOutcome {
    Dispatched { title: String },
    AlreadyInLibrary { title: String },
    MetadataFailed,
}

/// User-visible outcome of the most recent operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    EmptyResults,
    LoadFailed,
    BadSourceUrl,
    AlreadyInLibrary { title: String },
    MetadataFailed,
    Dispatched { title: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LoadStats {
    pub appended: usize,
    pub skipped: usize,
}

/// Serializable copy of a session for save/restore across interruption.
///
/// All fields are optional: `restore` overwrites only the fields present,
/// so a partial snapshot leaves the session's current values untouched.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SessionSnapshot {
    pub term: Option<String>,
    pub page: Option<u32>,
    pub has_more: Option<bool>,
    pub items: Option<Vec<SearchItem>>,
}

/// One user search context: the active term, pagination cursor, and the
/// accumulated (append-only) result list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchSession {
    term: String,
    page: u32,
    has_more: bool,
    items: Vec<SearchItem>,
    fetch: FetchPhase,
    generation: Generation,
    last_notice: Option<Notice>,
    last_load_stats: Option<LoadStats>,
    dirty: bool,
}

impl Default for SearchSession {
    fn default() -> Self {
        Self {
            term: String::new(),
            page: 1,
            has_more: true,
            items: Vec::new(),
            fetch: FetchPhase::Idle,
            generation: 1,
            last_notice: None,
            last_load_stats: None,
            dirty: false,
        }
    }
}

impl SearchSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn view(&self) -> SessionView {
        SessionView {
            term: self.term.clone(),
            page: self.page,
            has_more: self.has_more,
            fetch: self.fetch,
            items: self
                .items
                .iter()
                .enumerate()
                .map(|(index, item)| ItemRowView {
                    index,
                    title: item.title.clone(),
                    duration_secs: item.duration_secs,
                    source_url: item.source_url.clone(),
                })
                .collect(),
            last_notice: self.last_notice.clone(),
            last_load_stats: self.last_load_stats,
        }
    }

    /// Full copy of the restorable fields. No side effects.
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            term: Some(self.term.clone()),
            page: Some(self.page),
            has_more: Some(self.has_more),
            items: Some(self.items.clone()),
        }
    }

    pub fn item(&self, index: usize) -> Option<&SearchItem> {
        self.items.get(index)
    }

    pub fn generation(&self) -> Generation {
        self.generation
    }

    /// Returns and clears the dirty flag. The shell uses this to coalesce
    /// re-rendering and snapshot saves.
    pub fn consume_dirty(&mut self) -> bool {
        let was_dirty = self.dirty;
        self.dirty = false;
        was_dirty
    }

    pub(crate) fn is_current(&self, generation: Generation) -> bool {
        self.generation == generation
    }

    /// Starts a fresh session for `term`, superseding the previous one.
    /// Returns the generation of an outstanding fetch, if one must be
    /// abandoned.
    pub(crate) fn begin_search(&mut self, term: String) -> Option<Generation> {
        let abandoned = matches!(self.fetch, FetchPhase::Loading).then_some(self.generation);
        self.term = term;
        self.page = 1;
        self.has_more = true;
        self.items.clear();
        self.fetch = FetchPhase::Idle;
        self.generation += 1;
        self.last_notice = None;
        self.last_load_stats = None;
        self.dirty = true;
        abandoned
    }

    /// Enters `Loading` and returns the fetch parameters, or `None` when no
    /// fetch may be issued: one is already outstanding, the session is
    /// exhausted, or there is no term to search for.
    pub(crate) fn begin_fetch(&mut self) -> Option<(Generation, String, u32)> {
        if matches!(self.fetch, FetchPhase::Loading) || !self.has_more || self.term.is_empty() {
            return None;
        }
        self.fetch = FetchPhase::Loading;
        self.dirty = true;
        Some((self.generation, self.term.clone(), self.page))
    }

    /// Applies a successful non-empty page: appends the extracted items and
    /// advances the cursor according to the provider's paging indicator.
    pub(crate) fn apply_page(&mut self, page: SearchPage) {
        self.last_load_stats = Some(LoadStats {
            appended: page.items.len(),
            skipped: page.skipped,
        });
        self.items.extend(page.items);
        if page.has_next {
            self.has_more = true;
            self.page += 1;
        } else {
            self.has_more = false;
        }
        self.fetch = FetchPhase::Idle;
        self.last_notice = None;
        self.dirty = true;
    }

    /// A page reporting zero total results changes nothing but the notice.
    pub(crate) fn apply_empty(&mut self) {
        self.fetch = FetchPhase::Idle;
        self.last_notice = Some(Notice::EmptyResults);
        self.last_load_stats = None;
        self.dirty = true;
    }

    /// A failed fetch leaves the cursor untouched so the same page is
    /// retried on the next `LoadMoreRequested`.
    pub(crate) fn apply_failure(&mut self) {
        self.fetch = FetchPhase::Failed;
        self.last_notice = Some(Notice::LoadFailed);
        self.last_load_stats = None;
        self.dirty = true;
    }

    pub(crate) fn apply_download_outcome(&mut self, outcome: DownloadOutcome) {
        self.last_notice = Some(match outcome {
            DownloadOutcome::Dispatched { title } => Notice::Dispatched { title },
            DownloadOutcome::AlreadyInLibrary { title } => Notice::AlreadyInLibrary { title },
            DownloadOutcome::MetadataFailed => Notice::MetadataFailed,
        });
        self.dirty = true;
    }

    pub(crate) fn set_notice(&mut self, notice: Notice) {
        self.last_notice = Some(notice);
        self.dirty = true;
    }

    pub(crate) fn clear_notice(&mut self) {
        if self.last_notice.take().is_some() {
            self.dirty = true;
        }
    }

    /// Wholesale state replacement from a snapshot. Only fields present in
    /// the snapshot are overwritten. Bumps the generation so a response
    /// issued before the restore can never land on the restored session.
    pub(crate) fn apply_restore(&mut self, snapshot: SessionSnapshot) {
        if let Some(term) = snapshot.term {
            self.term = term;
        }
        if let Some(page) = snapshot.page {
            self.page = page;
        }
        if let Some(has_more) = snapshot.has_more {
            self.has_more = has_more;
        }
        if let Some(items) = snapshot.items {
            self.items = items;
        }
        self.fetch = FetchPhase::Idle;
        self.generation += 1;
        self.last_notice = None;
        self.last_load_stats = None;
        self.dirty = true;
    }
}
