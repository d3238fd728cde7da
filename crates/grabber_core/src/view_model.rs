use crate::state::{FetchPhase, LoadStats, Notice};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SessionView {
    pub term: String,
    pub page: u32,
    pub has_more: bool,
    pub fetch: FetchPhase,
    pub items: Vec<ItemRowView>,
    pub last_notice: Option<Notice>,
    pub last_load_stats: Option<LoadStats>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemRowView {
    pub index: usize,
    pub title: String,
    pub duration_secs: Option<u32>,
    pub source_url: String,
}
