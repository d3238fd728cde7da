//! Grabber core: pure search-session state machine and view-model helpers.
mod effect;
mod msg;
mod state;
mod update;
mod view_model;

pub use effect::Effect;
pub use msg::Msg;
pub use state::{
    DownloadOutcome, FetchPhase, Generation, LoadStats, Notice, PageFailure, SearchItem,
    SearchPage, SearchSession, SessionSnapshot,
};
pub use update::update;
pub use view_model::{ItemRowView, SessionView};
