use grabber_core::{FetchPhase, Notice, SessionView};

pub(crate) fn render(view: &SessionView) -> String {
    let mut out = String::new();

    for row in &view.items {
        let duration = row
            .duration_secs
            .map(format_duration)
            .unwrap_or_else(|| "--:--".to_string());
        out.push_str(&format!("[{:>3}] {:>6}  {}\n", row.index, duration, row.title));
    }

    if let Some(stats) = &view.last_load_stats {
        if stats.skipped > 0 {
            out.push_str(&format!("({} unreadable records skipped)\n", stats.skipped));
        }
    }

    if let Some(notice) = &view.last_notice {
        out.push_str(notice_line(notice).as_str());
        out.push('\n');
    }

    if !view.term.is_empty() {
        let status = match (view.fetch, view.has_more) {
            (FetchPhase::Loading, _) => "loading",
            (_, true) => "more available, type `more`",
            (_, false) => "no further results",
        };
        out.push_str(&format!(
            "{:?}: {} shown, {}\n",
            view.term,
            view.items.len(),
            status
        ));
    }

    out
}

fn notice_line(notice: &Notice) -> String {
    match notice {
        Notice::EmptyResults => "No results found".to_string(),
        Notice::LoadFailed => "There was an error loading search results".to_string(),
        Notice::BadSourceUrl => "This item has an unusable source URL".to_string(),
        Notice::AlreadyInLibrary { .. } => {
            "This file already exists in your library".to_string()
        }
        Notice::MetadataFailed => {
            "There was an error trying to download this file".to_string()
        }
        Notice::Dispatched { title } => format!("Download started for {title:?}"),
    }
}

fn format_duration(total_secs: u32) -> String {
    let minutes = total_secs / 60;
    let seconds = total_secs % 60;
    format!("{minutes}:{seconds:02}")
}
