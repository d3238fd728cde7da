use std::fs;
use std::path::Path;

use chrono::Utc;
use engine_logging::{engine_error, engine_info, engine_warn};
use grabber_core::{SearchItem, SessionSnapshot};
use grabber_engine::AtomicFileWriter;
use serde::{Deserialize, Serialize};

const STATE_FILENAME: &str = ".grabber_session.ron";

#[derive(Debug, Clone, Serialize, Deserialize)]
struct PersistedItem {
    id: String,
    title: String,
    source_url: String,
    duration_secs: Option<u32>,
    thumbnail_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
struct PersistedSession {
    term: Option<String>,
    page: Option<u32>,
    has_more: Option<bool>,
    items: Option<Vec<PersistedItem>>,
    saved_utc: Option<String>,
}

pub(crate) fn load_session(library_dir: &Path) -> Option<SessionSnapshot> {
    let path = library_dir.join(STATE_FILENAME);
    let content = match fs::read_to_string(&path) {
        Ok(text) => text,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            return None;
        }
        Err(err) => {
            engine_warn!("Failed to read persisted session from {:?}: {}", path, err);
            return None;
        }
    };

    let persisted: PersistedSession = match ron::from_str(&content) {
        Ok(persisted) => persisted,
        Err(err) => {
            engine_warn!("Failed to parse persisted session from {:?}: {}", path, err);
            return None;
        }
    };

    engine_info!("Loaded persisted session from {:?}", path);
    Some(SessionSnapshot {
        term: persisted.term,
        page: persisted.page,
        has_more: persisted.has_more,
        items: persisted.items.map(|items| {
            items
                .into_iter()
                .map(|item| SearchItem {
                    id: item.id,
                    title: item.title,
                    source_url: item.source_url,
                    duration_secs: item.duration_secs,
                    thumbnail_url: item.thumbnail_url,
                })
                .collect()
        }),
    })
}

pub(crate) fn save_session(library_dir: &Path, snapshot: &SessionSnapshot) {
    let persisted = PersistedSession {
        term: snapshot.term.clone(),
        page: snapshot.page,
        has_more: snapshot.has_more,
        items: snapshot.items.as_ref().map(|items| {
            items
                .iter()
                .map(|item| PersistedItem {
                    id: item.id.clone(),
                    title: item.title.clone(),
                    source_url: item.source_url.clone(),
                    duration_secs: item.duration_secs,
                    thumbnail_url: item.thumbnail_url.clone(),
                })
                .collect()
        }),
        saved_utc: Some(Utc::now().to_rfc3339()),
    };

    let pretty = ron::ser::PrettyConfig::new();
    let content = match ron::ser::to_string_pretty(&persisted, pretty) {
        Ok(text) => text,
        Err(err) => {
            engine_error!("Failed to serialize session snapshot: {}", err);
            return;
        }
    };

    let writer = AtomicFileWriter::new(library_dir.to_path_buf());
    if let Err(err) = writer.write(STATE_FILENAME, &content) {
        engine_error!(
            "Failed to write session snapshot to {:?}: {}",
            library_dir,
            err
        );
    }
}
