use std::env;
use std::path::PathBuf;

use grabber_engine::EngineConfig;

pub(crate) struct AppSettings {
    pub config: EngineConfig,
    pub library_dir: PathBuf,
}

/// Build the engine configuration from the environment. Everything has a
/// default; only the API token genuinely needs to be provided.
pub(crate) fn from_env() -> AppSettings {
    let library_dir = env::var("GRABBER_LIBRARY_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            env::current_dir()
                .unwrap_or_else(|_| PathBuf::from("."))
                .join("library")
        });

    let mut config = EngineConfig::default_with_library(library_dir.clone());
    if let Ok(base_url) = env::var("GRABBER_API_BASE") {
        config.search.base_url = base_url;
    }
    if let Ok(token) = env::var("GRABBER_API_TOKEN") {
        config.search.api_token = token;
    }
    if let Ok(base_url) = env::var("GRABBER_BACKEND_BASE") {
        config.backend.base_url = base_url;
    }

    AppSettings {
        config,
        library_dir,
    }
}
