use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::error::ConfigError;

pub const DEFAULT_TMDB_BASE: &str = "https://api.themoviedb.org/3";
pub const DEFAULT_IMAGE_BASE: &str = "https://image.tmdb.org/t/p";
const DEFAULT_TIMEOUT_SECS: u64 = 15;
const DEFAULT_DEBOUNCE_MS: u64 = 500;
const DEFAULT_DATA_DIR: &str = "data";

#[derive(Debug, Clone)]
pub struct TmdbSettings {
    pub api_key: String,
    pub base_url: String,
    pub image_base_url: String,
    /// Upper bound for a single catalog request.
    pub timeout: Duration,
}

impl TmdbSettings {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_TMDB_BASE.to_string(),
            image_base_url: DEFAULT_IMAGE_BASE.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub tmdb: TmdbSettings,
    /// Directory holding the liked-list slot.
    pub data_dir: PathBuf,
    pub search_debounce: Duration,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from any variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let api_key = get("TMDB_API_KEY").ok_or(ConfigError::MissingApiKey)?;
        let mut tmdb = TmdbSettings::new(api_key);
        if let Some(base) = get("TMDB_BASE_URL") {
            tmdb.base_url = base.trim_end_matches('/').to_string();
        }
        if let Some(base) = get("TMDB_IMAGE_BASE_URL") {
            tmdb.image_base_url = base.trim_end_matches('/').to_string();
        }
        if let Some(raw) = get("TMDB_TIMEOUT_SECS") {
            let secs = parse_positive("TMDB_TIMEOUT_SECS", &raw)?;
            tmdb.timeout = Duration::from_secs(secs);
        }

        let search_debounce = match get("SEARCH_DEBOUNCE_MS") {
            Some(raw) => Duration::from_millis(parse_positive("SEARCH_DEBOUNCE_MS", &raw)?),
            None => Duration::from_millis(DEFAULT_DEBOUNCE_MS),
        };

        let data_dir = get("MOVIEMATCH_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR));

        Ok(Self {
            tmdb,
            data_dir,
            search_debounce,
        })
    }
}

fn parse_positive(key: &'static str, raw: &str) -> Result<u64, ConfigError> {
    match raw.parse::<u64>() {
        Ok(v) if v > 0 => Ok(v),
        _ => Err(ConfigError::Invalid {
            key,
            value: raw.to_string(),
        }),
    }
}
