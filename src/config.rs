// src/config.rs
use std::{env, fs, path::PathBuf};

use serde::Deserialize;
use tracing::{info, warn};

use crate::app::cache::DEFAULT_IMAGE_CAPACITY;
use crate::app::genres::GENRE_REFRESH_DAYS;
use crate::app::tmdb::DEFAULT_LANGUAGE;

pub const CONFIG_FILE: &str = "config.json";
pub const TOKEN_ENV: &str = "TMDB_API_TOKEN";
pub const DEFAULT_CACHE_DIR: &str = "cache";
pub const GENRE_DB_FILE: &str = "genres.db";
pub const DEFAULT_TIMEOUT_SECS: u64 = 15;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AppConfig {
    pub tmdb_api_token: Option<String>,
    pub cache_dir: Option<String>,
    pub language: String,
    pub image_cache_capacity: usize,
    pub genre_refresh_days: i64,
    pub request_timeout_secs: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            tmdb_api_token: None,
            cache_dir: None,
            language: DEFAULT_LANGUAGE.to_string(),
            image_cache_capacity: DEFAULT_IMAGE_CAPACITY,
            genre_refresh_days: GENRE_REFRESH_DAYS,
            request_timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawConfig {
    #[serde(alias = "api_token")]
    tmdb_api_token: Option<String>,
    cache_dir: Option<String>,
    language: Option<String>,
    image_cache_capacity: Option<usize>,
    genre_refresh_days: Option<i64>,
    request_timeout_secs: Option<u64>,
}

impl AppConfig {
    /// Directory for the genre database and anything else kept between runs.
    pub fn resolve_cache_dir(&self) -> PathBuf {
        match self.cache_dir.as_deref().map(str::trim) {
            Some(dir) if !dir.is_empty() => PathBuf::from(dir),
            _ => PathBuf::from(DEFAULT_CACHE_DIR),
        }
    }

    pub fn genre_db_path(&self) -> PathBuf {
        self.resolve_cache_dir().join(GENRE_DB_FILE)
    }

    /// Token to use for API calls; errors out when none is configured.
    pub fn api_token(&self) -> Result<&str, String> {
        self.tmdb_api_token
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| format!("no API token: set {TOKEN_ENV} or `tmdb_api_token` in {CONFIG_FILE}"))
    }

    fn merge(&mut self, parsed: RawConfig) {
        if parsed.tmdb_api_token.is_some() {
            self.tmdb_api_token = parsed.tmdb_api_token;
        }
        if parsed.cache_dir.is_some() {
            self.cache_dir = parsed.cache_dir;
        }
        if let Some(lang) = parsed.language.filter(|l| !l.trim().is_empty()) {
            self.language = lang;
        }
        if let Some(n) = parsed.image_cache_capacity {
            if n == 0 {
                warn!("image_cache_capacity must be at least 1; keeping {}", self.image_cache_capacity);
            } else {
                self.image_cache_capacity = n;
            }
        }
        if let Some(days) = parsed.genre_refresh_days {
            if days < 1 {
                warn!("genre_refresh_days must be at least 1; keeping {}", self.genre_refresh_days);
            } else {
                self.genre_refresh_days = days;
            }
        }
        if let Some(secs) = parsed.request_timeout_secs.filter(|s| *s > 0) {
            self.request_timeout_secs = secs;
        }
    }
}

fn parse_config(raw: &str) -> Result<AppConfig, String> {
    let parsed = serde_json::from_str::<RawConfig>(raw).map_err(|e| format!("{e}"))?;
    let mut cfg = AppConfig::default();
    cfg.merge(parsed);
    Ok(cfg)
}

pub fn load_config() -> AppConfig {
    let cfg_path = PathBuf::from(CONFIG_FILE);

    let mut cfg = match fs::read_to_string(&cfg_path) {
        Ok(raw) => match parse_config(&raw) {
            Ok(cfg) => {
                info!("Loaded config from {}", cfg_path.display());
                cfg
            }
            Err(err) => {
                warn!("Failed to parse {CONFIG_FILE} ({err}). Using defaults.");
                AppConfig::default()
            }
        },
        Err(_) => {
            info!("No {CONFIG_FILE} found; using defaults");
            AppConfig::default()
        }
    };

    if let Ok(token) = env::var(TOKEN_ENV) {
        if !token.trim().is_empty() {
            info!("Using API token from {TOKEN_ENV}");
            cfg.tmdb_api_token = Some(token);
        }
    }

    cfg
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::{parse_config, AppConfig, DEFAULT_TIMEOUT_SECS};

    #[test]
    fn empty_object_gives_defaults() {
        let cfg = parse_config("{}").unwrap();
        assert_eq!(cfg, AppConfig::default());
        assert_eq!(cfg.language, "en-US");
        assert_eq!(cfg.image_cache_capacity, 100);
        assert_eq!(cfg.genre_refresh_days, 7);
        assert_eq!(cfg.request_timeout_secs, DEFAULT_TIMEOUT_SECS);
        assert_eq!(cfg.genre_db_path(), PathBuf::from("cache").join("genres.db"));
        assert!(cfg.api_token().is_err());
    }

    #[test]
    fn keys_override_defaults() {
        let cfg = parse_config(
            r#"{"api_token":" abc ","cache_dir":"/tmp/mq","language":"de-DE",
                "image_cache_capacity":250,"genre_refresh_days":3,"request_timeout_secs":30}"#,
        )
        .unwrap();
        assert_eq!(cfg.api_token(), Ok("abc"));
        assert_eq!(cfg.genre_db_path(), PathBuf::from("/tmp/mq").join("genres.db"));
        assert_eq!(cfg.language, "de-DE");
        assert_eq!(cfg.image_cache_capacity, 250);
        assert_eq!(cfg.genre_refresh_days, 3);
        assert_eq!(cfg.request_timeout_secs, 30);
    }

    #[test]
    fn nonsense_values_are_ignored() {
        let cfg = parse_config(
            r#"{"cache_dir":"  ","language":"","image_cache_capacity":0,"genre_refresh_days":0}"#,
        )
        .unwrap();
        assert_eq!(cfg.resolve_cache_dir(), PathBuf::from("cache"));
        assert_eq!(cfg.language, "en-US");
        assert_eq!(cfg.image_cache_capacity, 100);
        assert_eq!(cfg.genre_refresh_days, 7);
    }

    #[test]
    fn broken_json_is_an_error() {
        assert!(parse_config("{not json").is_err());
    }
}
