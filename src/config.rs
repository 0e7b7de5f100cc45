//! Runtime configuration
//!
//! Values come from the process environment, with a `.env` file loaded first
//! when present. Nothing here is validated at startup: a missing key only
//! surfaces as `NotConfigured` when the collaborator that needs it is called.

use std::path::Path;
use std::time::Duration;

pub const DEFAULT_CATALOG_BASE_URL: &str = "https://api.themoviedb.org/3";
pub const DEFAULT_STORE_ENDPOINT: &str = "https://cloud.appwrite.io/v1";
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(1000);
pub const DEFAULT_TRENDING_LIMIT: usize = 5;
pub const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// When the controller records a search in the trend store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum TrackingPolicy {
    /// Record once per settled, non-empty query that returned results
    #[default]
    SuccessOnly,
    /// Also record on every fetch attempt, empty query included
    EveryAttempt,
}

impl TrackingPolicy {
    pub fn records_attempts(&self) -> bool {
        matches!(self, TrackingPolicy::EveryAttempt)
    }
}

/// Catalog provider settings
#[derive(Debug, Clone)]
pub struct CatalogConfig {
    pub base_url: String,
    pub api_key: Option<String>,
}

/// Document store settings
#[derive(Debug, Clone)]
pub struct StoreConfig {
    pub endpoint: String,
    pub project_id: Option<String>,
    pub database_id: Option<String>,
    pub collection_id: Option<String>,
    /// Server key; browser-style sessions work without one
    pub api_key: Option<String>,
}

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub catalog: CatalogConfig,
    pub store: StoreConfig,
    /// Quiet period before raw input becomes the settled query
    pub debounce: Duration,
    pub trending_limit: usize,
    pub tracking: TrackingPolicy,
    pub http_timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            catalog: CatalogConfig {
                base_url: DEFAULT_CATALOG_BASE_URL.to_string(),
                api_key: None,
            },
            store: StoreConfig {
                endpoint: DEFAULT_STORE_ENDPOINT.to_string(),
                project_id: None,
                database_id: None,
                collection_id: None,
                api_key: None,
            },
            debounce: DEFAULT_DEBOUNCE,
            trending_limit: DEFAULT_TRENDING_LIMIT,
            tracking: TrackingPolicy::default(),
            http_timeout: DEFAULT_HTTP_TIMEOUT,
        }
    }
}

impl Config {
    /// Load from `.env` and the process environment
    pub fn from_env() -> Self {
        if let Err(e) = load_dotenv() {
            log::warn!("Ignoring unreadable .env file: {}", e);
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup. Each key is tried bare first, then
    /// with the `VITE_` prefix used by the web build of this app.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| -> Option<String> {
            lookup(key)
                .or_else(|| lookup(&format!("VITE_{}", key)))
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let defaults = Self::default();

        let debounce = get("MOVIEFINDER_DEBOUNCE_MS")
            .and_then(|v| v.parse::<u64>().ok())
            .map(Duration::from_millis)
            .unwrap_or(defaults.debounce);

        let trending_limit = get("MOVIEFINDER_TRENDING_LIMIT")
            .and_then(|v| v.parse::<usize>().ok())
            .unwrap_or(defaults.trending_limit);

        Self {
            catalog: CatalogConfig {
                base_url: get("TMDB_BASE_URL").unwrap_or(defaults.catalog.base_url),
                api_key: get("TMDB_API_KEY"),
            },
            store: StoreConfig {
                endpoint: get("APPWRITE_ENDPOINT").unwrap_or(defaults.store.endpoint),
                project_id: get("APPWRITE_PROJECT_ID"),
                database_id: get("APPWRITE_DATABASE_ID"),
                collection_id: get("APPWRITE_COLLECTION_ID"),
                api_key: get("APPWRITE_API_KEY"),
            },
            debounce,
            trending_limit,
            tracking: defaults.tracking,
            http_timeout: defaults.http_timeout,
        }
    }

    /// (name, present) pairs for every recognised option
    pub fn describe(&self) -> Vec<(&'static str, Option<String>)> {
        vec![
            ("TMDB_BASE_URL", Some(self.catalog.base_url.clone())),
            ("TMDB_API_KEY", self.catalog.api_key.as_deref().map(mask)),
            ("APPWRITE_ENDPOINT", Some(self.store.endpoint.clone())),
            ("APPWRITE_PROJECT_ID", self.store.project_id.clone()),
            ("APPWRITE_DATABASE_ID", self.store.database_id.clone()),
            ("APPWRITE_COLLECTION_ID", self.store.collection_id.clone()),
            ("APPWRITE_API_KEY", self.store.api_key.as_deref().map(mask)),
        ]
    }
}

/// Load `.env` from the working directory or a parent into the process
/// environment. Variables already set win. A missing file is not an error.
pub fn load_dotenv() -> std::result::Result<(), dotenvy::Error> {
    ignore_missing(dotenvy::dotenv().map(|_| ()))
}

/// Same as [`load_dotenv`] for an explicit file
pub fn load_env_file(path: &Path) -> std::result::Result<(), dotenvy::Error> {
    ignore_missing(dotenvy::from_path(path))
}

fn ignore_missing(
    loaded: std::result::Result<(), dotenvy::Error>,
) -> std::result::Result<(), dotenvy::Error> {
    match loaded {
        Err(e) if e.not_found() => Ok(()),
        other => other,
    }
}

/// Keep the first four characters of a secret
fn mask(secret: &str) -> String {
    let visible: String = secret.chars().take(4).collect();
    format!("{}****", visible)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn empty_environment_uses_defaults() {
        let config = Config::from_lookup(lookup(&[]));
        assert_eq!(config.catalog.base_url, DEFAULT_CATALOG_BASE_URL);
        assert_eq!(config.store.endpoint, DEFAULT_STORE_ENDPOINT);
        assert!(config.catalog.api_key.is_none());
        assert!(config.store.project_id.is_none());
        assert_eq!(config.debounce, Duration::from_millis(1000));
        assert_eq!(config.trending_limit, 5);
        assert_eq!(config.tracking, TrackingPolicy::SuccessOnly);
    }

    #[test]
    fn vite_prefixed_names_are_accepted() {
        let config = Config::from_lookup(lookup(&[
            ("VITE_TMDB_API_KEY", "secret-token"),
            ("VITE_APPWRITE_PROJECT_ID", "proj"),
            ("APPWRITE_DATABASE_ID", "db"),
            ("VITE_APPWRITE_COLLECTION_ID", "metrics"),
        ]));
        assert_eq!(config.catalog.api_key.as_deref(), Some("secret-token"));
        assert_eq!(config.store.project_id.as_deref(), Some("proj"));
        assert_eq!(config.store.database_id.as_deref(), Some("db"));
        assert_eq!(config.store.collection_id.as_deref(), Some("metrics"));
    }

    #[test]
    fn bare_name_wins_over_prefixed() {
        let config = Config::from_lookup(lookup(&[
            ("TMDB_API_KEY", "bare"),
            ("VITE_TMDB_API_KEY", "prefixed"),
        ]));
        assert_eq!(config.catalog.api_key.as_deref(), Some("bare"));
    }

    #[test]
    fn blank_values_count_as_missing() {
        let config = Config::from_lookup(lookup(&[("TMDB_API_KEY", "   ")]));
        assert!(config.catalog.api_key.is_none());
    }

    #[test]
    fn tuning_values_are_parsed() {
        let config = Config::from_lookup(lookup(&[
            ("MOVIEFINDER_DEBOUNCE_MS", "250"),
            ("MOVIEFINDER_TRENDING_LIMIT", "10"),
        ]));
        assert_eq!(config.debounce, Duration::from_millis(250));
        assert_eq!(config.trending_limit, 10);
    }

    #[test]
    fn describe_masks_secrets() {
        let config = Config::from_lookup(lookup(&[("TMDB_API_KEY", "abcdefgh")]));
        let described = config.describe();
        let key = described
            .iter()
            .find(|(name, _)| *name == "TMDB_API_KEY")
            .and_then(|(_, v)| v.clone());
        assert_eq!(key.as_deref(), Some("abcd****"));
    }

    fn env_file(name: &str, contents: &str) -> std::path::PathBuf {
        let path = std::env::temp_dir().join(format!(
            "moviefinder-{}-{}.env",
            name,
            std::process::id()
        ));
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn env_file_values_reach_process_environment() {
        let path = env_file("load", "MOVIEFINDER_TEST_DOTENV_LEVEL=debug\n");
        load_env_file(&path).unwrap();
        assert_eq!(
            std::env::var("MOVIEFINDER_TEST_DOTENV_LEVEL").as_deref(),
            Ok("debug")
        );
        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn process_environment_wins_over_env_file() {
        std::env::set_var("MOVIEFINDER_TEST_DOTENV_KEEP", "process");
        let path = env_file("keep", "MOVIEFINDER_TEST_DOTENV_KEEP=file\n");
        load_env_file(&path).unwrap();
        assert_eq!(
            std::env::var("MOVIEFINDER_TEST_DOTENV_KEEP").as_deref(),
            Ok("process")
        );
        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn missing_env_file_is_not_an_error() {
        assert!(load_env_file(Path::new("/nonexistent/moviefinder/.env")).is_ok());
    }
}
