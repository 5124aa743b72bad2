use crate::shared::error::{CacheError, Result};
use serde::Deserialize;
use serde_yaml::Value;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::debug;

pub const DEFAULT_ENVIRONMENT: &str = "development";

/// Checked in order; the first non-empty value names the environment.
const ENVIRONMENT_VARS: [&str; 3] = ["FEED_CACHE_ENV", "RAILS_ENV", "RACK_ENV"];

/// Probed in order relative to [`CacheSettings::search_root`].
pub const CANDIDATE_CONFIG_PATHS: [&str; 8] = [
    "./config/database.yml",
    "./database.yml",
    "../config/database.yml",
    "../database.yml",
    "../../config/database.yml",
    "../../database.yml",
    "../../../config/database.yml",
    "../../../database.yml",
];

const IN_MEMORY_DATABASE: &str = ":memory:";
const SUPPORTED_ADAPTERS: [&str; 2] = ["sqlite3", "sqlite"];

/// Named deployment context used to pick a section out of `database.yml`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Environment(String);

impl Environment {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn from_env() -> Self {
        for var in ENVIRONMENT_VARS {
            if let Ok(value) = std::env::var(var) {
                let value = value.trim();
                if !value.is_empty() {
                    return Self::new(value);
                }
            }
        }
        Self::default()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::new(DEFAULT_ENVIRONMENT)
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Everything the store needs to find its connection parameters.
#[derive(Debug, Clone)]
pub struct CacheSettings {
    pub environment: Environment,
    pub search_root: PathBuf,
    pub candidates: Vec<PathBuf>,
}

impl Default for CacheSettings {
    fn default() -> Self {
        let search_root = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        Self::new(Environment::from_env(), search_root)
    }
}

impl CacheSettings {
    pub fn new(environment: Environment, search_root: impl Into<PathBuf>) -> Self {
        Self {
            environment,
            search_root: search_root.into(),
            candidates: CANDIDATE_CONFIG_PATHS.iter().map(PathBuf::from).collect(),
        }
    }

    pub fn with_candidates<I, P>(mut self, candidates: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        self.candidates = candidates.into_iter().map(Into::into).collect();
        self
    }

    pub fn candidate_paths(&self) -> Vec<PathBuf> {
        self.candidates
            .iter()
            .map(|candidate| self.search_root.join(candidate))
            .collect()
    }
}

/// Connection parameters in the shape of an ActiveRecord `database.yml` entry.
///
/// Keys other than the ones below (`host`, `username`, `encoding`, ...) are
/// accepted and ignored.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DatabaseConfig {
    pub adapter: String,
    #[serde(default)]
    pub database: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    /// Maximum pooled connections.
    #[serde(default = "default_pool")]
    pub pool: u32,
    /// Busy timeout in milliseconds.
    #[serde(default = "default_timeout")]
    pub timeout: u64,
}

fn default_pool() -> u32 {
    5
}

fn default_timeout() -> u64 {
    5000
}

impl DatabaseConfig {
    pub fn sqlite(database: impl Into<String>) -> Self {
        Self {
            adapter: "sqlite3".to_string(),
            database: Some(database.into()),
            url: None,
            pool: default_pool(),
            timeout: default_timeout(),
        }
    }

    pub fn is_in_memory(&self) -> bool {
        match (&self.url, &self.database) {
            (Some(url), _) => url.contains(IN_MEMORY_DATABASE),
            (None, Some(database)) => database == IN_MEMORY_DATABASE,
            (None, None) => false,
        }
    }

    pub fn validate(&self) -> Result<()> {
        let adapter = self.adapter.to_ascii_lowercase();
        if !SUPPORTED_ADAPTERS.contains(&adapter.as_str()) {
            return Err(CacheError::UnsupportedAdapter(self.adapter.clone()));
        }
        if self.pool == 0 {
            return Err(CacheError::InvalidConfiguration(
                "pool must be greater than 0".to_string(),
            ));
        }
        let has_database = self
            .database
            .as_deref()
            .is_some_and(|database| !database.trim().is_empty());
        let has_url = self.url.as_deref().is_some_and(|url| !url.trim().is_empty());
        if !has_database && !has_url {
            return Err(CacheError::InvalidConfiguration(
                "either database or url must be set".to_string(),
            ));
        }
        Ok(())
    }

    /// Relative database files live next to the config file that named them.
    fn resolve_relative_to(&mut self, base: &Path) {
        if self.url.is_some() {
            return;
        }
        if let Some(database) = &self.database {
            let path = Path::new(database);
            if database != IN_MEMORY_DATABASE && path.is_relative() {
                self.database = Some(base.join(path).to_string_lossy().into_owned());
            }
        }
    }
}

/// Returns the first candidate config file that exists on disk.
pub fn discover_config_file(settings: &CacheSettings) -> Result<PathBuf> {
    let searched = settings.candidate_paths();
    match searched.iter().find(|path| path.is_file()) {
        Some(path) => {
            debug!(path = %path.display(), "found database configuration");
            Ok(path.clone())
        }
        None => Err(CacheError::ConfigurationNotFound { searched }),
    }
}

/// Loads `path` and picks the section for `environment`, falling back to
/// the whole document when no such section exists.
pub fn load_database_config(path: &Path, environment: &Environment) -> Result<DatabaseConfig> {
    let content = std::fs::read_to_string(path)?;
    let parse_error = |message: String| CacheError::ConfigurationParse {
        path: path.to_path_buf(),
        message,
    };

    let document: Value = serde_yaml::from_str(&content).map_err(|err| parse_error(err.to_string()))?;
    let section = select_environment_section(document, environment);
    let mut config: DatabaseConfig =
        serde_yaml::from_value(section).map_err(|err| parse_error(err.to_string()))?;

    if let Some(base) = path.parent() {
        config.resolve_relative_to(base);
    }
    config.validate()?;
    Ok(config)
}

/// Only a mapping under the environment key counts as a section; any other
/// value falls through to the whole document.
fn select_environment_section(document: Value, environment: &Environment) -> Value {
    if let Value::Mapping(map) = &document {
        if let Some(section @ Value::Mapping(_)) = map.get(environment.as_str()) {
            debug!(environment = %environment, "using environment section of database configuration");
            return section.clone();
        }
    }
    document
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    /// Nested so every `../` candidate stays inside the temp dir.
    fn nested_root(temp_dir: &TempDir) -> PathBuf {
        let root = temp_dir.path().join("a/b/c");
        fs::create_dir_all(&root).unwrap();
        root
    }

    fn write(path: &Path, content: &str) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    #[test]
    fn discover_returns_not_found_with_all_candidates() {
        let temp_dir = TempDir::new().unwrap();
        let settings = CacheSettings::new(Environment::new("test"), nested_root(&temp_dir));

        let err = discover_config_file(&settings).unwrap_err();
        match err {
            CacheError::ConfigurationNotFound { searched } => assert_eq!(searched.len(), 8),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn discover_prefers_config_directory_over_root_file() {
        let temp_dir = TempDir::new().unwrap();
        let root = nested_root(&temp_dir);
        write(&root.join("database.yml"), "adapter: sqlite3\ndatabase: a.db\n");
        write(&root.join("config/database.yml"), "adapter: sqlite3\ndatabase: b.db\n");
        let settings = CacheSettings::new(Environment::new("test"), &root);

        let found = discover_config_file(&settings).unwrap();
        assert_eq!(found, root.join("./config/database.yml"));
    }

    #[test]
    fn discover_walks_up_parent_directories() {
        let temp_dir = TempDir::new().unwrap();
        let root = nested_root(&temp_dir);
        write(&temp_dir.path().join("a/database.yml"), "adapter: sqlite3\n");
        let settings = CacheSettings::new(Environment::new("test"), &root);

        let found = discover_config_file(&settings).unwrap();
        assert_eq!(found, root.join("../../database.yml"));
    }

    #[test]
    fn environment_section_wins_over_siblings() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("database.yml");
        write(
            &path,
            "test:\n  adapter: sqlite3\n  database: test.db\n  pool: 2\n\
             production:\n  adapter: postgresql\n  database: prod\n",
        );

        let config = load_database_config(&path, &Environment::new("test")).unwrap();
        assert_eq!(config.adapter, "sqlite3");
        assert_eq!(config.pool, 2);
        assert_eq!(
            config.database.as_deref(),
            Some(temp_dir.path().join("test.db").to_string_lossy().as_ref())
        );
    }

    #[test]
    fn flat_document_is_used_when_no_section_matches() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("database.yml");
        write(&path, "adapter: sqlite3\ndatabase: \":memory:\"\nhost: ignored\n");

        let config = load_database_config(&path, &Environment::new("test")).unwrap();
        assert_eq!(config.database.as_deref(), Some(":memory:"));
        assert_eq!(config.pool, 5);
        assert_eq!(config.timeout, 5000);
        assert!(config.is_in_memory());
    }

    #[test]
    fn selected_section_with_unsupported_adapter_is_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("database.yml");
        write(&path, "production:\n  adapter: postgresql\n  database: prod\n");

        let err = load_database_config(&path, &Environment::new("production")).unwrap_err();
        assert!(matches!(err, CacheError::UnsupportedAdapter(adapter) if adapter == "postgresql"));
    }

    #[test]
    fn malformed_yaml_reports_parse_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("database.yml");
        write(&path, "adapter: [sqlite3\n");

        let err = load_database_config(&path, &Environment::new("test")).unwrap_err();
        assert!(matches!(err, CacheError::ConfigurationParse { .. }));
    }

    #[test]
    fn validate_requires_database_or_url() {
        let mut config = DatabaseConfig::sqlite("cache.db");
        config.database = None;
        assert!(matches!(
            config.validate(),
            Err(CacheError::InvalidConfiguration(_))
        ));

        config.url = Some("sqlite://cache.db?mode=rwc".to_string());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn url_is_never_rewritten() {
        let mut config = DatabaseConfig::sqlite("cache.db");
        config.url = Some("sqlite://cache.db".to_string());
        config.resolve_relative_to(Path::new("/srv/app/config"));
        assert_eq!(config.database.as_deref(), Some("cache.db"));
    }

    /// Restores the previous value of each variable on drop.
    struct EnvGuard {
        saved: Vec<(&'static str, Option<String>)>,
    }

    impl EnvGuard {
        fn capture(keys: &[&'static str]) -> Self {
            let saved = keys.iter().map(|key| (*key, std::env::var(key).ok())).collect();
            Self { saved }
        }
    }

    impl Drop for EnvGuard {
        fn drop(&mut self) {
            for (key, value) in &self.saved {
                match value {
                    Some(value) => std::env::set_var(key, value),
                    None => std::env::remove_var(key),
                }
            }
        }
    }

    // One test owns all three variables so parallel tests never race on them.
    #[test]
    fn from_env_follows_lookup_order() {
        let _guard = EnvGuard::capture(&ENVIRONMENT_VARS);
        for key in ENVIRONMENT_VARS {
            std::env::remove_var(key);
        }

        assert_eq!(Environment::from_env().as_str(), "development");

        std::env::set_var("RACK_ENV", "staging");
        assert_eq!(Environment::from_env().as_str(), "staging");

        std::env::set_var("RAILS_ENV", "production");
        std::env::set_var("FEED_CACHE_ENV", "test");
        assert_eq!(Environment::from_env().as_str(), "test");

        std::env::set_var("FEED_CACHE_ENV", "   ");
        assert_eq!(Environment::from_env().as_str(), "production");

        std::env::set_var("FEED_CACHE_ENV", " test ");
        assert_eq!(Environment::from_env().as_str(), "test");

        let settings = CacheSettings::default();
        assert_eq!(settings.environment.as_str(), "test");
        assert_eq!(settings.candidate_paths().len(), CANDIDATE_CONFIG_PATHS.len());
    }

    #[test]
    fn scalar_environment_key_falls_back_to_document() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("database.yml");
        write(&path, "adapter: sqlite3\ndatabase: x.db\ntest: yes\n");

        let config = load_database_config(&path, &Environment::new("test")).unwrap();
        assert_eq!(
            config.database.as_deref(),
            Some(temp_dir.path().join("x.db").to_string_lossy().as_ref())
        );
    }

    #[test]
    fn default_environment_is_development() {
        assert_eq!(Environment::default().as_str(), "development");
    }
}
