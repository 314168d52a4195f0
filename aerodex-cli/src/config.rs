//! TOML configuration.
//!
//! ```toml
//! [directory]
//! data = "data/airports.json"
//! page_size = 20
//! latency_ms = 0
//!
//! [search]
//! debounce_ms = 500
//! ```
//!
//! Every section and key is optional; missing values fall back to the
//! defaults in [`aerodex::constants`]. Without `debounce_ms` the session uses
//! the library's default window, which honors `AERODEX_DEBOUNCE_MS`.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;

/// Dataset shipped with the workspace.
const BUNDLED_DATA: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/../aerodex-directory/data/airports.json");

/// Top-level configuration file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Where airports come from and how they are paged.
    pub directory: DirectoryConfig,
    /// Typeahead behavior.
    pub search: SearchConfig,
}

/// `[directory]` section.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DirectoryConfig {
    /// JSON array of airports.
    pub data: PathBuf,
    /// Airports per page.
    pub page_size: usize,
    /// Simulated lookup latency per page request.
    pub latency_ms: u64,
}

impl Default for DirectoryConfig {
    fn default() -> Self {
        Self {
            data: PathBuf::from(BUNDLED_DATA),
            page_size: aerodex::constants::page_size(),
            latency_ms: 0,
        }
    }
}

impl DirectoryConfig {
    /// [`latency_ms`](Self::latency_ms) as a duration.
    pub const fn latency(&self) -> Duration {
        Duration::from_millis(self.latency_ms)
    }
}

/// `[search]` section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SearchConfig {
    /// Debounce window for typed input; unset means the library default.
    pub debounce_ms: Option<u64>,
}

impl SearchConfig {
    /// [`debounce_ms`](Self::debounce_ms) as a duration, if configured.
    pub fn debounce(&self) -> Option<Duration> {
        self.debounce_ms.map(Duration::from_millis)
    }
}

impl Config {
    /// Parse a TOML document.
    pub fn from_toml(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    /// Read `path`, or use defaults when no file is given.
    ///
    /// A relative `data` path is resolved against the config file's directory.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let mut config = Self::from_toml(&text)
            .with_context(|| format!("parsing config {}", path.display()))?;
        if config.directory.data.is_relative()
            && let Some(base) = path.parent()
        {
            config.directory.data = base.join(&config.directory.data);
        }
        tracing::debug!(path = %path.display(), "config loaded");
        Ok(config)
    }

    /// Reject values the pager cannot work with.
    pub fn validate(&self) -> Result<()> {
        let size = self.directory.page_size;
        anyhow::ensure!(
            (1..=aerodex::constants::MAX_PAGE_SIZE).contains(&size),
            "directory.page_size must be between 1 and {}, got {size}",
            aerodex::constants::MAX_PAGE_SIZE
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document_is_default() {
        assert_eq!(Config::from_toml("").unwrap(), Config::default());
    }

    #[test]
    fn test_full_document() {
        let config = Config::from_toml(
            r#"
            [directory]
            data = "/srv/airports.json"
            page_size = 5
            latency_ms = 1500

            [search]
            debounce_ms = 250
            "#,
        )
        .unwrap();
        assert_eq!(config.directory.data, PathBuf::from("/srv/airports.json"));
        assert_eq!(config.directory.page_size, 5);
        assert_eq!(config.directory.latency(), Duration::from_millis(1500));
        assert_eq!(config.search.debounce(), Some(Duration::from_millis(250)));
    }

    #[test]
    fn test_partial_section_keeps_other_defaults() {
        let config = Config::from_toml("[directory]\npage_size = 3\n").unwrap();
        assert_eq!(config.directory.page_size, 3);
        assert_eq!(config.directory.latency_ms, 0);
        assert_eq!(config.directory.data, PathBuf::from(BUNDLED_DATA));
        assert_eq!(config.search, SearchConfig::default());
        assert_eq!(config.search.debounce(), None);
    }

    #[test]
    fn test_unknown_key_rejected() {
        let err = Config::from_toml("[search]\ndebounce = 10\n").unwrap_err();
        assert!(err.to_string().contains("debounce"));
    }

    #[test]
    fn test_validate_page_size() {
        let mut config = Config::default();
        assert!(config.validate().is_ok());
        config.directory.page_size = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_without_file() {
        assert_eq!(Config::load(None).unwrap(), Config::default());
    }

    #[test]
    fn test_load_resolves_relative_data() {
        let dir = std::env::temp_dir().join(format!("aerodex-config-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let file = dir.join("aerodex.toml");
        std::fs::write(&file, "[directory]\ndata = \"airports.json\"\n").unwrap();

        let config = Config::load(Some(&file)).unwrap();
        assert_eq!(config.directory.data, dir.join("airports.json"));

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_load_missing_file_has_context() {
        let err = Config::load(Some(Path::new("/nonexistent/aerodex.toml"))).unwrap_err();
        assert!(err.to_string().contains("reading config"));
    }
}
