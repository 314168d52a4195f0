//! The airport record store.
//!
//! A [`Directory`] is a flat, ordered list of [`Airport`]s loaded from a JSON
//! array. Searching is a case-insensitive regular expression over every
//! field; paging slices the search result.

use std::path::Path;

use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// One airport.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Airport {
    /// Three-letter IATA code, upper case.
    pub iata: String,
    /// Airport name.
    pub name: String,
    /// City served.
    pub city: String,
    /// Country.
    pub country: String,
}

impl Airport {
    /// Build a record from its four fields.
    pub fn new(
        iata: impl Into<String>,
        name: impl Into<String>,
        city: impl Into<String>,
        country: impl Into<String>,
    ) -> Self {
        Self {
            iata: iata.into(),
            name: name.into(),
            city: city.into(),
            country: country.into(),
        }
    }

    fn matches(&self, pattern: &Regex) -> bool {
        pattern.is_match(&self.iata)
            || pattern.is_match(&self.name)
            || pattern.is_match(&self.city)
            || pattern.is_match(&self.country)
    }
}

/// Error loading a directory.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum DirectoryError {
    /// The data file could not be read.
    #[error("could not read airport data: {0}")]
    Io(#[from] std::io::Error),
    /// The data is not a JSON array of airports.
    #[error("invalid airport data: {0}")]
    Parse(#[from] serde_json::Error),
}

/// An in-memory airport directory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Directory {
    airports: Vec<Airport>,
}

impl Directory {
    /// Wrap an already loaded list, keeping its order.
    pub const fn new(airports: Vec<Airport>) -> Self {
        Self { airports }
    }

    /// Parse a JSON array of airports.
    pub fn from_json(bytes: &[u8]) -> Result<Self, DirectoryError> {
        let airports: Vec<Airport> = serde_json::from_slice(bytes)?;
        Ok(Self::new(airports))
    }

    /// Read and parse the JSON file at `path`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, DirectoryError> {
        let path = path.as_ref();
        let bytes = std::fs::read(path)?;
        let directory = Self::from_json(&bytes)?;
        debug!(path = %path.display(), airports = directory.len(), "airport directory loaded");
        Ok(directory)
    }

    /// Every airport, in file order.
    #[inline]
    pub fn all(&self) -> &[Airport] {
        &self.airports
    }

    /// Number of airports.
    #[inline]
    pub fn len(&self) -> usize {
        self.airports.len()
    }

    /// Whether the directory holds no airports.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.airports.is_empty()
    }

    /// Look up an airport by IATA code, ignoring case.
    pub fn find_by_iata(&self, code: &str) -> Option<&Airport> {
        let code = code.to_uppercase();
        self.airports.iter().find(|airport| airport.iata == code)
    }

    /// Airports with any field matching `query`, in file order.
    ///
    /// `query` is a case-insensitive regular expression. Text that does not
    /// compile as one is matched literally. An empty query matches everything.
    pub fn search(&self, query: &str) -> Vec<&Airport> {
        let Some(pattern) = compile(query) else {
            return Vec::new();
        };
        self.airports
            .iter()
            .filter(|airport| airport.matches(&pattern))
            .collect()
    }

    /// One page of [`search`](Self::search) results.
    ///
    /// Pages past the end are empty. A zero `page_size` is treated as one.
    pub fn page(&self, query: &str, page: usize, page_size: usize) -> Vec<&Airport> {
        let size = page_size.max(1);
        self.search(query)
            .into_iter()
            .skip(page.saturating_mul(size))
            .take(size)
            .collect()
    }
}

impl From<Vec<Airport>> for Directory {
    fn from(airports: Vec<Airport>) -> Self {
        Self::new(airports)
    }
}

/// Compile `query` as a case-insensitive pattern, falling back to a literal.
fn compile(query: &str) -> Option<Regex> {
    let build = |source: &str| RegexBuilder::new(source).case_insensitive(true).build();
    match build(query) {
        Ok(pattern) => Some(pattern),
        Err(err) => {
            debug!(query, error = %err, "query is not a valid pattern, matching literally");
            match build(&regex::escape(query)) {
                Ok(pattern) => Some(pattern),
                Err(err) => {
                    warn!(error = %err, "query cannot be compiled");
                    None
                },
            }
        },
    }
}
