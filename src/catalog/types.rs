//! Catalog wire types

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::{MovieFinderError, Result};

/// Shown when the provider flags a failure without saying why
const FALLBACK_PROVIDER_MESSAGE: &str = "Error fetching movies. Please try again later";

/// Public TMDB page for a movie id
pub fn page_url(movie_id: u64) -> String {
    format!("https://www.themoviedb.org/movie/{}", movie_id)
}

/// TMDB movie record as returned by search and discover.
///
/// Fields the UI does not read are kept in `extra` so they survive a
/// round trip through `--json` output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Movie {
    pub id: u64,
    #[serde(default)]
    pub title: String,
    /// Relative path, e.g. `/qJ2tW6WMUDux911r6m7haRef0WH.jpg`
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub vote_average: Option<f64>,
    /// `YYYY-MM-DD`, sometimes empty
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub original_language: Option<String>,
    #[serde(default)]
    pub popularity: Option<f64>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Movie {
    pub fn new(id: u64, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            poster_path: None,
            vote_average: None,
            release_date: None,
            original_language: None,
            popularity: None,
            extra: serde_json::Map::new(),
        }
    }

    pub fn with_poster(mut self, path: impl Into<String>) -> Self {
        self.poster_path = Some(path.into());
        self
    }

    pub fn release_year(&self) -> Option<i32> {
        let date = self.release_date.as_deref()?;
        NaiveDate::parse_from_str(date, "%Y-%m-%d")
            .ok()
            .map(|d| d.year())
    }

    /// One decimal place, or "N/A" for unrated titles
    pub fn rating_label(&self) -> String {
        match self.vote_average {
            Some(v) if v > 0.0 => format!("{:.1}", v),
            _ => "N/A".to_string(),
        }
    }

    pub fn language_label(&self) -> String {
        self.original_language
            .as_deref()
            .map(|l| l.to_uppercase())
            .unwrap_or_default()
    }

    pub fn year_label(&self) -> String {
        self.release_year()
            .map(|y| y.to_string())
            .unwrap_or_else(|| "N/A".to_string())
    }

    pub fn page_url(&self) -> String {
        page_url(self.id)
    }

    /// Absolute poster URL, if the movie has a poster
    pub fn poster_url(&self) -> Option<String> {
        self.poster_path.as_deref().map(crate::trends::poster_url)
    }
}

/// Body of both search and discover responses.
///
/// A provider-level failure comes back as `{"Response": "False", "Error": "..."}`
/// instead of a result list.
#[derive(Debug, Deserialize)]
pub(crate) struct CatalogResponse {
    #[serde(default)]
    results: Option<Vec<Movie>>,
    #[serde(rename = "Response", default)]
    response: Option<serde_json::Value>,
    #[serde(rename = "Error", default)]
    error: Option<String>,
}

impl CatalogResponse {
    fn is_failure(&self) -> bool {
        match &self.response {
            Some(serde_json::Value::Bool(b)) => !b,
            Some(serde_json::Value::String(s)) => s == "False",
            _ => false,
        }
    }

    pub(crate) fn into_movies(self) -> Result<Vec<Movie>> {
        if self.is_failure() {
            let message = self
                .error
                .filter(|m| !m.is_empty())
                .unwrap_or_else(|| FALLBACK_PROVIDER_MESSAGE.to_string());
            return Err(MovieFinderError::Provider(message));
        }
        Ok(self.results.unwrap_or_default())
    }
}

/// Classify a raw HTTP exchange.
///
/// Status is checked first: any non-2xx is a network error no matter what
/// the body says.
pub(crate) fn interpret_response(status: u16, body: &str) -> Result<Vec<Movie>> {
    if !(200..300).contains(&status) {
        return Err(MovieFinderError::Network(format!(
            "Network response was not ok (HTTP {})",
            status
        )));
    }

    let parsed: CatalogResponse = serde_json::from_str(body).map_err(|e| {
        MovieFinderError::Network(format!("Malformed catalog response: {}", e))
    })?;

    parsed.into_movies()
}
