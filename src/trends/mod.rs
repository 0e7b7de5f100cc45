//! Search-count tracking and the trending list
//!
//! ## Submodules
//! - **`appwrite`**: REST client for a hosted Appwrite collection.
//! - **`memory`**: process-local store, used with `--local-trends` and in tests.
//!
//! Both follow the same find-then-increment-or-create protocol. The hosted one
//! does it in separate requests, so two concurrent recordings of a new term
//! can both create a record.

pub mod appwrite;
pub mod memory;

pub use appwrite::AppwriteStore;
pub use memory::MemoryStore;

use serde::{Deserialize, Serialize};

use crate::catalog::Movie;
use crate::error::Result;

/// Poster CDN prefix used when a record is first created
pub const POSTER_BASE_URL: &str = "https://image.tmdb.org/t/p/w500";

/// One aggregated search term
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchRecord {
    #[serde(rename = "$id")]
    pub id: String,
    #[serde(rename = "searchTerm")]
    pub search_term: String,
    pub count: u64,
    #[serde(default)]
    pub movie_id: Option<u64>,
    #[serde(default)]
    pub poster_url: Option<String>,
}

impl SearchRecord {
    /// TMDB page of the movie that first matched this term
    pub fn movie_page_url(&self) -> Option<String> {
        self.movie_id.map(crate::catalog::types::page_url)
    }
}

/// Persistent search counters
pub trait TrendStore: Send + Sync {
    /// Increment the record for `term`, or create it with `count = 1`.
    ///
    /// Creation needs a representative movie; with `None` an unknown term is
    /// left alone.
    fn record_search(&self, term: &str, movie: Option<&Movie>) -> Result<()>;

    /// Up to `limit` records, highest count first
    fn trending(&self, limit: usize) -> Result<Vec<SearchRecord>>;
}

/// Absolute poster URL for a catalog poster path
pub fn poster_url(poster_path: &str) -> String {
    if poster_path.starts_with('/') {
        format!("{}{}", POSTER_BASE_URL, poster_path)
    } else {
        format!("{}/{}", POSTER_BASE_URL, poster_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn poster_url_joins_with_single_slash() {
        assert_eq!(
            poster_url("/abc.jpg"),
            "https://image.tmdb.org/t/p/w500/abc.jpg"
        );
        assert_eq!(
            poster_url("abc.jpg"),
            "https://image.tmdb.org/t/p/w500/abc.jpg"
        );
    }

    #[test]
    fn record_deserializes_from_document() {
        let doc = r#"{
            "$id": "65f0c1",
            "$collectionId": "metrics",
            "$createdAt": "2024-03-12T10:00:00.000+00:00",
            "searchTerm": "batman",
            "count": 4,
            "movie_id": 268,
            "poster_url": "https://image.tmdb.org/t/p/w500/cij4.jpg"
        }"#;
        let record: SearchRecord = serde_json::from_str(doc).unwrap();
        assert_eq!(record.id, "65f0c1");
        assert_eq!(record.search_term, "batman");
        assert_eq!(record.count, 4);
        assert_eq!(record.movie_id, Some(268));
        assert_eq!(
            record.movie_page_url().as_deref(),
            Some("https://www.themoviedb.org/movie/268")
        );
    }
}
