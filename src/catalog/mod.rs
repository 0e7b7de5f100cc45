//! Movie catalog access
//!
//! - **`tmdb`**: blocking HTTP client for the TMDB v3 API
//! - **`types`**: `Movie` and response classification

pub mod tmdb;
pub mod types;

pub use tmdb::TmdbClient;
pub use types::Movie;

use crate::error::Result;

/// Source of movie listings
pub trait Catalog: Send + Sync {
    /// Popular movies for an empty query, title search otherwise
    fn fetch_movies(&self, query: &str) -> Result<Vec<Movie>>;
}

/// Which catalog endpoint a query maps to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogRequest<'a> {
    Discover,
    Search(&'a str),
}

impl<'a> CatalogRequest<'a> {
    pub fn for_query(query: &'a str) -> Self {
        if query.is_empty() {
            CatalogRequest::Discover
        } else {
            CatalogRequest::Search(query)
        }
    }

    /// Path plus query string, relative to the API base
    pub fn path_and_query(&self) -> String {
        match self {
            CatalogRequest::Discover => "/discover/movie?include_adult=false&include_video=false&language=en-US&page=1&sort_by=popularity.desc".to_string(),
            CatalogRequest::Search(query) => {
                format!("/search/movie?query={}", urlencoding::encode(query))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn empty_query_discovers() {
        let request = CatalogRequest::for_query("");
        assert_eq!(request, CatalogRequest::Discover);
        assert_eq!(
            request.path_and_query(),
            "/discover/movie?include_adult=false&include_video=false&language=en-US&page=1&sort_by=popularity.desc"
        );
    }

    #[rstest]
    #[case("batman", "/search/movie?query=batman")]
    #[case("the dark knight", "/search/movie?query=the%20dark%20knight")]
    #[case("amélie", "/search/movie?query=am%C3%A9lie")]
    #[case("fast & furious?", "/search/movie?query=fast%20%26%20furious%3F")]
    fn search_query_is_encoded(#[case] query: &str, #[case] expected: &str) {
        let request = CatalogRequest::for_query(query);
        assert_eq!(request, CatalogRequest::Search(query));
        assert_eq!(request.path_and_query(), expected);
    }

    #[test]
    fn whitespace_query_still_searches() {
        assert_eq!(
            CatalogRequest::for_query(" ").path_and_query(),
            "/search/movie?query=%20"
        );
    }
}
