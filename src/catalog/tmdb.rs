//! TMDB (The Movie Database) catalog client
//!
//! Blocking client: calls are made from worker threads, never from the
//! UI loop.

use reqwest::blocking::Client;
use reqwest::header::{ACCEPT, AUTHORIZATION};
use std::time::Duration;

use super::types::{interpret_response, Movie};
use super::{Catalog, CatalogRequest};
use crate::config::CatalogConfig;
use crate::error::{MovieFinderError, Result};

/// TMDB API client authenticated with a v4 bearer token
pub struct TmdbClient {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl TmdbClient {
    /// Build the client. A missing API key is accepted here and reported on
    /// the first fetch instead.
    pub fn new(config: &CatalogConfig, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| MovieFinderError::Network(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
        })
    }

    pub fn url_for(&self, request: CatalogRequest<'_>) -> String {
        format!("{}{}", self.base_url, request.path_and_query())
    }
}

impl Catalog for TmdbClient {
    fn fetch_movies(&self, query: &str) -> Result<Vec<Movie>> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(MovieFinderError::NotConfigured("TMDB_API_KEY"))?;

        let request = CatalogRequest::for_query(query);
        let url = self.url_for(request);
        log::debug!("Catalog request: {:?}", request);

        let response = self
            .client
            .get(&url)
            .header(ACCEPT, "application/json")
            .header(AUTHORIZATION, format!("Bearer {}", api_key))
            .send()?;

        let status = response.status().as_u16();
        let body = response.text()?;

        let result = interpret_response(status, &body);
        match &result {
            Ok(movies) => log::debug!("Catalog returned {} movies for {:?}", movies.len(), query),
            Err(e) => log::warn!("Catalog request for {:?} failed: {}", query, e),
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::StubServer;

    fn client_for(server: &StubServer, api_key: Option<&str>) -> TmdbClient {
        let config = CatalogConfig {
            base_url: server.base_url.clone(),
            api_key: api_key.map(str::to_string),
        };
        TmdbClient::new(&config, Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn discover_request_shape() {
        let server = StubServer::start(vec![(
            200,
            r#"{"results": [{"id": 1, "title": "Heat"}]}"#.to_string(),
        )]);
        let client = client_for(&server, Some("token-123"));

        let movies = client.fetch_movies("").unwrap();
        assert_eq!(movies.len(), 1);

        let requests = server.finish();
        assert_eq!(requests.len(), 1);
        let request = &requests[0];
        assert_eq!(request.method, "GET");
        assert_eq!(request.path(), "/discover/movie");
        assert_eq!(request.query_values("sort_by"), vec!["popularity.desc"]);
        assert_eq!(request.query_values("include_adult"), vec!["false"]);
        assert_eq!(request.query_values("language"), vec!["en-US"]);
        assert_eq!(request.header("authorization"), Some("Bearer token-123"));
        assert_eq!(request.header("accept"), Some("application/json"));
    }

    #[test]
    fn search_request_encodes_query() {
        let server = StubServer::start(vec![(200, r#"{"results": []}"#.to_string())]);
        let client = client_for(&server, Some("token"));

        let movies = client.fetch_movies("the dark knight").unwrap();
        assert!(movies.is_empty());

        let requests = server.finish();
        assert_eq!(requests[0].target, "/search/movie?query=the%20dark%20knight");
        assert_eq!(requests[0].query_values("query"), vec!["the dark knight"]);
    }

    #[test]
    fn http_error_is_network_error() {
        let server = StubServer::start(vec![(
            401,
            r#"{"status_code": 7, "status_message": "Invalid API key"}"#.to_string(),
        )]);
        let client = client_for(&server, Some("bad"));

        let result = client.fetch_movies("batman");
        server.finish();
        assert!(matches!(result, Err(MovieFinderError::Network(_))));
    }

    #[test]
    fn provider_flag_is_provider_error() {
        let server = StubServer::start(vec![(
            200,
            r#"{"Response": "False", "Error": "Movie not found!"}"#.to_string(),
        )]);
        let client = client_for(&server, Some("token"));

        let result = client.fetch_movies("zzzz");
        server.finish();
        match result {
            Err(MovieFinderError::Provider(message)) => assert_eq!(message, "Movie not found!"),
            other => panic!("expected provider error, got {:?}", other),
        }
    }

    #[test]
    fn missing_key_fails_without_request() {
        let config = CatalogConfig {
            base_url: "http://127.0.0.1:9".to_string(),
            api_key: None,
        };
        let client = TmdbClient::new(&config, Duration::from_secs(1)).unwrap();
        assert!(matches!(
            client.fetch_movies("batman"),
            Err(MovieFinderError::NotConfigured("TMDB_API_KEY"))
        ));
    }

    #[test]
    fn trailing_slash_in_base_is_trimmed() {
        let config = CatalogConfig {
            base_url: "https://api.themoviedb.org/3/".to_string(),
            api_key: None,
        };
        let client = TmdbClient::new(&config, Duration::from_secs(1)).unwrap();
        assert_eq!(
            client.url_for(CatalogRequest::Search("up")),
            "https://api.themoviedb.org/3/search/movie?query=up"
        );
    }
}
