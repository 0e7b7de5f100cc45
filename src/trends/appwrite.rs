//! Appwrite Databases REST client
//!
//! Talks to a single collection whose documents have the attributes
//! `searchTerm` (string), `count` (integer), `movie_id` (integer) and
//! `poster_url` (url).

use reqwest::blocking::{Client, RequestBuilder, Response};
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;

use super::{poster_url, SearchRecord, TrendStore};
use crate::catalog::Movie;
use crate::config::StoreConfig;
use crate::error::{MovieFinderError, Result};

/// Document list envelope
#[derive(Debug, Deserialize)]
struct DocumentList {
    #[serde(default)]
    documents: Vec<SearchRecord>,
}

/// Appwrite error envelope
#[derive(Debug, Deserialize)]
struct ApiError {
    message: String,
}

/// Query builders, in Appwrite's JSON query syntax
mod query {
    use serde_json::json;

    pub fn equal(attribute: &str, value: &str) -> String {
        json!({"method": "equal", "attribute": attribute, "values": [value]}).to_string()
    }

    pub fn order_desc(attribute: &str) -> String {
        json!({"method": "orderDesc", "attribute": attribute}).to_string()
    }

    pub fn limit(n: usize) -> String {
        json!({"method": "limit", "values": [n]}).to_string()
    }
}

/// Trend store backed by an Appwrite collection
pub struct AppwriteStore {
    client: Client,
    config: StoreConfig,
}

impl AppwriteStore {
    pub fn new(config: &StoreConfig, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| MovieFinderError::Store(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            config: config.clone(),
        })
    }

    fn documents_url(&self) -> Result<String> {
        let database = self
            .config
            .database_id
            .as_deref()
            .ok_or(MovieFinderError::NotConfigured("APPWRITE_DATABASE_ID"))?;
        let collection = self
            .config
            .collection_id
            .as_deref()
            .ok_or(MovieFinderError::NotConfigured("APPWRITE_COLLECTION_ID"))?;

        Ok(format!(
            "{}/databases/{}/collections/{}/documents",
            self.config.endpoint.trim_end_matches('/'),
            database,
            collection
        ))
    }

    fn authorize(&self, request: RequestBuilder) -> Result<RequestBuilder> {
        let project = self
            .config
            .project_id
            .as_deref()
            .ok_or(MovieFinderError::NotConfigured("APPWRITE_PROJECT_ID"))?;

        let mut request = request.header("X-Appwrite-Project", project);
        if let Some(key) = self.config.api_key.as_deref() {
            request = request.header("X-Appwrite-Key", key);
        }
        Ok(request)
    }

    fn send(&self, request: RequestBuilder, operation: &str) -> Result<Response> {
        let response = self
            .authorize(request)?
            .send()
            .map_err(|e| MovieFinderError::Store(format!("{} failed: {}", operation, e)))?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().unwrap_or_default();
        let detail = serde_json::from_str::<ApiError>(&body)
            .map(|e| e.message)
            .unwrap_or(body);
        Err(MovieFinderError::Store(format!(
            "{} returned HTTP {}: {}",
            operation,
            status.as_u16(),
            detail
        )))
    }

    fn list(&self, queries: &[String], operation: &str) -> Result<Vec<SearchRecord>> {
        let params: Vec<(&str, &str)> = queries.iter().map(|q| ("queries[]", q.as_str())).collect();
        let request = self.client.get(self.documents_url()?).query(&params);

        let list: DocumentList = self
            .send(request, operation)?
            .json()
            .map_err(|e| MovieFinderError::Store(format!("{}: malformed response: {}", operation, e)))?;
        Ok(list.documents)
    }

    fn find_by_term(&self, term: &str) -> Result<Option<SearchRecord>> {
        let documents = self.list(&[query::equal("searchTerm", term)], "find search term")?;
        Ok(documents.into_iter().next())
    }

    fn set_count(&self, id: &str, count: u64) -> Result<()> {
        let url = format!("{}/{}", self.documents_url()?, id);
        let request = self
            .client
            .patch(url)
            .json(&json!({ "data": { "count": count } }));
        self.send(request, "update search count")?;
        Ok(())
    }

    fn create(&self, term: &str, movie: &Movie) -> Result<()> {
        let mut data = json!({
            "searchTerm": term,
            "count": 1,
            "movie_id": movie.id,
        });
        if let Some(path) = movie.poster_path.as_deref() {
            data["poster_url"] = json!(poster_url(path));
        }

        let request = self
            .client
            .post(self.documents_url()?)
            .json(&json!({ "documentId": "unique()", "data": data }));
        self.send(request, "create search record")?;
        Ok(())
    }
}

impl TrendStore for AppwriteStore {
    fn record_search(&self, term: &str, movie: Option<&Movie>) -> Result<()> {
        // Read-then-write; not atomic across clients
        match (self.find_by_term(term)?, movie) {
            (Some(existing), _) => {
                log::debug!(
                    "Incrementing {:?} ({}) to {}",
                    term,
                    existing.id,
                    existing.count + 1
                );
                self.set_count(&existing.id, existing.count + 1)
            }
            (None, Some(movie)) => {
                log::debug!("Creating search record for {:?}", term);
                self.create(term, movie)
            }
            (None, None) => {
                log::debug!("No record for {:?} and no movie to create one", term);
                Ok(())
            }
        }
    }

    fn trending(&self, limit: usize) -> Result<Vec<SearchRecord>> {
        self.list(
            &[query::limit(limit), query::order_desc("count")],
            "fetch trending",
        )
        .map_err(|e| match e {
            MovieFinderError::Store(detail) => MovieFinderError::Store(format!(
                "Failed to fetch the top trending movies: {}",
                detail
            )),
            other => other,
        })
    }
}
