//! Error types for MovieFinder
//!
//! One taxonomy shared by the catalog client, the trend store and the UI.

use thiserror::Error;

/// Message shown to the user for any failure that is not a provider-level one.
pub const GENERIC_FETCH_ERROR: &str = "Error fetching movies. Please try again later";

/// Main error type for MovieFinder operations
#[derive(Error, Debug)]
pub enum MovieFinderError {
    /// Transport failure, non-success HTTP status or undecodable body
    #[error("Network error: {0}")]
    Network(String),

    /// Well-formed catalog response that signals a logical failure
    #[error("Provider error: {0}")]
    Provider(String),

    /// Any failure coming from the trend store
    #[error("Trend store error: {0}")]
    Store(String),

    #[error("Missing configuration: {0}")]
    NotConfigured(&'static str),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Terminal error: {0}")]
    Terminal(String),
}

/// Result type alias for MovieFinder operations
pub type Result<T> = std::result::Result<T, MovieFinderError>;

impl MovieFinderError {
    /// Text for the inline error slot.
    ///
    /// Provider failures surface the provider's own message; everything else
    /// collapses to a generic retry suggestion.
    pub fn user_message(&self) -> String {
        match self {
            MovieFinderError::Provider(message) => message.clone(),
            _ => GENERIC_FETCH_ERROR.to_string(),
        }
    }

    /// Provider failures clear the result list instead of hiding it
    pub fn is_provider(&self) -> bool {
        matches!(self, MovieFinderError::Provider(_))
    }
}

impl From<reqwest::Error> for MovieFinderError {
    fn from(e: reqwest::Error) -> Self {
        MovieFinderError::Network(e.to_string())
    }
}
