//! MovieFinder - terminal movie discovery
//!
//! Search a movie catalog as you type and see which searches are trending.
//!
//! # Features
//!
//! - **Debounced live search**: results follow the search box once typing pauses
//! - **Popular listing**: an empty search shows the catalog's most popular titles
//! - **Trending**: the most-searched terms, counted in a hosted document store
//! - **TUI and CLI**: an interactive terminal UI plus scriptable subcommands
//!
//! # Example
//!
//! ```no_run
//! use moviefinder::{Catalog, Config, TmdbClient};
//!
//! fn main() -> moviefinder::Result<()> {
//!     let config = Config::from_env();
//!     let catalog = TmdbClient::new(&config.catalog, config.http_timeout)?;
//!
//!     for movie in catalog.fetch_movies("the thing")? {
//!         println!("{} ({})", movie.title, movie.year_label());
//!     }
//!
//!     Ok(())
//! }
//! ```

pub mod catalog;
pub mod config;
pub mod controller;
pub mod error;
pub mod logging;
pub mod trends;
pub mod tui;

#[cfg(test)]
mod test_support;

// Re-export main types
pub use catalog::{Catalog, CatalogRequest, Movie, TmdbClient};
pub use config::{Config, TrackingPolicy};
pub use controller::{Phase, ResultsView, SearchController, SearchState};
pub use error::{MovieFinderError, Result};
pub use trends::{AppwriteStore, MemoryStore, SearchRecord, TrendStore};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
