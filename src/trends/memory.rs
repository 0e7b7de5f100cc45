//! In-process trend store

use parking_lot::Mutex;

use super::{poster_url, SearchRecord, TrendStore};
use crate::catalog::Movie;
use crate::error::Result;

/// Trend store kept in memory for the life of the process.
///
/// Records are kept in insertion order, which is also the tie-break order
/// for equal counts.
#[derive(Default)]
pub struct MemoryStore {
    records: Mutex<Vec<SearchRecord>>,
    next_id: Mutex<u64>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the store with existing records
    pub fn with_records(records: Vec<SearchRecord>) -> Self {
        let next_id = records.len() as u64;
        Self {
            records: Mutex::new(records),
            next_id: Mutex::new(next_id),
        }
    }

    pub fn snapshot(&self) -> Vec<SearchRecord> {
        self.records.lock().clone()
    }

    fn allocate_id(&self) -> String {
        let mut next = self.next_id.lock();
        *next += 1;
        format!("local-{}", *next)
    }
}

impl TrendStore for MemoryStore {
    fn record_search(&self, term: &str, movie: Option<&Movie>) -> Result<()> {
        let mut records = self.records.lock();

        if let Some(existing) = records.iter_mut().find(|r| r.search_term == term) {
            existing.count += 1;
            log::debug!("Search count for {:?} is now {}", term, existing.count);
            return Ok(());
        }

        let Some(movie) = movie else {
            log::debug!("No record for {:?} and no movie to create one", term);
            return Ok(());
        };

        let id = self.allocate_id();
        records.push(SearchRecord {
            id,
            search_term: term.to_string(),
            count: 1,
            movie_id: Some(movie.id),
            poster_url: movie.poster_path.as_deref().map(poster_url),
        });
        Ok(())
    }

    fn trending(&self, limit: usize) -> Result<Vec<SearchRecord>> {
        let mut records = self.snapshot();
        // Stable sort keeps insertion order among equal counts
        records.sort_by(|a, b| b.count.cmp(&a.count));
        records.truncate(limit);
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str, term: &str, count: u64) -> SearchRecord {
        SearchRecord {
            id: id.to_string(),
            search_term: term.to_string(),
            count,
            movie_id: None,
            poster_url: None,
        }
    }

    #[test]
    fn first_search_creates_record() {
        let store = MemoryStore::new();
        let movie = Movie::new(268, "Batman").with_poster("/cij4.jpg");

        store.record_search("batman", Some(&movie)).unwrap();

        let records = store.snapshot();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].search_term, "batman");
        assert_eq!(records[0].count, 1);
        assert_eq!(records[0].movie_id, Some(268));
        assert_eq!(
            records[0].poster_url.as_deref(),
            Some("https://image.tmdb.org/t/p/w500/cij4.jpg")
        );
    }

    #[test]
    fn sequential_searches_increment() {
        let store = MemoryStore::new();
        let movie = Movie::new(268, "Batman");

        store.record_search("batman", Some(&movie)).unwrap();
        store.record_search("batman", Some(&movie)).unwrap();

        let records = store.snapshot();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].count, 2);
    }

    #[test]
    fn terms_are_case_sensitive() {
        let store = MemoryStore::new();
        let movie = Movie::new(268, "Batman");

        store.record_search("batman", Some(&movie)).unwrap();
        store.record_search("Batman", Some(&movie)).unwrap();

        assert_eq!(store.snapshot().len(), 2);
    }

    #[test]
    fn unknown_term_without_movie_is_ignored() {
        let store = MemoryStore::new();
        store.record_search("", None).unwrap();
        assert!(store.snapshot().is_empty());
    }

    #[test]
    fn known_term_without_movie_increments() {
        let store = MemoryStore::with_records(vec![record("a", "heat", 3)]);
        store.record_search("heat", None).unwrap();
        assert_eq!(store.snapshot()[0].count, 4);
    }

    #[test]
    fn trending_orders_by_count_and_limits() {
        let store = MemoryStore::with_records(vec![
            record("a", "alien", 5),
            record("b", "brazil", 1),
            record("c", "casablanca", 9),
            record("d", "dune", 3),
        ]);

        let top = store.trending(3).unwrap();
        let counts: Vec<u64> = top.iter().map(|r| r.count).collect();
        assert_eq!(counts, vec![9, 5, 3]);
        assert_eq!(top[0].search_term, "casablanca");
    }

    #[test]
    fn trending_ties_keep_insertion_order() {
        let store = MemoryStore::with_records(vec![
            record("a", "first", 2),
            record("b", "second", 2),
            record("c", "third", 7),
        ]);

        let terms: Vec<String> = store
            .trending(5)
            .unwrap()
            .into_iter()
            .map(|r| r.search_term)
            .collect();
        assert_eq!(terms, vec!["third", "first", "second"]);
    }

    #[test]
    fn created_ids_do_not_collide_with_seeded() {
        let store = MemoryStore::with_records(vec![record("local-1", "alien", 1)]);
        store
            .record_search("heat", Some(&Movie::new(1, "Heat")))
            .unwrap();
        let ids: Vec<String> = store.snapshot().into_iter().map(|r| r.id).collect();
        assert_eq!(ids, vec!["local-1", "local-2"]);
    }
}
