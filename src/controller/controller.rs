//! Search State Controller
//!
//! Owns the debounce timer and every state transition. Network work runs on
//! short-lived worker threads that report back over a channel; the owner
//! drains it from its event loop via [`SearchController::tick`].

use crossbeam_channel::{unbounded, Receiver, Sender};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use super::debounce::Debouncer;
use super::state::{Phase, SearchState};
use crate::catalog::{Catalog, Movie};
use crate::config::{Config, TrackingPolicy};
use crate::error::{MovieFinderError, Result};
use crate::trends::{SearchRecord, TrendStore};

/// Messages from worker threads
pub enum BgMessage {
    FetchComplete {
        generation: u64,
        query: String,
        outcome: Result<Vec<Movie>>,
    },
    TrendingLoaded(Result<Vec<SearchRecord>>),
    /// A worker ended without reporting, e.g. it panicked. Fetch workers
    /// carry their generation.
    WorkerLost { generation: Option<u64> },
}

/// Moved into each worker. Dropping it without `deliver` reports the worker
/// as lost, so the in-flight count never leaks.
struct WorkerGuard {
    tx: Sender<BgMessage>,
    generation: Option<u64>,
    delivered: bool,
}

impl WorkerGuard {
    fn new(tx: Sender<BgMessage>, generation: Option<u64>) -> Self {
        Self {
            tx,
            generation,
            delivered: false,
        }
    }

    fn deliver(mut self, msg: BgMessage) {
        self.delivered = true;
        let _ = self.tx.send(msg);
    }
}

impl Drop for WorkerGuard {
    fn drop(&mut self) {
        if !self.delivered {
            let _ = self.tx.send(BgMessage::WorkerLost {
                generation: self.generation,
            });
        }
    }
}

pub struct SearchController {
    catalog: Arc<dyn Catalog>,
    store: Arc<dyn TrendStore>,
    tracking: TrackingPolicy,
    trending_limit: usize,

    debounce: Debouncer<String>,
    state: SearchState,

    /// Bumped for every fetch; completions from older fetches are dropped
    generation: u64,
    in_flight: usize,
    mounted: bool,

    bg_sender: Sender<BgMessage>,
    bg_receiver: Receiver<BgMessage>,
}

impl SearchController {
    pub fn new(catalog: Arc<dyn Catalog>, store: Arc<dyn TrendStore>, config: &Config) -> Self {
        let (bg_sender, bg_receiver) = unbounded();
        Self {
            catalog,
            store,
            tracking: config.tracking,
            trending_limit: config.trending_limit,
            debounce: Debouncer::new(config.debounce),
            state: SearchState::default(),
            generation: 0,
            in_flight: 0,
            mounted: false,
            bg_sender,
            bg_receiver,
        }
    }

    pub fn state(&self) -> &SearchState {
        &self.state
    }

    /// Any worker still running, stale ones included
    pub fn is_busy(&self) -> bool {
        self.in_flight > 0
    }

    pub fn debounce_pending(&self) -> bool {
        self.debounce.is_pending()
    }

    /// Time left before the pending input settles
    pub fn time_until_settle(&self, now: Instant) -> Option<Duration> {
        self.debounce.time_until_ready(now)
    }

    /// Initial load: popular movies and the trending list. Runs once.
    pub fn mount(&mut self) {
        if self.mounted {
            return;
        }
        self.mounted = true;
        log::info!("Mounting search controller");
        self.settle(String::new());
        self.reload_trending();
    }

    /// Raw text changed. Restarts the quiet period.
    pub fn on_input(&mut self, text: impl Into<String>, now: Instant) {
        let text = text.into();
        self.state.raw = text.clone();
        self.debounce.schedule(text, now);
    }

    /// Advance the clock and apply finished work. Returns true when visible
    /// state may have changed.
    pub fn tick(&mut self, now: Instant) -> bool {
        let mut changed = false;
        if let Some(query) = self.debounce.poll(now) {
            changed |= self.settle(query);
        }
        changed |= self.process_messages();
        changed
    }

    /// Commit a settled query. Only a change of value starts a fetch.
    fn settle(&mut self, query: String) -> bool {
        if self.state.settled.as_deref() == Some(query.as_str()) {
            return false;
        }
        log::debug!("Settled query: {:?}", query);
        self.state.settled = Some(query.clone());
        self.start_fetch(query);
        true
    }

    fn start_fetch(&mut self, query: String) {
        self.generation += 1;
        let generation = self.generation;

        self.state.phase = Phase::Loading;
        self.state.error_message = None;

        let catalog = self.catalog.clone();
        let store = self.store.clone();
        let tracking = self.tracking;
        let guard = WorkerGuard::new(self.bg_sender.clone(), Some(generation));
        let thread_query = query.clone();

        let spawned = thread::Builder::new()
            .name(format!("fetch-{}", generation))
            .spawn(move || {
                let outcome = run_fetch(catalog.as_ref(), store.as_ref(), tracking, &thread_query);
                guard.deliver(BgMessage::FetchComplete {
                    generation,
                    query: thread_query,
                    outcome,
                });
            });

        // A closure that never ran still drops its guard and reports lost
        self.in_flight += 1;
        if let Err(e) = spawned {
            log::error!("Could not start fetch for {:?}: {}", query, e);
        }
    }

    /// Load the trending list in the background. Failures leave it as is.
    pub fn reload_trending(&mut self) {
        let store = self.store.clone();
        let limit = self.trending_limit;
        let guard = WorkerGuard::new(self.bg_sender.clone(), None);

        let spawned = thread::Builder::new()
            .name("trending".to_string())
            .spawn(move || {
                guard.deliver(BgMessage::TrendingLoaded(store.trending(limit)));
            });

        self.in_flight += 1;
        if let Err(e) = spawned {
            log::error!("Error in fetching the trending movies: {}", e);
        }
    }

    /// Drain worker messages. Returns true if anything was applied.
    pub fn process_messages(&mut self) -> bool {
        let mut changed = false;

        while let Ok(msg) = self.bg_receiver.try_recv() {
            self.in_flight = self.in_flight.saturating_sub(1);

            match msg {
                BgMessage::FetchComplete {
                    generation,
                    query,
                    outcome,
                } => {
                    if generation != self.generation {
                        log::debug!(
                            "Dropping stale results for {:?} (generation {} < {})",
                            query,
                            generation,
                            self.generation
                        );
                        continue;
                    }
                    self.apply_fetch(outcome);
                    changed = true;
                }
                BgMessage::TrendingLoaded(Ok(records)) => {
                    log::info!("Loaded {} trending records", records.len());
                    self.state.trending = records;
                    changed = true;
                }
                BgMessage::TrendingLoaded(Err(e)) => {
                    log::error!("Error in fetching the trending movies: {}", e);
                }
                BgMessage::WorkerLost {
                    generation: Some(generation),
                } if generation == self.generation => {
                    self.apply_fetch(Err(MovieFinderError::Network(
                        "fetch worker ended without a result".to_string(),
                    )));
                    changed = true;
                }
                BgMessage::WorkerLost { generation } => {
                    log::warn!("Worker ended without a result (generation {:?})", generation);
                }
            }
        }

        changed
    }

    fn apply_fetch(&mut self, outcome: Result<Vec<Movie>>) {
        match outcome {
            Ok(movies) => {
                self.state.movies = movies;
                self.state.error_message = None;
                self.state.phase = Phase::Success;
            }
            Err(e) => {
                log::error!("Error fetching movies: {}", e);
                if e.is_provider() {
                    self.state.movies.clear();
                }
                self.state.error_message = Some(e.user_message());
                self.state.phase = Phase::Failure;
            }
        }
    }
}

/// One fetch attempt, including its search tracking.
///
/// Tracking failures are logged and never affect the outcome.
pub fn run_fetch(
    catalog: &dyn Catalog,
    store: &dyn TrendStore,
    tracking: TrackingPolicy,
    query: &str,
) -> Result<Vec<Movie>> {
    if tracking.records_attempts() {
        if let Err(e) = store.record_search(query, None) {
            log::warn!("Error updating search count: {}", e);
        }
    }

    let outcome = catalog.fetch_movies(query);

    if let Ok(movies) = &outcome {
        if let (false, Some(first)) = (query.is_empty(), movies.first()) {
            if let Err(e) = store.record_search(query, Some(first)) {
                log::error!("Error updating search count: {}", e);
            }
        }
    }

    outcome
}
