//! Render state owned by the controller

use crate::catalog::Movie;
use crate::trends::SearchRecord;

/// Observable phase of the current search
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    Loading,
    Success,
    Failure,
}

impl Phase {
    pub fn label(&self) -> &'static str {
        match self {
            Phase::Idle => "Idle",
            Phase::Loading => "Loading",
            Phase::Success => "Ready",
            Phase::Failure => "Error",
        }
    }
}

/// What the results section shows. Exactly one, in priority order:
/// loading, then error, then the grid.
#[derive(Debug, PartialEq)]
pub enum ResultsView<'a> {
    Nothing,
    Loading,
    Error(&'a str),
    Grid(&'a [Movie]),
}

#[derive(Debug, Default)]
pub struct SearchState {
    /// Text as typed, updated on every keystroke
    pub raw: String,
    /// Last value committed by the debounce timer; `None` before the first
    pub settled: Option<String>,
    pub phase: Phase,
    pub error_message: Option<String>,
    /// Kept across `Loading` until replaced
    pub movies: Vec<Movie>,
    pub trending: Vec<SearchRecord>,
}

impl SearchState {
    pub fn is_loading(&self) -> bool {
        self.phase == Phase::Loading
    }

    pub fn show_trending(&self) -> bool {
        !self.trending.is_empty()
    }

    /// Trending records with their 1-based rank
    pub fn ranked_trending(&self) -> impl Iterator<Item = (usize, &SearchRecord)> {
        self.trending.iter().enumerate().map(|(i, r)| (i + 1, r))
    }

    pub fn results_view(&self) -> ResultsView<'_> {
        match self.phase {
            Phase::Idle => ResultsView::Nothing,
            Phase::Loading => ResultsView::Loading,
            Phase::Failure => ResultsView::Error(
                self.error_message
                    .as_deref()
                    .unwrap_or(crate::error::GENERIC_FETCH_ERROR),
            ),
            Phase::Success => ResultsView::Grid(&self.movies),
        }
    }

    /// Movies currently visible in the grid
    pub fn visible_movies(&self) -> &[Movie] {
        match self.results_view() {
            ResultsView::Grid(movies) => movies,
            _ => &[],
        }
    }
}
