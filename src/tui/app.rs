use crate::catalog::Movie;
use crate::controller::SearchController;
use crate::tui::search::SearchInput;
use crate::tui::table::{sorted_indices, SortColumn, TableState};
use crate::tui::ui;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use std::io::Stdout;
use std::time::{Duration, Instant};

pub struct App {
    pub controller: SearchController,

    // Sub-states
    pub search: SearchInput,
    pub table: TableState,

    /// Grid row order as indices into the visible movies
    pub order: Vec<usize>,
    shown_ids: Vec<u64>,

    pub status_message: String,
    pub should_quit: bool,
}

impl App {
    pub fn new(controller: SearchController) -> Self {
        Self {
            controller,
            search: SearchInput::default(),
            table: TableState::default(),
            order: Vec::new(),
            shown_ids: Vec::new(),
            status_message: String::new(),
            should_quit: false,
        }
    }

    pub fn run(&mut self, terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> crate::Result<()> {
        let tick_rate = Duration::from_millis(50);
        let mut last_tick = Instant::now();

        self.controller.mount();

        loop {
            terminal.draw(|frame| ui::draw(frame, self))?;

            let now = Instant::now();
            let timeout = poll_timeout(
                tick_rate.saturating_sub(now.duration_since(last_tick)),
                self.controller.time_until_settle(now),
            );
            if event::poll(timeout)? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key(key);
                    }
                }
            }

            let settle_due =
                self.controller.time_until_settle(Instant::now()) == Some(Duration::ZERO);
            if settle_due || last_tick.elapsed() >= tick_rate {
                self.on_tick(Instant::now());
                last_tick = Instant::now();
            }

            if self.should_quit {
                return Ok(());
            }
        }
    }

    pub fn on_tick(&mut self, now: Instant) {
        if self.controller.tick(now) {
            self.refresh_order();
        }
    }

    pub fn visible_movies(&self) -> &[Movie] {
        self.controller.state().visible_movies()
    }

    /// Movie under the grid cursor
    pub fn selected_movie(&self) -> Option<&Movie> {
        let row = self.table.selected?;
        let index = *self.order.get(row)?;
        self.visible_movies().get(index)
    }

    /// Title and links for the movie under the grid cursor
    pub fn selection_summary(&self) -> Option<String> {
        if self.search.focused {
            return None;
        }
        let movie = self.selected_movie()?;
        let mut summary = format!("{} | {}", movie.title, movie.page_url());
        if let Some(poster) = movie.poster_url() {
            summary.push_str(" | poster ");
            summary.push_str(&poster);
        }
        Some(summary)
    }

    /// Recompute the grid order. A different result set moves the cursor
    /// back to the top.
    fn refresh_order(&mut self) {
        let movies = self.controller.state().visible_movies();
        let ids: Vec<u64> = movies.iter().map(|m| m.id).collect();
        self.order = sorted_indices(movies, self.table.sort_column, self.table.sort_order);

        if ids != self.shown_ids {
            self.table.reset(ids.len());
            self.shown_ids = ids;
        }
    }

    fn handle_sort_key(&mut self, column: SortColumn) {
        self.table.set_sort(column);
        let selected_id = self.selected_movie().map(|m| m.id);
        self.order = sorted_indices(
            self.visible_movies(),
            self.table.sort_column,
            self.table.sort_order,
        );
        // Keep the cursor on the same movie
        if let Some(id) = selected_id {
            let movies = self.controller.state().visible_movies();
            self.table.selected = self.order.iter().position(|&i| movies[i].id == id);
        }
    }

    fn query_changed(&mut self) {
        self.status_message.clear();
        self.controller
            .on_input(self.search.query.clone(), Instant::now());
    }

    fn open_selected(&mut self) {
        let Some(movie) = self.selected_movie() else {
            return;
        };
        let url = movie.page_url();
        let title = movie.title.clone();

        match open::that(&url) {
            Ok(()) => {
                log::info!("Opened {} for {:?}", url, title);
                self.status_message = format!("Opened {}", title);
            }
            Err(e) => {
                log::error!("Could not open {}: {}", url, e);
                self.status_message = format!("Could not open browser: {}", e);
            }
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.should_quit = true;
                return;
            }
            KeyCode::Char('q') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.should_quit = true;
                return;
            }
            KeyCode::Char('r') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.controller.reload_trending();
                self.status_message = "Reloading trending searches".to_string();
                return;
            }
            KeyCode::Esc => {
                if !self.search.focused {
                    self.search.focused = true;
                } else if self.search.clear() {
                    self.query_changed();
                } else {
                    self.should_quit = true;
                }
                return;
            }
            _ => {}
        }

        if self.search.focused {
            self.handle_search_key(key);
        } else {
            self.handle_table_key(key);
        }
    }

    fn handle_search_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.search.insert(c);
                self.query_changed();
            }
            KeyCode::Backspace => {
                if self.search.backspace() {
                    self.query_changed();
                }
            }
            KeyCode::Delete => {
                if self.search.delete() {
                    self.query_changed();
                }
            }
            KeyCode::Left => self.search.move_left(),
            KeyCode::Right => self.search.move_right(),
            KeyCode::Home => self.search.home(),
            KeyCode::End => self.search.end(),
            KeyCode::Tab | KeyCode::Down | KeyCode::Enter => {
                if !self.order.is_empty() {
                    self.search.focused = false;
                    if self.table.selected.is_none() {
                        self.table.reset(self.order.len());
                    }
                }
            }
            _ => {}
        }
    }

    fn handle_table_key(&mut self, key: KeyEvent) {
        let total = self.order.len();
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => self.table.select_prev(),
            KeyCode::Down | KeyCode::Char('j') => self.table.select_next(total),
            KeyCode::PageUp => self.table.page_up(),
            KeyCode::PageDown => self.table.page_down(total),
            KeyCode::Home => self.table.select_first(),
            KeyCode::End => self.table.select_last(total),
            KeyCode::Enter => self.open_selected(),
            KeyCode::Tab | KeyCode::Char('/') => {
                self.search.focused = true;
            }
            KeyCode::F(1) => self.handle_sort_key(SortColumn::Title),
            KeyCode::F(2) => self.handle_sort_key(SortColumn::Rating),
            KeyCode::F(3) => self.handle_sort_key(SortColumn::Year),
            KeyCode::F(4) => self.handle_sort_key(SortColumn::Relevance),
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                // Typing from the grid goes to the search box
                self.search.focused = true;
                self.search.end();
                self.search.insert(c);
                self.query_changed();
            }
            _ => {}
        }
    }
}

/// Wait for input until the next tick, or sooner if a debounce is about to fire
fn poll_timeout(until_tick: Duration, until_settle: Option<Duration>) -> Duration {
    match until_settle {
        Some(settle) => until_tick.min(settle),
        None => until_tick,
    }
}
