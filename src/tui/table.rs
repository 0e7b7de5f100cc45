use crate::catalog::Movie;
use std::cmp::Ordering;

/// Which column is sorted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortColumn {
    /// Order returned by the catalog
    #[default]
    Relevance,
    Title,
    Rating,
    Year,
}

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Ascending,
    Descending,
}

impl SortOrder {
    pub fn indicator(&self) -> &'static str {
        match self {
            SortOrder::Ascending => " \u{25B2}",
            SortOrder::Descending => " \u{25BC}",
        }
    }

    pub fn toggled(&self) -> Self {
        match self {
            SortOrder::Ascending => SortOrder::Descending,
            SortOrder::Descending => SortOrder::Ascending,
        }
    }
}

/// Result grid display state
pub struct TableState {
    pub selected: Option<usize>,
    pub scroll_offset: usize,
    pub visible_rows: usize,
    pub sort_column: SortColumn,
    pub sort_order: SortOrder,
}

impl Default for TableState {
    fn default() -> Self {
        Self {
            selected: None,
            scroll_offset: 0,
            visible_rows: 20,
            sort_column: SortColumn::Relevance,
            sort_order: SortOrder::Ascending,
        }
    }
}

impl TableState {
    /// Same column flips direction; a new column starts ascending
    pub fn set_sort(&mut self, column: SortColumn) {
        if self.sort_column == column {
            self.sort_order = self.sort_order.toggled();
        } else {
            self.sort_column = column;
            self.sort_order = SortOrder::Ascending;
        }
    }

    /// Select the first row, or nothing if there are no rows
    pub fn reset(&mut self, total: usize) {
        self.selected = if total == 0 { None } else { Some(0) };
        self.scroll_offset = 0;
    }

    pub fn select_next(&mut self, total: usize) {
        if total == 0 {
            return;
        }
        let i = match self.selected {
            Some(i) => (i + 1).min(total - 1),
            None => 0,
        };
        self.selected = Some(i);
        self.ensure_visible(i);
    }

    pub fn select_prev(&mut self) {
        let i = match self.selected {
            Some(0) | None => 0,
            Some(i) => i - 1,
        };
        self.selected = Some(i);
        self.ensure_visible(i);
    }

    pub fn page_down(&mut self, total: usize) {
        if total == 0 {
            return;
        }
        let jump = self.visible_rows.saturating_sub(1);
        let i = match self.selected {
            Some(i) => (i + jump).min(total - 1),
            None => jump.min(total - 1),
        };
        self.selected = Some(i);
        self.ensure_visible(i);
    }

    pub fn page_up(&mut self) {
        let jump = self.visible_rows.saturating_sub(1);
        let i = match self.selected {
            Some(i) => i.saturating_sub(jump),
            None => 0,
        };
        self.selected = Some(i);
        self.ensure_visible(i);
    }

    pub fn select_first(&mut self) {
        self.selected = Some(0);
        self.scroll_offset = 0;
    }

    pub fn select_last(&mut self, total: usize) {
        if total == 0 {
            return;
        }
        self.selected = Some(total - 1);
        self.ensure_visible(total - 1);
    }

    fn ensure_visible(&mut self, index: usize) {
        if index < self.scroll_offset {
            self.scroll_offset = index;
        } else if self.visible_rows > 0 && index >= self.scroll_offset + self.visible_rows {
            self.scroll_offset = index - self.visible_rows + 1;
        }
    }
}

/// Row order for `movies` under the given sort. Unrated and undated titles
/// sort last in ascending order.
pub fn sorted_indices(movies: &[Movie], column: SortColumn, order: SortOrder) -> Vec<usize> {
    let mut indices: Vec<usize> = (0..movies.len()).collect();

    if column == SortColumn::Relevance {
        if order == SortOrder::Descending {
            indices.reverse();
        }
        return indices;
    }

    indices.sort_by(|&a, &b| {
        let ma = &movies[a];
        let mb = &movies[b];

        let cmp = match column {
            SortColumn::Relevance => Ordering::Equal,
            SortColumn::Title => ma.title.to_lowercase().cmp(&mb.title.to_lowercase()),
            SortColumn::Rating => cmp_missing_last(ma.vote_average, mb.vote_average, |x, y| {
                x.partial_cmp(&y).unwrap_or(Ordering::Equal)
            }),
            SortColumn::Year => {
                cmp_missing_last(ma.release_year(), mb.release_year(), |x, y| x.cmp(&y))
            }
        };

        if order == SortOrder::Descending {
            cmp.reverse()
        } else {
            cmp
        }
    });

    indices
}

fn cmp_missing_last<T>(a: Option<T>, b: Option<T>, cmp: impl Fn(T, T) -> Ordering) -> Ordering {
    match (a, b) {
        (Some(x), Some(y)) => cmp(x, y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
