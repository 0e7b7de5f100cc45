use crate::controller::ResultsView;
use crate::tui::app::App;
use crate::tui::colors;
use crate::tui::table::SortColumn;
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Cell, Paragraph, Row, Table, Wrap};
use unicode_width::UnicodeWidthStr;

pub fn draw(frame: &mut Frame, app: &mut App) {
    let area = frame.area();
    let trending_height = if app.controller.state().show_trending() {
        3
    } else {
        0
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),               // Title
            Constraint::Length(3),               // Search bar
            Constraint::Length(trending_height), // Trending
            Constraint::Min(5),                  // Results
            Constraint::Length(1),               // Status bar
        ])
        .split(area);

    draw_title(frame, chunks[0]);
    draw_search_bar(frame, app, chunks[1]);
    if trending_height > 0 {
        draw_trending(frame, app, chunks[2]);
    }
    draw_results(frame, app, chunks[3]);
    draw_status_bar(frame, app, chunks[4]);
}

fn draw_title(frame: &mut Frame, area: Rect) {
    let line = Line::from(vec![
        Span::raw(" Find "),
        Span::styled(
            "Movies",
            Style::default()
                .fg(Color::Rgb(171, 139, 255))
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(" You'll Enjoy Without the Hassle"),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}

fn draw_search_bar(frame: &mut Frame, app: &App, area: Rect) {
    let border_style = if app.search.focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::DarkGray)
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style)
        .title(" Search ");

    let prefix = " \u{1F50D} ";
    let paragraph = if app.search.query.is_empty() && !app.search.focused {
        Paragraph::new(format!("{}Search through thousands of movies", prefix))
            .style(Style::default().fg(Color::DarkGray))
    } else {
        Paragraph::new(format!("{}{}", prefix, app.search.query))
            .style(Style::default().fg(Color::White))
    };

    frame.render_widget(paragraph.block(block), area);

    if app.search.focused {
        let x = cursor_x(area, prefix.width(), app.search.cursor_column());
        frame.set_cursor_position(Position::new(x, area.y.saturating_add(1)));
    }
}

/// Cursor column inside a bordered box, kept inside the right border
fn cursor_x(area: Rect, prefix_width: usize, column: u16) -> u16 {
    let prefix_width = u16::try_from(prefix_width).unwrap_or(u16::MAX);
    let x = area
        .x
        .saturating_add(1)
        .saturating_add(prefix_width)
        .saturating_add(column);
    let max_x = area.x.saturating_add(area.width.saturating_sub(2));
    x.min(max_x)
}

fn draw_trending(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(" Trending Movies ");

    let mut spans = Vec::new();
    for (rank, record) in app.controller.state().ranked_trending() {
        spans.push(Span::styled(
            format!(" {} ", rank),
            Style::default()
                .fg(colors::color_for_rank(rank))
                .add_modifier(Modifier::BOLD),
        ));
        spans.push(Span::raw(record.search_term.clone()));
        spans.push(Span::styled(
            format!(" ({})  ", record.count),
            Style::default().fg(Color::DarkGray),
        ));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)).block(block), area);
}

fn draw_results(frame: &mut Frame, app: &mut App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(if app.search.focused {
            Style::default().fg(Color::DarkGray)
        } else {
            Style::default().fg(Color::Cyan)
        })
        .title(" All Movies ");

    let view = app.controller.state().results_view();
    match view {
        ResultsView::Nothing => frame.render_widget(block, area),
        ResultsView::Loading => {
            let p = Paragraph::new(" \u{23F3} Loading...")
                .style(Style::default().fg(Color::Yellow))
                .block(block);
            frame.render_widget(p, area);
        }
        ResultsView::Error(message) => {
            let p = Paragraph::new(format!(" {}", message))
                .style(Style::default().fg(Color::Red))
                .wrap(Wrap { trim: false })
                .block(block);
            frame.render_widget(p, area);
        }
        ResultsView::Grid(_) => draw_grid(frame, app, block, area),
    }
}

fn draw_grid(frame: &mut Frame, app: &mut App, block: Block, area: Rect) {
    // Area height minus borders minus header
    let inner_height = area.height.saturating_sub(3) as usize;
    app.table.visible_rows = inner_height;

    let header_columns: [(&str, Option<SortColumn>); 5] = [
        ("#", Some(SortColumn::Relevance)),
        ("Title", Some(SortColumn::Title)),
        ("Rating", Some(SortColumn::Rating)),
        ("Lang", None),
        ("Year", Some(SortColumn::Year)),
    ];

    let header = Row::new(header_columns.iter().map(|(name, col)| {
        let text = match col {
            Some(c) if app.table.sort_column == *c && *c != SortColumn::Relevance => {
                format!("{}{}", name, app.table.sort_order.indicator())
            }
            _ => name.to_string(),
        };
        Cell::from(text).style(
            Style::default()
                .fg(Color::White)
                .bg(colors::HEADER_BG)
                .add_modifier(Modifier::BOLD),
        )
    }))
    .height(1);

    let movies = app.controller.state().visible_movies();
    let start = app.table.scroll_offset;
    let end = (start + inner_height).min(app.order.len());

    let rows: Vec<Row> = (start..end)
        .map(|row| {
            let movie = &movies[app.order[row]];
            let is_selected = !app.search.focused && app.table.selected == Some(row);

            let bg = if is_selected {
                colors::SELECTED_BG
            } else if row % 2 == 1 {
                colors::ALT_ROW_BG
            } else {
                Color::Reset
            };

            Row::new(vec![
                Cell::from(format!("{}", app.order[row] + 1))
                    .style(Style::default().fg(Color::DarkGray)),
                Cell::from(movie.title.clone()).style(Style::default().fg(Color::White)),
                Cell::from(format!("\u{2605} {}", movie.rating_label()))
                    .style(Style::default().fg(colors::color_for_rating(movie.vote_average))),
                Cell::from(movie.language_label()).style(Style::default().fg(Color::Gray)),
                Cell::from(movie.year_label()).style(Style::default().fg(Color::Gray)),
            ])
            .style(Style::default().bg(bg))
        })
        .collect();

    let widths = [
        Constraint::Length(4),
        Constraint::Min(20),
        Constraint::Length(9),
        Constraint::Length(5),
        Constraint::Length(6),
    ];

    let table = Table::new(rows, widths).header(header).block(block);
    frame.render_widget(table, area);
}

fn draw_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let state = app.controller.state();

    let left_text = if !app.status_message.is_empty() {
        format!(" {}", app.status_message)
    } else if state.is_loading() {
        " \u{23F3} Loading...".to_string()
    } else if let Some(summary) = app.selection_summary() {
        format!(" {}", summary)
    } else if app.controller.is_busy() {
        " \u{23F3} Updating trending...".to_string()
    } else {
        let query = state.settled.as_deref().unwrap_or("");
        let source = if query.is_empty() { "popular" } else { query };
        format!(
            " {} | {} movies | {}",
            state.phase.label(),
            state.visible_movies().len(),
            source
        )
    };

    let right_text = " Tab:Grid  Enter:Open  F1-F4:Sort  Ctrl+R:Trending  Esc:Clear  Ctrl+Q:Quit ";

    let available_width = area.width as usize;
    let left_len = left_text.width();
    let right_len = right_text.width();

    let status_str = if left_len + right_len < available_width {
        let padding = available_width - left_len - right_len;
        format!("{}{:padding$}{}", left_text, "", right_text, padding = padding)
    } else {
        left_text
    };

    let status = Paragraph::new(status_str)
        .style(Style::default().fg(Color::White).bg(colors::HEADER_BG));

    frame.render_widget(status, area);
}
