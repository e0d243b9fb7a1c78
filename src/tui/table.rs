//! Rendering for the catalog table, its pager and overlays

use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, TableState, Wrap};

use crate::catalog::LazyPageEvent;
use crate::tui::{
    app::{StatusKind, StatusMessage},
    keys::KeyMap,
    styles::Theme,
    Frame,
};
use crate::view::{BulkSelect, TableProps};

const FAVORITE_ON: &str = "[♥]";
const FAVORITE_OFF: &str = "[ ]";

pub fn render_table(
    frame: &mut Frame,
    area: Rect,
    props: &TableProps,
    state: &mut TableState,
    theme: &Theme,
) {
    let toggle = if props.all_selected { FAVORITE_ON } else { FAVORITE_OFF };
    let header = Row::new(vec![
        Cell::from(toggle),
        Cell::from("Title"),
        Cell::from("Origin"),
        Cell::from("Artist"),
        Cell::from("Inscriptions"),
        Cell::from("Start"),
        Cell::from("End"),
    ])
    .style(theme.header_style())
    .bottom_margin(1);

    let rows = props.rows.iter().map(|row| {
        let record = row.record;
        let marker = if row.selected {
            Cell::from(FAVORITE_ON).style(theme.favorite_style())
        } else {
            Cell::from(FAVORITE_OFF).style(theme.dim_style())
        };
        Row::new(vec![
            marker,
            Cell::from(record.title.clone()),
            Cell::from(record.place_of_origin.clone().unwrap_or_default()),
            Cell::from(first_line(&record.artist_display)),
            Cell::from(first_line(record.inscriptions.as_deref().unwrap_or_default())),
            Cell::from(year(record.date_start)),
            Cell::from(year(record.date_end)),
        ])
        .style(theme.text_style())
    });

    let widths = [
        Constraint::Length(3),
        Constraint::Percentage(30),
        Constraint::Percentage(12),
        Constraint::Percentage(26),
        Constraint::Percentage(20),
        Constraint::Length(6),
        Constraint::Length(6),
    ];

    let title = if props.loading {
        " Artworks (loading…) "
    } else {
        " Artworks "
    };
    let border_style = if props.loading {
        theme.border_style()
    } else {
        theme.focused_border_style()
    };

    let table = Table::new(rows, widths)
        .header(header)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(title)
                .border_style(border_style),
        )
        .highlight_style(theme.selection_style())
        .highlight_symbol("> ");

    frame.render_stateful_widget(table, area, state);

    if props.rows.is_empty() {
        let message = if props.loading { "Loading…" } else { "No records" };
        let inner = area.inner(&ratatui::layout::Margin {
            vertical: 3,
            horizontal: 2,
        });
        frame.render_widget(
            Paragraph::new(message)
                .alignment(Alignment::Center)
                .style(theme.placeholder_style()),
            inner,
        );
    }
}

/// Paging request from the pager control
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PagerMove {
    Next,
    Previous,
    First,
    Last,
}

fn total_pages(total: usize, rows: usize) -> usize {
    if total == 0 {
        1
    } else {
        (total + rows - 1) / rows
    }
}

/// The `{first, rows}` event the pager reports for a move, bounded by the
/// catalog total
pub fn pager_event(mv: PagerMove, offset: usize, rows: usize, total: usize) -> Option<LazyPageEvent> {
    if rows == 0 {
        return None;
    }
    let last_index = total_pages(total, rows) - 1;
    let index = offset / rows;
    let target = match mv {
        PagerMove::Next => (index + 1).min(last_index),
        PagerMove::Previous => index.saturating_sub(1),
        PagerMove::First => 0,
        PagerMove::Last => last_index,
    };
    Some(LazyPageEvent {
        first: target * rows,
        rows,
    })
}

/// Paging line: position, total and favorite count
pub fn render_pager(frame: &mut Frame, area: Rect, props: &TableProps, theme: &Theme) {
    let pages = total_pages(props.total, props.page_size);
    let page = props.offset / props.page_size + 1;
    let first = if props.rows.is_empty() { 0 } else { props.offset + 1 };
    let last = props.offset + props.rows.len();

    let mut spans = vec![
        Span::styled("◀ ", theme.dim_style()),
        Span::styled(format!("Page {} of {}", page, pages), theme.text_style()),
        Span::styled(" ▶", theme.dim_style()),
        Span::styled(
            format!("  rows {}-{} of {}", first, last, props.total),
            theme.dim_style(),
        ),
        Span::styled(
            format!(
                "  {} {}",
                props.selected_count,
                if props.selected_count == 1 { "favorite" } else { "favorites" }
            ),
            theme.favorite_style(),
        ),
    ];
    if props.loading {
        spans.push(Span::styled("  loading…", theme.warning_style()));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

pub fn render_status_bar(
    frame: &mut Frame,
    area: Rect,
    status: Option<&StatusMessage>,
    theme: &Theme,
) {
    let paragraph = match status {
        Some(message) => {
            let style = match message.kind {
                StatusKind::Info => theme.success_style(),
                StatusKind::Error => theme.error_style(),
            };
            Paragraph::new(message.text.as_str()).style(style)
        }
        None => Paragraph::new("space favorite | a page | n top N | ←/→ paging | ? help | q quit")
            .style(theme.status_bar_style()),
    };

    frame.render_widget(paragraph, area);
}

/// "Select top N" popover
pub fn render_bulk_popover(frame: &mut Frame, bulk: &BulkSelect, page_len: usize, theme: &Theme) {
    let area = centered_rect(40, 30, frame.size());

    let commit_style = if bulk.can_commit(page_len) {
        theme.success_style()
    } else {
        theme.placeholder_style()
    };
    let input = if bulk.input().is_empty() {
        Span::styled("_", theme.placeholder_style())
    } else {
        Span::styled(bulk.input().to_string(), theme.text_style())
    };

    let lines = vec![
        Line::from(vec![
            Span::styled(format!("Rows to select (1-{}): ", page_len), theme.text_style()),
            input,
        ]),
        Line::from(""),
        Line::from(vec![
            Span::styled("Enter", commit_style),
            Span::styled(" select  ", theme.dim_style()),
            Span::styled("Esc", theme.text_style()),
            Span::styled(" cancel", theme.dim_style()),
        ]),
    ];

    frame.render_widget(Clear, area);
    frame.render_widget(
        Paragraph::new(lines)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(" Select top N ")
                    .border_style(theme.focused_border_style()),
            )
            .wrap(Wrap { trim: true })
            .style(theme.base_style()),
        area,
    );
}

/// Render help overlay
pub fn render_help_overlay(frame: &mut Frame, key_map: &KeyMap, theme: &Theme) {
    let help_area = centered_rect(50, 70, frame.size());

    let lines: Vec<Line> = key_map
        .help_lines()
        .into_iter()
        .map(|(keys, description)| {
            Line::from(vec![
                Span::styled(format!("{:>10}  ", keys), theme.header_style()),
                Span::styled(description, theme.text_style()),
            ])
        })
        .collect();

    frame.render_widget(Clear, help_area);
    frame.render_widget(
        Paragraph::new(lines)
            .block(Block::default().borders(Borders::ALL).title(" Help "))
            .style(theme.help_style()),
        help_area,
    );
}

fn first_line(text: &str) -> String {
    text.lines().next().unwrap_or_default().to_string()
}

fn year(value: Option<i32>) -> String {
    value.map(|y| y.to_string()).unwrap_or_default()
}

/// Create a centered rectangle with given percentage of the screen
fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::testing::records;
    use crate::selection::SelectionStore;
    use crate::view::ViewBinder;
    use ratatui::{backend::TestBackend, Terminal};

    #[test]
    fn test_pager_event_is_bounded_by_total() {
        assert_eq!(
            pager_event(PagerMove::Next, 0, 12, 30),
            Some(LazyPageEvent { first: 12, rows: 12 })
        );
        assert_eq!(
            pager_event(PagerMove::Next, 24, 12, 30),
            Some(LazyPageEvent { first: 24, rows: 12 })
        );
        assert_eq!(
            pager_event(PagerMove::Previous, 0, 12, 30),
            Some(LazyPageEvent { first: 0, rows: 12 })
        );
        assert_eq!(
            pager_event(PagerMove::Last, 0, 12, 30),
            Some(LazyPageEvent { first: 24, rows: 12 })
        );
        assert_eq!(
            pager_event(PagerMove::First, 24, 12, 30),
            Some(LazyPageEvent { first: 0, rows: 12 })
        );
        assert_eq!(pager_event(PagerMove::Last, 0, 12, 0), Some(LazyPageEvent { first: 0, rows: 12 }));
        assert_eq!(pager_event(PagerMove::Next, 0, 0, 30), None);
    }

    #[test]
    fn test_popover_renders_bounds() {
        let page = records(1..=5);
        let mut binder = ViewBinder::new();
        binder.bulk.open();
        binder.bulk.push_digit('3');
        let theme = Theme::default();

        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
        terminal
            .draw(|frame| render_bulk_popover(frame, &binder.bulk, page.len(), &theme))
            .unwrap();

        let rendered = format!("{:?}", terminal.backend().buffer());
        assert!(rendered.contains("Select top N"));
        assert!(rendered.contains("(1-5): 3"));
    }

    #[test]
    fn test_pager_counts_rows() {
        let page = records(13..=24);
        let store = SelectionStore::new();
        let binder = ViewBinder::new();
        let props = binder.props(&page, &store, true, 30, 12, 12);
        let theme = Theme::default();

        let mut terminal = Terminal::new(TestBackend::new(100, 1)).unwrap();
        terminal
            .draw(|frame| {
                let area = frame.size();
                render_pager(frame, area, &props, &theme)
            })
            .unwrap();

        let rendered = format!("{:?}", terminal.backend().buffer());
        assert!(rendered.contains("Page 2 of 3"));
        assert!(rendered.contains("rows 13-24 of 30"));
        assert!(rendered.contains("0 favorites"));
        assert!(rendered.contains("loading"));
    }
}
