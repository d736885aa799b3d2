use meridian_core::{DialShade, DialTheme, MeetingWindow, Rgb, Timezone};
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph},
};

use super::app::{AppMode, BoardApp, COLUMN_CELLS, LABEL_WIDTH, ROWS_PER_ZONE};

pub fn render(frame: &mut Frame, app: &BoardApp) {
    let grid_height = (app.board.zones().len() as u16).max(1) * ROWS_PER_ZONE;
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),           // Header
            Constraint::Length(grid_height), // Dials
            Constraint::Min(3),              // Meeting times
            Constraint::Length(1),           // Status bar
        ])
        .split(frame.area());

    render_header(frame, app, chunks[0]);
    render_grid(frame, app, chunks[1]);
    render_meeting_times(frame, app, chunks[2]);
    render_status_bar(frame, app, chunks[3]);

    if app.mode == AppMode::Search {
        render_search_popup(frame, app);
    }
}

fn render_header(frame: &mut Frame, app: &BoardApp, area: Rect) {
    let board = &app.board;
    let pinned = if board.selected_date().is_some() { " (pinned)" } else { "" };
    let title = format!(
        "mer - home {}  {}h  theme {}  {}{}",
        board.home().name(),
        board.format(),
        board.theme(),
        app.anchor_date().format("%a, %b %-d %Y"),
        pinned
    );

    let header =
        Paragraph::new(title).style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD));

    frame.render_widget(header, area);
}

fn to_color(rgb: Rgb) -> Color {
    Color::Rgb(rgb.0, rgb.1, rgb.2)
}

fn render_grid(frame: &mut Frame, app: &BoardApp, area: Rect) {
    let board = &app.board;
    let mut lines: Vec<Line> = Vec::new();

    if board.zones().is_empty() {
        lines.push(Line::from(Span::styled(
            "No zones yet. Press / to add one.",
            Style::default().fg(Color::DarkGray),
        )));
    }

    let drag_frame = app.drag_frame();
    for (index, zone) in board.zones().iter().enumerate() {
        let selected = index == app.row_selected;
        let (upper, lower) = zone_labels(zone, selected);
        let frame_here = if selected { drag_frame } else { None };

        let mut top = vec![upper];
        let mut bottom = vec![lower];
        for (column, label) in zone.dials.labels().iter().enumerate() {
            let cell = &zone.dials.cells[column];
            let (first, second) = label.lines();
            let base = cell_style(board.theme(), cell.shade, cell.is_new_day);

            top.extend(cell_spans(&first, column, base, &board.window(), frame_here, zone.dials.len()));
            bottom.extend(cell_spans(&second, column, base, &board.window(), frame_here, zone.dials.len()));
        }

        lines.push(Line::from(top));
        lines.push(Line::from(bottom));
    }

    frame.render_widget(Paragraph::new(Text::from(lines)), area);
}

fn zone_labels(zone: &Timezone, selected: bool) -> (Span<'static>, Span<'static>) {
    let width = usize::from(LABEL_WIDTH) - 1;
    let marker = if selected { ">" } else { " " };
    let style = if selected {
        Style::default().add_modifier(Modifier::BOLD)
    } else {
        Style::default()
    };

    let mut name = format!("{}{} {}", marker, zone.name, zone.abbr);
    name.truncate(width);
    let detail = format!(
        "  {} {} {} ({})",
        zone.clock, zone.day_of_week, zone.month_and_day, zone.diff_hours_from_home
    );

    (
        Span::styled(format!("{:<width$} ", name, width = width), style),
        Span::styled(
            format!("{:<width$} ", detail, width = width),
            Style::default().fg(Color::Gray),
        ),
    )
}

fn cell_style(theme: DialTheme, shade: DialShade, new_day: bool) -> Style {
    let fg = if theme.is_dark(shade) { Color::White } else { Color::Black };
    let style = Style::default().bg(to_color(theme.color(shade))).fg(fg);
    if new_day {
        style.add_modifier(Modifier::BOLD)
    } else {
        style
    }
}

/// One dial column as two half-column spans, highlighted where the meeting
/// window (or the drag overlay) covers them.
fn cell_spans(
    text: &str,
    column: usize,
    base: Style,
    window: &MeetingWindow,
    drag_frame: Option<MeetingWindow>,
    row_len: usize,
) -> [Span<'static>; 2] {
    let half = usize::from(COLUMN_CELLS / 2);
    let padded = format!("{:^width$}", text, width = usize::from(COLUMN_CELLS));
    let chars: Vec<char> = padded.chars().collect();
    let split = half.min(chars.len());
    let left: String = chars[..split].iter().collect();
    let right: String = chars[split..].iter().collect();

    let style_at = |position: f64| {
        let mut style = base;
        if window.span() > 0.0 && window.covers(position, row_len) {
            style = style.add_modifier(Modifier::REVERSED);
        }
        if drag_frame.is_some_and(|f| f.covers(position, row_len)) {
            style = style.add_modifier(Modifier::UNDERLINED);
        }
        style
    };

    let position = column as f64;
    [
        Span::styled(left, style_at(position)),
        Span::styled(right, style_at(position + 0.5)),
    ]
}

fn render_meeting_times(frame: &mut Frame, app: &BoardApp, area: Rect) {
    let block = Block::default().borders(Borders::ALL).title("Meeting window");
    let window = app.board.window();

    let mut lines: Vec<Line> = Vec::new();
    if window.span() == 0.0 {
        lines.push(Line::from(Span::styled(
            "Drag across the dials or use Shift+←/→ to pick a window",
            Style::default().fg(Color::DarkGray),
        )));
    } else {
        match app.board.meeting_times() {
            Ok(times) => {
                for (zone, times) in times {
                    lines.push(Line::from(vec![
                        Span::styled(
                            format!("{:<28}", zone.name),
                            Style::default().fg(Color::Green),
                        ),
                        Span::raw(format!(
                            "{} ({}) - {} ({})",
                            times.start.time_label(),
                            times.start.date_label(),
                            times.end.time_label(),
                            times.end.date_label()
                        )),
                    ]));
                }
            }
            Err(e) => lines.push(Line::from(Span::styled(
                format!("Error: {}", e),
                Style::default().fg(Color::Red),
            ))),
        }
    }

    frame.render_widget(Paragraph::new(Text::from(lines)).block(block), area);
}

fn render_status_bar(frame: &mut Frame, app: &BoardApp, area: Rect) {
    let status = if let Some(ref error) = app.last_error {
        Span::styled(format!("Error: {}", error), Style::default().fg(Color::Red))
    } else if let Some(ref status) = app.status {
        Span::styled(status.clone(), Style::default().fg(Color::Yellow))
    } else {
        let help = match app.mode {
            AppMode::Board => {
                "/: Add  d: Remove  J/K: Move  ←/→: Shift  </>: Resize  [/]: Day  .: Today  f: 12/24h  t: Theme  q: Quit"
            }
            AppMode::Search => "↑/↓: Navigate  Enter: Add  Esc: Cancel",
        };
        Span::styled(help, Style::default().fg(Color::DarkGray))
    };

    frame.render_widget(Paragraph::new(Line::from(status)), area);
}

fn render_search_popup(frame: &mut Frame, app: &BoardApp) {
    let area = centered_rect(60, 60, frame.area());
    frame.render_widget(Clear, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(1)])
        .split(area);

    let input = Paragraph::new(app.query.as_str())
        .block(Block::default().borders(Borders::ALL).title("Search zones"));
    frame.render_widget(input, chunks[0]);
    frame.set_cursor_position((chunks[0].x + 1 + app.cursor_pos as u16, chunks[0].y + 1));

    let items: Vec<ListItem> = app
        .search_results()
        .iter()
        .map(|zone| {
            let on_board = app.board.zones().iter().any(|z| z.name == zone.name);
            let style = if on_board {
                Style::default().fg(Color::Green)
            } else {
                Style::default()
            };
            let marker = if on_board { " ✓" } else { "" };
            ListItem::new(format!(
                "{:<32} {:<6} {:>9}  {}{}",
                zone.name, zone.abbr, zone.clock, zone.value, marker
            ))
            .style(style)
        })
        .collect();

    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL))
        .highlight_style(Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD))
        .highlight_symbol("> ");

    let mut state = ListState::default();
    state.select(Some(app.popup_selected));

    frame.render_stateful_widget(list, chunks[1], &mut state);
}

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
