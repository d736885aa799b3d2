use chrono::{DateTime, NaiveDate, TimeDelta, Utc};
use meridian_core::{
    Board, BoardEvent, Catalog, Clock, ColumnSide, DIAL_COLUMNS, DragSession, MeetingWindow,
    Timezone,
};
use tokio::sync::mpsc;
use tracing::{debug, warn};

/// Width of the zone label column, in terminal cells.
pub const LABEL_WIDTH: u16 = 30;
/// Width of one dial column, in terminal cells.
pub const COLUMN_CELLS: u16 = 4;
/// Terminal lines per zone row.
pub const ROWS_PER_ZONE: u16 = 2;
/// First terminal line of the grid, below the header.
pub const GRID_TOP: u16 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppMode {
    Board,
    Search,
}

pub struct BoardApp {
    pub mode: AppMode,
    pub should_quit: bool,
    pub board: Board,
    pub catalog: Catalog,
    pub clock: Box<dyn Clock>,
    pub query: String,
    pub cursor_pos: usize,
    pub popup_selected: usize,
    pub row_selected: usize,
    pub drag: Option<DragSession>,
    pub frame_width: f64,
    pub events: mpsc::UnboundedReceiver<BoardEvent>,
    pub last_error: Option<String>,
    pub status: Option<String>,
}

impl BoardApp {
    pub fn new(mut board: Board, clock: Box<dyn Clock>) -> Self {
        let (tx, events) = mpsc::unbounded_channel();
        board.subscribe(move |event| {
            let _ = tx.send(event.clone());
        });

        let catalog = Catalog::populate(clock.now(), board.format(), board.home());
        debug!("catalog holds {} zones", catalog.len());

        Self {
            mode: AppMode::Board,
            should_quit: false,
            board,
            catalog,
            clock,
            query: String::new(),
            cursor_pos: 0,
            popup_selected: 0,
            row_selected: 0,
            drag: None,
            frame_width: Self::column_width(),
            events,
            last_error: None,
            status: None,
        }
    }

    pub fn column_width() -> f64 {
        f64::from(COLUMN_CELLS)
    }

    fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    fn record<E: std::fmt::Display>(&mut self, result: Result<(), E>) {
        match result {
            Ok(()) => self.last_error = None,
            Err(e) => {
                warn!("{}", e);
                self.last_error = Some(e.to_string());
            }
        }
    }

    /// Drains board events. Returns `true` when the clock ticker must restart
    /// because the zone list or the hours format changed.
    pub fn take_clock_restart(&mut self) -> bool {
        let mut restart = false;
        while let Ok(event) = self.events.try_recv() {
            if matches!(
                event,
                BoardEvent::ZoneAdded(_) | BoardEvent::ZoneRemoved(_) | BoardEvent::FormatChanged(_)
            ) {
                restart = true;
            }
        }
        restart
    }

    pub fn on_tick(&mut self) {
        let now = self.now();
        let result = self.board.tick(now);
        self.record(result);
        self.catalog
            .refresh(now, self.board.format(), self.board.home());
    }

    pub fn selected_zone(&self) -> Option<&Timezone> {
        self.board.zones().get(self.row_selected)
    }

    pub fn select_up(&mut self) {
        self.row_selected = self.row_selected.saturating_sub(1);
    }

    pub fn select_down(&mut self) {
        if self.row_selected + 1 < self.board.zones().len() {
            self.row_selected += 1;
        }
    }

    pub fn move_row_up(&mut self) {
        if self.row_selected > 0 && self.board.reorder(self.row_selected, self.row_selected - 1) {
            self.row_selected -= 1;
        }
    }

    pub fn move_row_down(&mut self) {
        if self.board.reorder(self.row_selected, self.row_selected + 1) {
            self.row_selected += 1;
        }
    }

    pub fn remove_selected(&mut self) {
        let Some(name) = self.selected_zone().map(|z| z.name.clone()) else {
            return;
        };
        if self.board.remove(&name) {
            self.status = Some(format!("Removed {}", name));
            let last = self.board.zones().len().saturating_sub(1);
            self.row_selected = self.row_selected.min(last);
        }
    }

    pub fn shift_window(&mut self, delta: f64) {
        let window = self.board.window().shifted(delta);
        self.board.set_window(window);
    }

    pub fn resize_window(&mut self, delta: f64) {
        let window = self.board.window().resized(delta);
        self.board.set_window(window);
    }

    pub fn toggle_format(&mut self) {
        let now = self.now();
        let result = self.board.toggle_format(now);
        self.record(result);
        self.catalog.refresh(now, self.board.format(), self.board.home());
    }

    pub fn cycle_theme(&mut self) {
        self.board.cycle_theme();
    }

    /// Today in the home zone.
    pub fn home_today(&self) -> NaiveDate {
        self.now().with_timezone(&self.board.home()).date_naive()
    }

    /// Date the dials are anchored on.
    pub fn anchor_date(&self) -> NaiveDate {
        self.board.selected_date().unwrap_or_else(|| self.home_today())
    }

    pub fn shift_date(&mut self, days: i64) {
        let Some(date) = self.anchor_date().checked_add_signed(TimeDelta::days(days)) else {
            return;
        };
        self.select_date(date);
    }

    pub fn select_today(&mut self) {
        self.select_date(self.home_today());
    }

    fn select_date(&mut self, date: NaiveDate) {
        let now = self.now();
        let result = self.board.select_date(date, now);
        self.record(result);
    }

    pub fn open_search(&mut self) {
        self.query.clear();
        self.cursor_pos = 0;
        self.popup_selected = 0;
        self.mode = AppMode::Search;
    }

    pub fn close_search(&mut self) {
        self.mode = AppMode::Board;
    }

    pub fn search_results(&self) -> Vec<&Timezone> {
        self.catalog.search(&self.query)
    }

    pub fn popup_up(&mut self) {
        self.popup_selected = self.popup_selected.saturating_sub(1);
    }

    pub fn popup_down(&mut self) {
        if self.popup_selected + 1 < self.search_results().len() {
            self.popup_selected += 1;
        }
    }

    /// Adds the highlighted search result to the board.
    pub fn popup_select(&mut self) {
        let Some(name) = self
            .search_results()
            .get(self.popup_selected)
            .map(|z| z.name.clone())
        else {
            return;
        };

        let now = self.now();
        match self.board.add(&name, now) {
            Ok(true) => {
                self.row_selected = self.board.zones().len() - 1;
                self.status = Some(format!("Added {}", name));
                self.last_error = None;
            }
            Ok(false) => self.status = Some(format!("{} is already on the board", name)),
            Err(e) => self.last_error = Some(e.to_string()),
        }
        self.close_search();
    }

    pub fn input_char(&mut self, c: char) {
        self.query.insert(self.cursor_pos, c);
        self.cursor_pos += c.len_utf8();
        self.popup_selected = 0;
    }

    pub fn input_backspace(&mut self) {
        if self.cursor_pos > 0 {
            let prev_char_boundary = self.query[..self.cursor_pos]
                .char_indices()
                .next_back()
                .map(|(i, _)| i)
                .unwrap_or(0);
            self.query.remove(prev_char_boundary);
            self.cursor_pos = prev_char_boundary;
            self.popup_selected = 0;
        }
    }

    /// Zone row under terminal line `y`.
    pub fn zone_at(&self, y: u16) -> Option<usize> {
        let line = y.checked_sub(GRID_TOP)?;
        let row = usize::from(line / ROWS_PER_ZONE);
        (row < self.board.zones().len()).then_some(row)
    }

    /// Pointer position within the grid, in cells, measured at the cell centre.
    fn pointer_offset(x: u16) -> f64 {
        f64::from(x.saturating_sub(LABEL_WIDTH)) + 0.5
    }

    fn on_grid(x: u16) -> bool {
        let grid_cells = DIAL_COLUMNS as u16 * COLUMN_CELLS;
        x >= LABEL_WIDTH && x < LABEL_WIDTH + grid_cells
    }

    pub fn mouse_down(&mut self, x: u16, y: u16) {
        let Some(row) = self.zone_at(y) else {
            return;
        };
        self.row_selected = row;
        if !Self::on_grid(x) {
            return;
        }

        let width = Self::column_width();
        let offset = Self::pointer_offset(x);
        let left_px = (offset / width).floor() * width;
        let side = ColumnSide::of(offset - left_px, width);

        match DragSession::begin(left_px, side, offset, width) {
            Ok(session) => self.drag = Some(session),
            Err(e) => self.last_error = Some(e.to_string()),
        }
    }

    pub fn mouse_drag(&mut self, x: u16) {
        let Some(session) = self.drag.as_mut() else {
            return;
        };
        match session.update(Self::pointer_offset(x)) {
            Ok(fit) => {
                self.frame_width = fit.frame_width;
                self.board.set_window(fit.window);
            }
            Err(e) => self.last_error = Some(e.to_string()),
        }
    }

    pub fn mouse_up(&mut self) {
        if let Some(session) = self.drag.take() {
            let outcome = session.release();
            self.frame_width = outcome.frame_width;
            self.board.set_window(outcome.window);
        }
    }

    /// Column range of the drag overlay while a gesture is active.
    pub fn drag_frame(&self) -> Option<MeetingWindow> {
        let session = self.drag.as_ref()?;
        let start = session.left_index();
        MeetingWindow::new(start, start + self.frame_width / Self::column_width()).ok()
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use chrono_tz::Tz;
    use meridian_core::{DialTheme, FixedClock, HoursFormat};

    use super::*;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 15, 21, 10, 0).unwrap()
    }

    fn app(zones: &[&str]) -> BoardApp {
        let mut board = Board::new(Tz::UTC, HoursFormat::TwentyFour, DialTheme::Sky);
        for zone in zones {
            board.add(zone, now()).unwrap();
        }
        BoardApp::new(board, Box::new(FixedClock(now())))
    }

    #[test]
    fn click_without_moving_selects_half_column() {
        let mut app = app(&["UTC", "Asia/Tokyo"]);
        app.mouse_down(LABEL_WIDTH + 8, GRID_TOP + ROWS_PER_ZONE);
        assert_eq!(app.row_selected, 1);

        app.mouse_up();
        assert_eq!(app.board.window(), MeetingWindow::new(2.0, 2.5).unwrap());
        assert_eq!(app.frame_width, 2.0);
        assert!(app.drag.is_none());
    }

    #[test]
    fn drag_spans_columns_and_snaps_overlay() {
        let mut app = app(&["UTC"]);
        app.mouse_down(LABEL_WIDTH + 8, GRID_TOP);
        app.mouse_drag(LABEL_WIDTH + 16);

        assert_eq!(app.board.window(), MeetingWindow::new(2.0, 4.0).unwrap());
        assert_eq!(app.frame_width, 8.0);
        assert_eq!(app.drag_frame(), Some(MeetingWindow::new(2.0, 4.0).unwrap()));

        app.mouse_up();
        assert_eq!(app.board.window(), MeetingWindow::new(2.0, 4.0).unwrap());
        assert_eq!(app.frame_width, 4.0);
    }

    #[test]
    fn press_on_right_half_starts_half_a_column_later() {
        let mut app = app(&["UTC"]);
        app.mouse_down(LABEL_WIDTH + 10, GRID_TOP);
        app.mouse_up();
        assert_eq!(app.board.window().start(), 2.5);
    }

    #[test]
    fn clicks_outside_grid_do_not_drag() {
        let mut app = app(&["UTC"]);
        app.mouse_down(3, GRID_TOP);
        assert!(app.drag.is_none());

        app.mouse_down(LABEL_WIDTH + 4, GRID_TOP + 10);
        assert!(app.drag.is_none());
    }

    #[test]
    fn search_adds_highlighted_zone() {
        let mut app = app(&["UTC"]);
        app.take_clock_restart();

        app.open_search();
        for c in "kolkata".chars() {
            app.input_char(c);
        }
        assert_eq!(app.search_results()[0].name, "Asia/Kolkata");

        app.popup_select();
        assert_eq!(app.mode, AppMode::Board);
        assert_eq!(app.board.zone_names(), vec!["UTC", "Asia/Kolkata"]);
        assert_eq!(app.row_selected, 1);
        assert!(app.take_clock_restart());
        assert!(!app.take_clock_restart());
    }

    #[test]
    fn rows_reorder_and_remove() {
        let mut app = app(&["UTC", "Asia/Tokyo", "Europe/Warsaw"]);
        app.select_down();
        app.move_row_down();
        assert_eq!(app.board.zone_names(), vec!["UTC", "Europe/Warsaw", "Asia/Tokyo"]);
        assert_eq!(app.row_selected, 2);

        app.remove_selected();
        assert_eq!(app.board.zone_names(), vec!["UTC", "Europe/Warsaw"]);
        assert_eq!(app.row_selected, 1);
    }

    #[test]
    fn keyboard_moves_window() {
        let mut app = app(&["UTC"]);
        app.board.set_window(MeetingWindow::new(1.0, 2.0).unwrap());

        app.shift_window(0.5);
        app.resize_window(0.5);
        assert_eq!(app.board.window(), MeetingWindow::new(1.5, 3.0).unwrap());
    }

    #[test]
    fn date_moves_from_home_today() {
        let mut app = app(&["UTC"]);
        assert_eq!(app.anchor_date(), NaiveDate::from_ymd_opt(2024, 1, 15).unwrap());

        app.shift_date(1);
        assert_eq!(app.board.selected_date(), NaiveDate::from_ymd_opt(2024, 1, 16));
        assert_eq!(app.board.zones()[0].dials.cells[0].date, NaiveDate::from_ymd_opt(2024, 1, 16).unwrap());

        app.select_today();
        assert_eq!(app.board.selected_date(), NaiveDate::from_ymd_opt(2024, 1, 15));
    }

    #[test]
    fn format_toggle_restarts_clock() {
        let mut app = app(&["UTC"]);
        app.take_clock_restart();

        app.toggle_format();
        assert_eq!(app.board.format(), HoursFormat::Twelve);
        assert!(app.take_clock_restart());

        app.cycle_theme();
        assert!(!app.take_clock_restart());
    }
}
