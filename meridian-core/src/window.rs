//! Meeting-window selection over the shared dial grid.
//!
//! A window is a pair of fractional column indices. A `.5` index points at the
//! second half of a column, which is a half hour past the column's hour. Indices
//! are never clamped up front; lookups reduce them modulo the row length so a
//! window can run past the last column and wrap.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::dial::{DialCell, LAST_COLUMN_INDEX, is_fractional};
use crate::format::Meridian;

/// Width of one dial column on the drawing surface.
pub const DEFAULT_COLUMN_WIDTH: f64 = 34.0;

pub const HALF_COLUMN_WIDTH: f64 = DEFAULT_COLUMN_WIDTH / 2.0;

#[derive(Debug, Error, PartialEq)]
pub enum WindowError {
    #[error("column width {0} must be finite and positive")]
    InvalidColumnWidth(f64),

    #[error("position {0} is not finite")]
    InvalidPosition(f64),

    #[error("window end {end} precedes start {start}")]
    Reversed { start: f64, end: f64 },

    #[error("cannot read times from an empty dial row")]
    EmptyDials,
}

fn check_column_width(column_width: f64) -> Result<(), WindowError> {
    if column_width.is_finite() && column_width > 0.0 {
        Ok(())
    } else {
        Err(WindowError::InvalidColumnWidth(column_width))
    }
}

fn check_position(position: f64) -> Result<(), WindowError> {
    if position.is_finite() {
        Ok(())
    } else {
        Err(WindowError::InvalidPosition(position))
    }
}

/// Which half of a column a pointer is over.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ColumnSide {
    #[default]
    Left,
    Right,
}

impl ColumnSide {
    /// Side for a pointer `offset` from the left edge of a column.
    pub fn of(offset: f64, column_width: f64) -> Self {
        if offset < column_width / 2.0 {
            ColumnSide::Left
        } else {
            ColumnSide::Right
        }
    }

    fn bias(self) -> f64 {
        match self {
            ColumnSide::Left => 0.0,
            ColumnSide::Right => 0.5,
        }
    }
}

/// Selected column range, `start <= end`.
///
/// Deserialization goes through [`MeetingWindow::new`], so a stored window is
/// checked like one built in code.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawWindow")]
pub struct MeetingWindow {
    start: f64,
    end: f64,
}

#[derive(Deserialize)]
struct RawWindow {
    start: f64,
    end: f64,
}

impl TryFrom<RawWindow> for MeetingWindow {
    type Error = WindowError;

    fn try_from(raw: RawWindow) -> Result<Self, Self::Error> {
        MeetingWindow::new(raw.start, raw.end)
    }
}

impl MeetingWindow {
    pub fn new(start: f64, end: f64) -> Result<Self, WindowError> {
        check_position(start)?;
        check_position(end)?;
        if end < start {
            return Err(WindowError::Reversed { start, end });
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> f64 {
        self.start
    }

    pub fn end(&self) -> f64 {
        self.end
    }

    pub fn span(&self) -> f64 {
        self.end - self.start
    }

    /// The same window moved by `delta` columns. The start never goes below zero.
    pub fn shifted(&self, delta: f64) -> Self {
        let start = (self.start + delta).max(0.0);
        Self {
            start,
            end: start + self.span(),
        }
    }

    /// The window with its end moved by `delta`, keeping at least half a column.
    pub fn resized(&self, delta: f64) -> Self {
        Self {
            start: self.start,
            end: (self.end + delta).max(self.start + 0.5),
        }
    }

    /// Whether column position `position` lies in the window once wrapped onto a
    /// row of `row_len` columns.
    pub fn covers(&self, position: f64, row_len: usize) -> bool {
        let len = row_len as f64;
        if self.span() >= len {
            return true;
        }
        let unwrapped = self.start + (position - self.start).rem_euclid(len);
        unwrapped < self.end
    }
}

/// Converts a horizontal drag into a window. A drag that began on the right half
/// of a column starts half a column later.
pub fn pixel_drag_to_window(
    start_px: f64,
    end_px: f64,
    column_width: f64,
    side: ColumnSide,
) -> Result<MeetingWindow, WindowError> {
    check_column_width(column_width)?;
    check_position(start_px)?;
    check_position(end_px)?;

    let bias = side.bias();
    MeetingWindow::new(start_px / column_width + bias, end_px / column_width + bias)
}

/// A converted window edge for one timezone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MeetingTime {
    pub hour: u32,
    pub minute: u32,
    pub meridian: Meridian,
    pub date: NaiveDate,
}

impl MeetingTime {
    /// "14:30 PM" style label; the hour is the 24h dial value.
    pub fn time_label(&self) -> String {
        let minutes = if self.minute == 0 {
            "00".to_string()
        } else {
            self.minute.to_string()
        };
        format!("{}:{} {}", self.hour, minutes, self.meridian)
    }

    pub fn date_label(&self) -> String {
        self.date.format("%a, %b %-d").to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MeetingTimes {
    pub start: MeetingTime,
    pub end: MeetingTime,
}

fn resolve_edge(dials: &[DialCell], index: f64) -> MeetingTime {
    let idx = index.rem_euclid(dials.len() as f64);
    let column = (idx.floor() as usize).min(dials.len() - 1);
    let cell = &dials[column];

    let mut hour = cell.hour24;
    let mut minute = 0;

    if is_fractional(hour) && is_fractional(idx) {
        // The zone's half-hour shift and the half-column selection land on the next hour.
        hour = hour.floor() + 1.0;
    } else if is_fractional(idx) {
        minute = 30;
    } else if is_fractional(hour) {
        hour = hour.floor();
        minute = 30;
    }

    // 24.5 advanced by a half column is 1 AM, not 25.
    if hour > 24.0 {
        hour -= 24.0;
    }

    MeetingTime {
        hour: hour as u32,
        minute,
        meridian: cell.meridian,
        date: cell.date,
    }
}

/// Converts `window` into start and end times on one zone's dial row.
pub fn window_to_times(
    dials: &[DialCell],
    window: &MeetingWindow,
) -> Result<MeetingTimes, WindowError> {
    if dials.is_empty() {
        return Err(WindowError::EmptyDials);
    }

    Ok(MeetingTimes {
        start: resolve_edge(dials, window.start),
        end: resolve_edge(dials, window.end),
    })
}

/// Overlay width after a resize gesture ends: the full column width, or half of
/// it when the overlay already sat at the full width.
pub fn snap_frame_width(frame_width: f64, column_width: f64) -> f64 {
    if frame_width == column_width {
        column_width / 2.0
    } else {
        column_width
    }
}

/// Overlay width and window for a drag in progress.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameFit {
    pub frame_width: f64,
    pub window: MeetingWindow,
}

/// Fits a drag of `dx` units starting at column `left_index`.
///
/// The requested width is a whole number of half columns, at least one. It is
/// accepted while it stays within one column past the end of the row, counted
/// from the left edge; otherwise the overlay falls back to a single half column.
/// The window always reflects the requested width.
pub fn fit_drag_frame(
    dx: f64,
    left_index: f64,
    column_width: f64,
) -> Result<FrameFit, WindowError> {
    check_column_width(column_width)?;
    check_position(dx)?;
    check_position(left_index)?;

    let half_width = column_width / 2.0;
    let halves = (dx / half_width).floor().max(1.0);
    let requested = halves * half_width;

    let window = MeetingWindow::new(left_index, left_index + requested / column_width)?;
    let within_dials =
        requested > half_width && halves / 2.0 <= LAST_COLUMN_INDEX as f64 + 1.0 - left_index;

    Ok(FrameFit {
        frame_width: if within_dials { requested } else { half_width },
        window,
    })
}

/// Result of a finished drag gesture.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragOutcome {
    pub frame_width: f64,
    pub window: MeetingWindow,
}

/// State of one pointer gesture over the overlay, from press to release.
#[derive(Debug, Clone)]
pub struct DragSession {
    origin_x: f64,
    left_index: f64,
    column_width: f64,
    last: Option<FrameFit>,
}

impl DragSession {
    /// Starts a gesture at pointer `origin_x` over a column whose left edge is at
    /// `left_px`.
    pub fn begin(
        left_px: f64,
        side: ColumnSide,
        origin_x: f64,
        column_width: f64,
    ) -> Result<Self, WindowError> {
        check_column_width(column_width)?;
        check_position(left_px)?;
        check_position(origin_x)?;

        Ok(Self {
            origin_x,
            left_index: left_px / column_width + side.bias(),
            column_width,
            last: None,
        })
    }

    pub fn left_index(&self) -> f64 {
        self.left_index
    }

    pub fn update(&mut self, pointer_x: f64) -> Result<FrameFit, WindowError> {
        let fit = fit_drag_frame(pointer_x - self.origin_x, self.left_index, self.column_width)?;
        self.last = Some(fit);
        Ok(fit)
    }

    /// Ends the gesture. The overlay snaps before the window is fixed, so the
    /// window of a click without movement matches the snapped overlay.
    pub fn release(self) -> DragOutcome {
        let current = self
            .last
            .map(|fit| fit.frame_width)
            .unwrap_or(self.column_width);
        let frame_width = snap_frame_width(current, self.column_width);

        let window = match self.last {
            Some(fit) => fit.window,
            None => MeetingWindow {
                start: self.left_index,
                end: self.left_index + frame_width / self.column_width,
            },
        };

        DragOutcome {
            frame_width,
            window,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dial::generate_dials;
    use crate::format::HoursFormat;
    use crate::theme::DialShade;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 15).unwrap()
    }

    fn cell(hour24: f64) -> DialCell {
        DialCell {
            hour12: hour24 % 12.0,
            hour24,
            is_new_day: false,
            is_last_hour: false,
            date: date(),
            meridian: Meridian::from_hour24(hour24),
            shade: DialShade::for_hour(hour24),
        }
    }

    fn row_with(column: usize, hour24: f64) -> Vec<DialCell> {
        let mut cells: Vec<DialCell> = (0..24).map(|i| cell(i as f64 + 1.0)).collect();
        cells[column] = cell(hour24);
        cells
    }

    fn start_label(dials: &[DialCell], index: f64) -> String {
        let window = MeetingWindow::new(index, index).unwrap();
        window_to_times(dials, &window).unwrap().start.time_label()
    }

    #[test]
    fn half_offset_and_half_column_land_on_next_hour() {
        assert_eq!(start_label(&row_with(3, 9.5), 3.5), "10:00 AM");
    }

    #[test]
    fn half_column_adds_thirty_minutes() {
        assert_eq!(start_label(&row_with(3, 9.0), 3.5), "9:30 AM");
    }

    #[test]
    fn half_offset_on_whole_column_is_half_past() {
        assert_eq!(start_label(&row_with(3, 9.5), 3.0), "9:30 AM");
    }

    #[test]
    fn whole_offset_on_whole_column_is_on_the_hour() {
        assert_eq!(start_label(&row_with(3, 9.0), 3.0), "9:00 AM");
    }

    #[test]
    fn half_past_midnight_advances_to_one() {
        assert_eq!(start_label(&row_with(5, 24.5), 5.5), "1:00 AM");
    }

    #[test]
    fn indices_wrap_by_row_length() {
        let row = generate_dials(14, -7.0, HoursFormat::TwentyFour, date()).unwrap();
        let base = MeetingWindow::new(2.5, 6.0).unwrap();
        let expected = window_to_times(&row.cells, &base).unwrap();

        for k in 1..4 {
            let shift = 24.0 * f64::from(k);
            let wrapped = MeetingWindow::new(2.5 + shift, 6.0 + shift).unwrap();
            assert_eq!(window_to_times(&row.cells, &wrapped).unwrap(), expected);
        }
    }

    #[test]
    fn times_carry_cell_dates() {
        let row = generate_dials(22, 1.0, HoursFormat::TwentyFour, date()).unwrap();
        let window = MeetingWindow::new(1.0, 3.0).unwrap();
        let times = window_to_times(&row.cells, &window).unwrap();

        assert_eq!(times.start.time_label(), "23:00 PM");
        assert_eq!(times.start.date_label(), "Mon, Jan 15");
        assert_eq!(times.end.time_label(), "1:00 AM");
        assert_eq!(times.end.date_label(), "Tue, Jan 16");
    }

    #[test]
    fn empty_dials_are_rejected() {
        let window = MeetingWindow::default();
        assert_eq!(window_to_times(&[], &window), Err(WindowError::EmptyDials));
    }

    #[test]
    fn drag_from_right_half_is_biased() {
        let window = pixel_drag_to_window(0.0, 34.0, 34.0, ColumnSide::Right).unwrap();
        assert_eq!(window, MeetingWindow::new(0.5, 1.5).unwrap());

        let window = pixel_drag_to_window(68.0, 170.0, 34.0, ColumnSide::Left).unwrap();
        assert_eq!((window.start(), window.end()), (2.0, 5.0));
    }

    #[test]
    fn drag_validates_input() {
        assert_eq!(
            pixel_drag_to_window(0.0, 34.0, 0.0, ColumnSide::Left),
            Err(WindowError::InvalidColumnWidth(0.0))
        );
        assert_eq!(
            pixel_drag_to_window(0.0, 34.0, -34.0, ColumnSide::Left),
            Err(WindowError::InvalidColumnWidth(-34.0))
        );
        assert!(matches!(
            pixel_drag_to_window(f64::INFINITY, 34.0, 34.0, ColumnSide::Left),
            Err(WindowError::InvalidPosition(_))
        ));
        assert!(matches!(
            pixel_drag_to_window(68.0, 34.0, 34.0, ColumnSide::Left),
            Err(WindowError::Reversed { .. })
        ));
    }

    #[test]
    fn column_side_splits_at_half_width() {
        assert_eq!(ColumnSide::of(0.0, 34.0), ColumnSide::Left);
        assert_eq!(ColumnSide::of(16.9, 34.0), ColumnSide::Left);
        assert_eq!(ColumnSide::of(17.0, 34.0), ColumnSide::Right);
    }

    #[test]
    fn snapped_width_is_full_or_half() {
        for width in [1.0, 17.0, 33.0, 34.0, 51.0, 340.0] {
            let snapped = snap_frame_width(width, DEFAULT_COLUMN_WIDTH);
            assert!(snapped == DEFAULT_COLUMN_WIDTH || snapped == HALF_COLUMN_WIDTH);
        }
        assert_eq!(snap_frame_width(34.0, 34.0), 17.0);
        assert_eq!(snap_frame_width(17.0, 34.0), 34.0);
    }

    #[test]
    fn drag_frame_grows_in_half_columns() {
        let fit = fit_drag_frame(60.0, 2.0, 34.0).unwrap();

        assert_eq!(fit.frame_width, 51.0);
        assert_eq!(fit.window, MeetingWindow::new(2.0, 3.5).unwrap());
    }

    #[test]
    fn short_drag_keeps_one_half_column() {
        let fit = fit_drag_frame(5.0, 2.0, 34.0).unwrap();

        assert_eq!(fit.frame_width, 17.0);
        assert_eq!(fit.window, MeetingWindow::new(2.0, 2.5).unwrap());

        let backwards = fit_drag_frame(-40.0, 2.0, 34.0).unwrap();
        assert_eq!(backwards.frame_width, 17.0);
    }

    #[test]
    fn drag_frame_clamps_past_row_end() {
        // 2 columns requested from column 22: 2 <= 23 + 1 - 22 holds.
        let fit = fit_drag_frame(68.0, 22.0, 34.0).unwrap();
        assert_eq!(fit.frame_width, 68.0);

        // 2.5 columns requested from column 22 overruns.
        let fit = fit_drag_frame(85.0, 22.0, 34.0).unwrap();
        assert_eq!(fit.frame_width, 17.0);
        assert_eq!(fit.window.end(), 24.5);
    }

    #[test]
    fn session_release_snaps_frame() {
        let mut session = DragSession::begin(68.0, ColumnSide::Right, 85.0, 34.0).unwrap();
        assert_eq!(session.left_index(), 2.5);

        session.update(170.0).unwrap();
        let outcome = session.release();

        assert_eq!(outcome.frame_width, 34.0);
        assert_eq!(outcome.window, MeetingWindow::new(2.5, 5.0).unwrap());
    }

    #[test]
    fn click_without_drag_toggles_to_half_column() {
        let session = DragSession::begin(0.0, ColumnSide::Left, 3.0, 34.0).unwrap();
        let outcome = session.release();

        assert_eq!(outcome.frame_width, 17.0);
        assert_eq!(outcome.window, MeetingWindow::new(0.0, 0.5).unwrap());
    }

    #[test]
    fn window_moves_and_resizes_in_halves() {
        let window = MeetingWindow::new(1.0, 2.0).unwrap();

        assert_eq!(window.shifted(0.5), MeetingWindow::new(1.5, 2.5).unwrap());
        assert_eq!(window.shifted(-3.0), MeetingWindow::new(0.0, 1.0).unwrap());
        assert_eq!(window.resized(-2.0), MeetingWindow::new(1.0, 1.5).unwrap());
        assert_eq!(window.resized(1.5), MeetingWindow::new(1.0, 3.5).unwrap());
    }

    #[test]
    fn stored_window_is_validated() {
        let window: MeetingWindow = toml::from_str("start = 1.5\nend = 3.0").unwrap();
        assert_eq!(window, MeetingWindow::new(1.5, 3.0).unwrap());

        let reversed = toml::from_str::<MeetingWindow>("start = 3.0\nend = 1.0").unwrap_err();
        assert!(reversed.to_string().contains("precedes start"));

        let encoded = toml::to_string(&window).unwrap();
        assert_eq!(toml::from_str::<MeetingWindow>(&encoded).unwrap(), window);
    }

    #[test]
    fn coverage_wraps_around_row() {
        let window = MeetingWindow::new(22.5, 25.0).unwrap();

        assert!(!window.covers(22.0, 24));
        assert!(window.covers(22.5, 24));
        assert!(window.covers(23.5, 24));
        assert!(window.covers(0.5, 24));
        assert!(!window.covers(1.0, 24));
    }
}
