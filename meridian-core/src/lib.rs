//! Meridian compares wall-clock time across world timezones on a shared hour grid.
//!
//! Core concepts:
//! - **Dial**: a strip of 24 hour columns for one timezone, aligned with every other strip
//! - **Timezone**: a zone record (clock, date, offset) that owns its dial row
//! - **Meeting window**: a column range selected across all dials at once
//! - **Board**: the store holding selected zones, hours format, theme and window
//! - **Catalog**: every known zone, searchable by name or abbreviation
//!
//! # Example
//!
//! ```
//! use chrono::NaiveDate;
//! use meridian_core::{generate_dials, window_to_times, HoursFormat, MeetingWindow};
//!
//! let date = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
//! let dials = generate_dials(14, -7.0, HoursFormat::TwentyFour, date).unwrap();
//! assert_eq!(dials.cells[10].hour24, 24.0);
//! assert!(dials.cells[10].is_new_day);
//!
//! let window = MeetingWindow::new(0.5, 1.5).unwrap();
//! let times = window_to_times(&dials.cells, &window).unwrap();
//! assert_eq!(times.start.time_label(), "14:30 PM");
//! ```

mod board;
mod catalog;
mod clock;
mod dial;
mod error;
mod format;
mod theme;
mod timezone;
mod window;

pub use board::{Board, BoardEvent};
pub use catalog::{Catalog, SEARCH_LIMIT, match_score};
pub use clock::{Clock, FixedClock, MILLIS_PER_MINUTE, SystemClock, Tick, Ticker, millis_until_next_minute};
pub use dial::{
    DIAL_COLUMNS, DialCache, DialCell, DialError, DialLabel, DialRow, LAST_COLUMN_INDEX,
    generate_dials, is_fractional, reduce_hour,
};
pub use error::CoreError;
pub use format::{HoursFormat, Meridian};
pub use theme::{DialShade, DialTheme, Rgb};
pub use timezone::{Timezone, difference_from_home, format_clock, utc_offset_hours};
pub use window::{
    ColumnSide, DEFAULT_COLUMN_WIDTH, DragOutcome, DragSession, FrameFit, HALF_COLUMN_WIDTH,
    MeetingTime, MeetingTimes, MeetingWindow, WindowError, fit_drag_frame, pixel_drag_to_window,
    snap_frame_width, window_to_times,
};
