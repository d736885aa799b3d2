//! Hour dials: one 24-column strip per timezone, aligned across zones.
//!
//! Column `i` of every strip covers the same instant. Zones whose UTC offset has a
//! fractional part are shifted by half an hour so their columns stay aligned with
//! whole-hour zones.

use std::collections::HashMap;

use chrono::{Datelike, NaiveDate};
use log::debug;
use thiserror::Error;

use crate::format::{HoursFormat, Meridian};
use crate::theme::DialShade;

/// Number of hour columns in a dial row.
pub const DIAL_COLUMNS: usize = 24;

pub const LAST_COLUMN_INDEX: usize = DIAL_COLUMNS - 1;

const HALF_HOUR: f64 = 0.5;
const CACHE_CAPACITY: usize = 256;

#[derive(Debug, Error, PartialEq)]
pub enum DialError {
    #[error("start hour {0} is outside 0..=23")]
    StartHourOutOfRange(u32),

    #[error("utc offset {0} is not a finite number")]
    InvalidOffset(f64),
}

pub fn is_fractional(value: f64) -> bool {
    value % 1.0 != 0.0
}

/// Reduces an hour into the displayed range of `format`.
///
/// Zero becomes the modulus (midnight shows as 24, or 12) and a half hour past zero
/// becomes the modulus plus a half, so a row never shows `0` or `0.5`.
pub fn reduce_hour(hour: f64, format: HoursFormat) -> f64 {
    let modulus = format.modulus();
    let reduced = hour % modulus;
    if reduced == HALF_HOUR {
        modulus + HALF_HOUR
    } else if reduced == 0.0 {
        modulus
    } else {
        reduced
    }
}

/// One hour column of a dial row.
#[derive(Debug, Clone, PartialEq)]
pub struct DialCell {
    pub hour12: f64,
    pub hour24: f64,
    pub is_new_day: bool,
    pub is_last_hour: bool,
    pub date: NaiveDate,
    pub meridian: Meridian,
    pub shade: DialShade,
}

/// What a column shows in place of a bare number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DialLabel {
    /// Local midnight: weekday, month and day of the new date.
    NewDay {
        weekday: String,
        month: String,
        day: u32,
    },
    /// Half-hour column: the floored hour over a fixed "30".
    HalfHour(u32),
    Hour(u32),
}

impl DialLabel {
    /// Upper and lower line of the label.
    pub fn lines(&self) -> (String, String) {
        match self {
            DialLabel::NewDay { month, day, .. } => (month.clone(), day.to_string()),
            DialLabel::HalfHour(hour) => (hour.to_string(), "30".to_string()),
            DialLabel::Hour(hour) => (hour.to_string(), String::new()),
        }
    }
}

impl DialCell {
    pub fn hour(&self, format: HoursFormat) -> f64 {
        match format {
            HoursFormat::Twelve => self.hour12,
            HoursFormat::TwentyFour => self.hour24,
        }
    }

    pub fn label(&self, format: HoursFormat) -> DialLabel {
        let hour = self.hour(format);
        if self.is_new_day {
            DialLabel::NewDay {
                weekday: self.date.format("%a").to_string(),
                month: self.date.format("%b").to_string(),
                day: self.date.day(),
            }
        } else if is_fractional(hour) && hour > 1.0 {
            DialLabel::HalfHour(hour.floor() as u32)
        } else {
            DialLabel::Hour(hour.floor() as u32)
        }
    }

    /// Date label in the "Mon, Jan 15" form.
    pub fn date_label(&self) -> String {
        self.date.format("%a, %b %-d").to_string()
    }
}

/// The 24 dial cells of one timezone, generated for a display format.
#[derive(Debug, Clone, PartialEq)]
pub struct DialRow {
    pub format: HoursFormat,
    pub cells: Vec<DialCell>,
}

impl DialRow {
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Hour values in the row's display format.
    pub fn hours(&self) -> Vec<f64> {
        self.cells.iter().map(|c| c.hour(self.format)).collect()
    }

    pub fn new_day_index(&self) -> Option<usize> {
        self.cells.iter().position(|c| c.is_new_day)
    }

    pub fn labels(&self) -> Vec<DialLabel> {
        self.cells.iter().map(|c| c.label(self.format)).collect()
    }
}

/// Generates the dial row starting at local hour `start_hour` on `start_date`.
pub fn generate_dials(
    start_hour: u32,
    utc_offset: f64,
    format: HoursFormat,
    start_date: NaiveDate,
) -> Result<DialRow, DialError> {
    if start_hour > 23 {
        return Err(DialError::StartHourOutOfRange(start_hour));
    }
    if !utc_offset.is_finite() {
        return Err(DialError::InvalidOffset(utc_offset));
    }

    let shift = if is_fractional(utc_offset) { HALF_HOUR } else { 0.0 };
    let next_date = start_date.succ_opt().unwrap_or(start_date);

    let cells = (0..DIAL_COLUMNS)
        .map(|column| {
            let unreduced = start_hour as usize + column;
            let shifted = unreduced as f64 + shift;
            let hour24 = reduce_hour(shifted, HoursFormat::TwentyFour);
            let is_new_day = unreduced % DIAL_COLUMNS == 0;

            DialCell {
                hour12: reduce_hour(shifted, HoursFormat::Twelve),
                hour24,
                is_new_day,
                is_last_hour: column == LAST_COLUMN_INDEX,
                date: if unreduced >= DIAL_COLUMNS { next_date } else { start_date },
                meridian: Meridian::from_hour24(hour24),
                shade: if is_new_day {
                    DialShade::NewDay
                } else {
                    DialShade::for_hour(hour24)
                },
            }
        })
        .collect();

    Ok(DialRow { format, cells })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct DialKey {
    offset_bits: u64,
    format: HoursFormat,
    start_hour: u32,
    start_date: NaiveDate,
}

/// Memoized dial rows keyed on offset, format and anchor.
#[derive(Debug, Default)]
pub struct DialCache {
    rows: HashMap<DialKey, DialRow>,
}

impl DialCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn clear(&mut self) {
        self.rows.clear();
    }

    pub fn get_or_generate(
        &mut self,
        start_hour: u32,
        utc_offset: f64,
        format: HoursFormat,
        start_date: NaiveDate,
    ) -> Result<DialRow, DialError> {
        let key = DialKey {
            offset_bits: utc_offset.to_bits(),
            format,
            start_hour,
            start_date,
        };

        if let Some(row) = self.rows.get(&key) {
            return Ok(row.clone());
        }

        let row = generate_dials(start_hour, utc_offset, format, start_date)?;
        if self.rows.len() >= CACHE_CAPACITY {
            debug!("dial cache full, clearing {} rows", self.rows.len());
            self.rows.clear();
        }
        debug!(
            "generated dials: start_hour={} offset={} format={}",
            start_hour, utc_offset, format
        );
        self.rows.insert(key, row.clone());
        Ok(row)
    }
}
