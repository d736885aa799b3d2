use chrono::{DateTime, NaiveDate, Offset, TimeZone, Timelike, Utc};
use chrono_tz::Tz;

use crate::dial::{DialCache, DialError, DialRow, generate_dials};
use crate::error::CoreError;
use crate::format::{HoursFormat, Meridian};

/// A timezone as shown on the board: its clock, date and dial row.
#[derive(Debug, Clone, PartialEq)]
pub struct Timezone {
    tz: Tz,
    pub name: String,
    /// UTC offset in "UTC+05:30" form.
    pub value: String,
    pub abbr: String,
    pub day_of_week: String,
    pub month_and_day: String,
    pub year: String,
    pub clock: String,
    /// Offset from UTC in hours, fractional for half-hour zones.
    pub offset: f64,
    pub diff_hours_from_home: String,
    pub dials: DialRow,
}

/// Offset of `local` from UTC in hours.
pub fn utc_offset_hours<T: TimeZone>(local: &DateTime<T>) -> f64 {
    f64::from(local.offset().fix().local_minus_utc()) / 3600.0
}

/// Clock string for a local time. The 24h form shows midnight as hour 24.
pub fn format_clock<T: TimeZone>(local: &DateTime<T>, format: HoursFormat) -> String {
    let meridian = Meridian::from_hour24(f64::from(local.hour()));
    let hour = match format {
        HoursFormat::TwentyFour if local.hour() == 0 => 24,
        HoursFormat::TwentyFour => local.hour(),
        HoursFormat::Twelve => local.hour12().1,
    };
    format!("{}:{:02} {}", hour, local.minute(), meridian)
}

/// Signed hour difference of `other` relative to `home`, e.g. "+5.5" or "-3".
pub fn difference_from_home(other: Tz, home: Tz, now: DateTime<Utc>) -> String {
    let diff = utc_offset_hours(&now.with_timezone(&other))
        - utc_offset_hours(&now.with_timezone(&home));
    if diff >= 0.0 {
        format!("+{}", diff.abs())
    } else {
        format!("{}", diff)
    }
}

impl Timezone {
    /// Looks up an IANA name and builds its record at `now`.
    pub fn resolve(
        name: &str,
        now: DateTime<Utc>,
        format: HoursFormat,
        home: Tz,
    ) -> Result<Self, CoreError> {
        let tz: Tz = name
            .parse()
            .map_err(|_| CoreError::UnknownTimezone(name.to_string()))?;
        Ok(Self::from_tz(tz, now, format, home)?)
    }

    pub fn from_tz(
        tz: Tz,
        now: DateTime<Utc>,
        format: HoursFormat,
        home: Tz,
    ) -> Result<Self, DialError> {
        let local = now.with_timezone(&tz);
        let offset = utc_offset_hours(&local);
        let dials = generate_dials(local.hour(), offset, format, local.date_naive())?;

        let mut record = Self {
            tz,
            name: tz.name().to_string(),
            value: local.format("UTC%:z").to_string(),
            abbr: local.format("%Z").to_string(),
            day_of_week: String::new(),
            month_and_day: String::new(),
            year: String::new(),
            clock: String::new(),
            offset,
            diff_hours_from_home: String::new(),
            dials,
        };
        record.refresh_clock(now, format, home);
        Ok(record)
    }

    pub fn tz(&self) -> Tz {
        self.tz
    }

    /// Recomputes the clock, date fields and offset at `now`. Dials are left alone.
    pub fn refresh_clock(&mut self, now: DateTime<Utc>, format: HoursFormat, home: Tz) {
        let local = now.with_timezone(&self.tz);

        self.clock = format_clock(&local, format);
        self.day_of_week = local.format("%a").to_string();
        self.month_and_day = local.format("%b %-d").to_string();
        self.year = local.format("%Y").to_string();
        self.abbr = local.format("%Z").to_string();
        self.value = local.format("UTC%:z").to_string();
        self.offset = utc_offset_hours(&local);
        self.diff_hours_from_home = difference_from_home(self.tz, home, now);
    }

    /// Local hour and date the dial row starts from, with the date moved by
    /// `day_shift` days.
    pub fn anchor(&self, now: DateTime<Utc>, day_shift: i64) -> (u32, NaiveDate) {
        let local = now.with_timezone(&self.tz);
        let date = local.date_naive();
        let shifted = date
            .checked_add_signed(chrono::Duration::days(day_shift))
            .unwrap_or(date);
        (local.hour(), shifted)
    }

    /// Replaces the dial row, reusing cached rows for the same offset and anchor.
    pub fn regenerate_dials(
        &mut self,
        now: DateTime<Utc>,
        format: HoursFormat,
        day_shift: i64,
        cache: &mut DialCache,
    ) -> Result<(), DialError> {
        let (start_hour, start_date) = self.anchor(now, day_shift);
        self.dials = cache.get_or_generate(start_hour, self.offset, format, start_date)?;
        Ok(())
    }
}
