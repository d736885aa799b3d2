//! The board: selected zones, display settings and the shared meeting window.
//!
//! State changes go through `Board` methods, which replace values wholesale and
//! then notify subscribers with a [`BoardEvent`]. Dial rows are regenerated
//! explicitly when the format, zone list or anchor date changes.

use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;
use log::debug;

use crate::dial::DialCache;
use crate::error::CoreError;
use crate::format::HoursFormat;
use crate::theme::DialTheme;
use crate::timezone::Timezone;
use crate::window::{MeetingTimes, MeetingWindow, WindowError, window_to_times};

/// A change made to the board.
#[derive(Debug, Clone, PartialEq)]
pub enum BoardEvent {
    ZoneAdded(String),
    ZoneRemoved(String),
    ZonesReordered,
    FormatChanged(HoursFormat),
    ThemeChanged(DialTheme),
    WindowChanged(MeetingWindow),
    DateSelected(NaiveDate),
    ClockTicked,
}

type Subscriber = Box<dyn FnMut(&BoardEvent) + Send>;

pub struct Board {
    zones: Vec<Timezone>,
    home: Tz,
    format: HoursFormat,
    theme: DialTheme,
    window: MeetingWindow,
    selected_date: Option<NaiveDate>,
    cache: DialCache,
    subscribers: Vec<Subscriber>,
}

impl Board {
    pub fn new(home: Tz, format: HoursFormat, theme: DialTheme) -> Self {
        Self {
            zones: Vec::new(),
            home,
            format,
            theme,
            window: MeetingWindow::default(),
            selected_date: None,
            cache: DialCache::new(),
            subscribers: Vec::new(),
        }
    }

    pub fn zones(&self) -> &[Timezone] {
        &self.zones
    }

    pub fn zone_names(&self) -> Vec<String> {
        self.zones.iter().map(|z| z.name.clone()).collect()
    }

    pub fn home(&self) -> Tz {
        self.home
    }

    pub fn format(&self) -> HoursFormat {
        self.format
    }

    pub fn theme(&self) -> DialTheme {
        self.theme
    }

    pub fn window(&self) -> MeetingWindow {
        self.window
    }

    pub fn selected_date(&self) -> Option<NaiveDate> {
        self.selected_date
    }

    /// Registers a callback run after every board change.
    pub fn subscribe<F>(&mut self, subscriber: F)
    where
        F: FnMut(&BoardEvent) + Send + 'static,
    {
        self.subscribers.push(Box::new(subscriber));
    }

    fn notify(&mut self, event: BoardEvent) {
        debug!("board event: {:?}", event);
        for subscriber in &mut self.subscribers {
            subscriber(&event);
        }
    }

    /// Days between the selected date and the home zone's current date.
    fn day_shift(&self, now: DateTime<Utc>) -> i64 {
        match self.selected_date {
            Some(date) => (date - now.with_timezone(&self.home).date_naive()).num_days(),
            None => 0,
        }
    }

    fn regenerate_dials(&mut self, now: DateTime<Utc>) -> Result<(), CoreError> {
        let day_shift = self.day_shift(now);
        for zone in &mut self.zones {
            zone.regenerate_dials(now, self.format, day_shift, &mut self.cache)?;
        }
        Ok(())
    }

    /// Adds a zone by IANA name. Returns `false` when it is already on the board.
    pub fn add(&mut self, name: &str, now: DateTime<Utc>) -> Result<bool, CoreError> {
        if self.zones.iter().any(|z| z.name == name) {
            return Ok(false);
        }

        let mut zone = Timezone::resolve(name, now, self.format, self.home)?;
        zone.regenerate_dials(now, self.format, self.day_shift(now), &mut self.cache)?;
        self.zones.push(zone);
        self.notify(BoardEvent::ZoneAdded(name.to_string()));
        Ok(true)
    }

    pub fn remove(&mut self, name: &str) -> bool {
        let before = self.zones.len();
        self.zones.retain(|z| z.name != name);
        if self.zones.len() == before {
            return false;
        }
        self.notify(BoardEvent::ZoneRemoved(name.to_string()));
        true
    }

    /// Moves the zone at `from` to position `to`.
    pub fn reorder(&mut self, from: usize, to: usize) -> bool {
        if from >= self.zones.len() || to >= self.zones.len() || from == to {
            return false;
        }
        let zone = self.zones.remove(from);
        self.zones.insert(to, zone);
        self.notify(BoardEvent::ZonesReordered);
        true
    }

    pub fn set_format(&mut self, format: HoursFormat, now: DateTime<Utc>) -> Result<(), CoreError> {
        self.format = format;
        for zone in &mut self.zones {
            zone.refresh_clock(now, format, self.home);
        }
        self.regenerate_dials(now)?;
        self.notify(BoardEvent::FormatChanged(format));
        Ok(())
    }

    pub fn toggle_format(&mut self, now: DateTime<Utc>) -> Result<(), CoreError> {
        self.set_format(self.format.toggled(), now)
    }

    pub fn set_theme(&mut self, theme: DialTheme) {
        self.theme = theme;
        self.notify(BoardEvent::ThemeChanged(theme));
    }

    pub fn cycle_theme(&mut self) {
        self.set_theme(self.theme.next());
    }

    pub fn set_window(&mut self, window: MeetingWindow) {
        self.window = window;
        self.notify(BoardEvent::WindowChanged(window));
    }

    /// Anchors every dial row on `date` as seen from the home zone.
    pub fn select_date(&mut self, date: NaiveDate, now: DateTime<Utc>) -> Result<(), CoreError> {
        self.selected_date = Some(date);
        self.regenerate_dials(now)?;
        self.notify(BoardEvent::DateSelected(date));
        Ok(())
    }

    /// Refreshes every clock. Dial rows follow the new local hour.
    pub fn tick(&mut self, now: DateTime<Utc>) -> Result<(), CoreError> {
        for zone in &mut self.zones {
            zone.refresh_clock(now, self.format, self.home);
        }
        self.regenerate_dials(now)?;
        self.notify(BoardEvent::ClockTicked);
        Ok(())
    }

    /// Start and end times of the shared window for every zone, in board order.
    pub fn meeting_times(&self) -> Result<Vec<(&Timezone, MeetingTimes)>, WindowError> {
        self.zones
            .iter()
            .map(|zone| Ok((zone, window_to_times(&zone.dials.cells, &self.window)?)))
            .collect()
    }
}
