use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Clock display mode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HoursFormat {
    #[serde(rename = "12")]
    Twelve,
    #[default]
    #[serde(rename = "24")]
    TwentyFour,
}

impl HoursFormat {
    /// The modulus hour values are reduced by in this mode.
    pub fn modulus(self) -> f64 {
        match self {
            HoursFormat::Twelve => 12.0,
            HoursFormat::TwentyFour => 24.0,
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            HoursFormat::Twelve => HoursFormat::TwentyFour,
            HoursFormat::TwentyFour => HoursFormat::Twelve,
        }
    }
}

impl FromStr for HoursFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "12" | "12h" => Ok(HoursFormat::Twelve),
            "24" | "24h" => Ok(HoursFormat::TwentyFour),
            _ => Err(format!("unknown hours format: {}", s)),
        }
    }
}

impl fmt::Display for HoursFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HoursFormat::Twelve => write!(f, "12"),
            HoursFormat::TwentyFour => write!(f, "24"),
        }
    }
}

/// Ante or post meridiem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Meridian {
    Am,
    Pm,
}

impl Meridian {
    /// Meridian of a 24h dial value. Midnight is shown as 24 (or 24.5), which is AM.
    pub fn from_hour24(hour: f64) -> Self {
        let whole = hour.floor().rem_euclid(24.0);
        if (12.0..24.0).contains(&whole) {
            Meridian::Pm
        } else {
            Meridian::Am
        }
    }
}

impl fmt::Display for Meridian {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Meridian::Am => write!(f, "AM"),
            Meridian::Pm => write!(f, "PM"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_hours_format() {
        assert_eq!("12".parse::<HoursFormat>().unwrap(), HoursFormat::Twelve);
        assert_eq!("24H".parse::<HoursFormat>().unwrap(), HoursFormat::TwentyFour);
        assert!("13".parse::<HoursFormat>().is_err());
    }

    #[test]
    fn toggle_round_trips() {
        assert_eq!(HoursFormat::Twelve.toggled(), HoursFormat::TwentyFour);
        assert_eq!(HoursFormat::TwentyFour.toggled().toggled(), HoursFormat::TwentyFour);
    }

    #[test]
    fn meridian_at_day_edges() {
        assert_eq!(Meridian::from_hour24(24.0), Meridian::Am);
        assert_eq!(Meridian::from_hour24(24.5), Meridian::Am);
        assert_eq!(Meridian::from_hour24(11.5), Meridian::Am);
        assert_eq!(Meridian::from_hour24(12.0), Meridian::Pm);
        assert_eq!(Meridian::from_hour24(23.5), Meridian::Pm);
    }
}
