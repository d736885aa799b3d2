use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Background classification of a dial column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DialShade {
    Night,
    Dawn,
    Day,
    Dusk,
    NewDay,
}

impl DialShade {
    /// Shade of a column from its 24h dial value.
    pub fn for_hour(hour24: f64) -> Self {
        match hour24.floor().rem_euclid(24.0) as u32 {
            6..=7 => DialShade::Dawn,
            8..=17 => DialShade::Day,
            18..=21 => DialShade::Dusk,
            _ => DialShade::Night,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

/// User-selectable dial palette.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DialTheme {
    #[default]
    Sky,
    Emerald,
    Rose,
    Mono,
}

const THEMES: &[DialTheme] = &[DialTheme::Sky, DialTheme::Emerald, DialTheme::Rose, DialTheme::Mono];

impl DialTheme {
    pub fn all() -> &'static [DialTheme] {
        THEMES
    }

    pub fn next(self) -> Self {
        let index = THEMES.iter().position(|&t| t == self).unwrap_or(0);
        THEMES[(index + 1) % THEMES.len()]
    }

    pub fn color(self, shade: DialShade) -> Rgb {
        match (self, shade) {
            (_, DialShade::NewDay) => Rgb(99, 102, 241),
            (DialTheme::Sky, DialShade::Night) => Rgb(30, 41, 59),
            (DialTheme::Sky, DialShade::Dawn) => Rgb(125, 211, 252),
            (DialTheme::Sky, DialShade::Day) => Rgb(224, 242, 254),
            (DialTheme::Sky, DialShade::Dusk) => Rgb(56, 189, 248),
            (DialTheme::Emerald, DialShade::Night) => Rgb(6, 78, 59),
            (DialTheme::Emerald, DialShade::Dawn) => Rgb(110, 231, 183),
            (DialTheme::Emerald, DialShade::Day) => Rgb(209, 250, 229),
            (DialTheme::Emerald, DialShade::Dusk) => Rgb(52, 211, 153),
            (DialTheme::Rose, DialShade::Night) => Rgb(136, 19, 55),
            (DialTheme::Rose, DialShade::Dawn) => Rgb(253, 164, 175),
            (DialTheme::Rose, DialShade::Day) => Rgb(255, 228, 230),
            (DialTheme::Rose, DialShade::Dusk) => Rgb(251, 113, 133),
            (DialTheme::Mono, DialShade::Night) => Rgb(39, 39, 42),
            (DialTheme::Mono, DialShade::Dawn) => Rgb(161, 161, 170),
            (DialTheme::Mono, DialShade::Day) => Rgb(244, 244, 245),
            (DialTheme::Mono, DialShade::Dusk) => Rgb(113, 113, 122),
        }
    }

    /// Whether text drawn over `shade` should be light.
    pub fn is_dark(self, shade: DialShade) -> bool {
        let Rgb(r, g, b) = self.color(shade);
        u32::from(r) * 299 + u32::from(g) * 587 + u32::from(b) * 114 < 128_000
    }
}

impl FromStr for DialTheme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "sky" => Ok(DialTheme::Sky),
            "emerald" => Ok(DialTheme::Emerald),
            "rose" => Ok(DialTheme::Rose),
            "mono" => Ok(DialTheme::Mono),
            _ => Err(format!("unknown dial theme: {}", s)),
        }
    }
}

impl fmt::Display for DialTheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DialTheme::Sky => write!(f, "sky"),
            DialTheme::Emerald => write!(f, "emerald"),
            DialTheme::Rose => write!(f, "rose"),
            DialTheme::Mono => write!(f, "mono"),
        }
    }
}
