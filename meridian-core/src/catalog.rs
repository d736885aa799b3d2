//! Searchable catalog of every zone in the IANA database.

use chrono::{DateTime, Utc};
use chrono_tz::{TZ_VARIANTS, Tz};
use log::warn;

use crate::format::HoursFormat;
use crate::timezone::Timezone;

/// Number of matches a search returns.
pub const SEARCH_LIMIT: usize = 10;

const EXACT: u32 = 1000;
const CITY_EXACT: u32 = 900;
const CITY_PREFIX: u32 = 800;
const PREFIX: u32 = 700;
const SUBSTRING: u32 = 600;
const SUBSEQUENCE: u32 = 300;

fn normalize(s: &str) -> String {
    s.trim().to_lowercase().replace('_', " ")
}

fn penalty(n: usize) -> u32 {
    n.min(99) as u32
}

fn subsequence_score(query: &str, candidate: &str) -> Option<u32> {
    let mut positions = candidate.chars().enumerate();
    let mut previous: Option<usize> = None;
    let mut gaps = 0;

    for wanted in query.chars() {
        let (pos, _) = positions.by_ref().find(|(_, c)| *c == wanted)?;
        gaps += match previous {
            Some(prev) => pos - prev - 1,
            None => pos,
        };
        previous = Some(pos);
    }

    Some(SUBSEQUENCE - penalty(gaps) * 2)
}

/// Scores `query` against `candidate`; higher is better.
///
/// Matching is case-insensitive and treats `_` as a space, so "new york" finds
/// "America/New_York". Returns `None` unless every query character appears in
/// order.
pub fn match_score(query: &str, candidate: &str) -> Option<u32> {
    let query = normalize(query);
    if query.is_empty() {
        return None;
    }
    let candidate = normalize(candidate);
    let city = candidate.rsplit('/').next().unwrap_or(&candidate);

    if candidate == query {
        Some(EXACT)
    } else if city == query {
        Some(CITY_EXACT)
    } else if city.starts_with(&query) {
        Some(CITY_PREFIX - penalty(city.len() - query.len()))
    } else if candidate.starts_with(&query) {
        Some(PREFIX - penalty(candidate.len() - query.len()))
    } else if let Some(pos) = candidate.find(&query) {
        Some(SUBSTRING - penalty(pos))
    } else {
        subsequence_score(&query, &candidate)
    }
}

/// All zones with their current clocks.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    zones: Vec<Timezone>,
}

impl Catalog {
    pub fn populate(now: DateTime<Utc>, format: HoursFormat, home: Tz) -> Self {
        let zones = TZ_VARIANTS
            .iter()
            .filter_map(|tz| match Timezone::from_tz(*tz, now, format, home) {
                Ok(zone) => Some(zone),
                Err(e) => {
                    warn!("skipping {}: {}", tz.name(), e);
                    None
                }
            })
            .collect();

        Self { zones }
    }

    pub fn from_zones(zones: Vec<Timezone>) -> Self {
        Self { zones }
    }

    pub fn len(&self) -> usize {
        self.zones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.zones.is_empty()
    }

    pub fn zones(&self) -> &[Timezone] {
        &self.zones
    }

    pub fn get(&self, name: &str) -> Option<&Timezone> {
        self.zones.iter().find(|z| z.name == name)
    }

    /// Top matches for `query` over zone names and abbreviations.
    pub fn search(&self, query: &str) -> Vec<&Timezone> {
        self.search_limit(query, SEARCH_LIMIT)
    }

    pub fn search_limit(&self, query: &str, limit: usize) -> Vec<&Timezone> {
        let mut ranked: Vec<(u32, &Timezone)> = self
            .zones
            .iter()
            .filter_map(|zone| {
                let score = match_score(query, &zone.name)
                    .into_iter()
                    .chain(match_score(query, &zone.abbr))
                    .max()?;
                Some((score, zone))
            })
            .collect();

        ranked.sort_by(|a, b| b.0.cmp(&a.0).then_with(|| a.1.name.cmp(&b.1.name)));
        ranked.into_iter().take(limit).map(|(_, zone)| zone).collect()
    }

    /// Recomputes every clock; dial rows are not touched.
    pub fn refresh(&mut self, now: DateTime<Utc>, format: HoursFormat, home: Tz) {
        for zone in &mut self.zones {
            zone.refresh_clock(now, format, home);
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn catalog() -> Catalog {
        let now = Utc.with_ymd_and_hms(2024, 1, 15, 12, 0, 0).unwrap();
        Catalog::populate(now, HoursFormat::TwentyFour, Tz::UTC)
    }

    #[test]
    fn score_ordering() {
        let exact = match_score("utc", "UTC").unwrap();
        let city = match_score("warsaw", "Europe/Warsaw").unwrap();
        let city_prefix = match_score("wars", "Europe/Warsaw").unwrap();
        let substring = match_score("rope/war", "Europe/Warsaw").unwrap();
        let fuzzy = match_score("erwa", "Europe/Warsaw").unwrap();

        assert!(exact > city);
        assert!(city > city_prefix);
        assert!(city_prefix > substring);
        assert!(substring > fuzzy);
    }

    #[test]
    fn no_match_without_subsequence() {
        assert_eq!(match_score("xyz", "Europe/Warsaw"), None);
        assert_eq!(match_score("   ", "Europe/Warsaw"), None);
    }

    #[test]
    fn underscores_match_spaces() {
        assert_eq!(match_score("New York", "America/New_York"), Some(CITY_EXACT));
    }

    #[test]
    fn populates_every_variant() {
        let catalog = catalog();
        assert_eq!(catalog.len(), TZ_VARIANTS.len());
        assert!(catalog.get("Asia/Kolkata").is_some());
    }

    #[test]
    fn search_finds_city() {
        let catalog = catalog();
        let results = catalog.search("kolkata");
        assert_eq!(results[0].name, "Asia/Kolkata");
    }

    #[test]
    fn search_matches_abbreviation() {
        let catalog = catalog();
        let results = catalog.search("IST");

        assert!(results.iter().any(|z| z.name == "Asia/Kolkata"));
        assert_eq!(results[0].abbr, "IST");
    }

    #[test]
    fn search_is_limited_and_empty_query_finds_nothing() {
        let catalog = catalog();

        assert_eq!(catalog.search("a").len(), SEARCH_LIMIT);
        assert!(catalog.search("").is_empty());
    }
}
