// Season label resolution ("2025-26") from the calendar date.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use serde::{Serialize, Serializer};
use thiserror::Error;

/// First month (1-based) that belongs to a new season.
const SEASON_START_MONTH: u32 = 10;

/// A basketball season that starts in October of `start_year` and ends in
/// June of the following year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Season {
    start_year: i32,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SeasonParseError {
    #[error("season label must look like YYYY-YY, got `{0}`")]
    Format(String),

    #[error("season label `{label}` should end in -{expected:02}")]
    Mismatch { label: String, expected: i32 },
}

impl Season {
    pub fn from_start_year(start_year: i32) -> Self {
        Self { start_year }
    }

    /// The season in progress on `date`. October onwards belongs to the
    /// season starting that year; January through September belong to the
    /// season that started the previous October.
    pub fn for_date(date: NaiveDate) -> Self {
        let start_year = if date.month() >= SEASON_START_MONTH {
            date.year()
        } else {
            date.year() - 1
        };
        Self { start_year }
    }

    /// The season in progress according to the local wall clock.
    pub fn current() -> Self {
        Self::for_date(chrono::Local::now().date_naive())
    }

    pub fn start_year(&self) -> i32 {
        self.start_year
    }

    /// Two-digit suffix of the year the season ends in.
    pub fn end_suffix(&self) -> i32 {
        (self.start_year + 1).rem_euclid(100)
    }

    pub fn label(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Season {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{:02}", self.start_year, self.end_suffix())
    }
}

impl Serialize for Season {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl FromStr for Season {
    type Err = SeasonParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let format_err = || SeasonParseError::Format(s.to_string());

        let (start, end) = s.split_once('-').ok_or_else(format_err)?;
        if start.len() != 4 || end.len() != 2 {
            return Err(format_err());
        }
        let start_year: i32 = start.parse().map_err(|_| format_err())?;
        let end_suffix: i32 = end.parse().map_err(|_| format_err())?;

        let season = Season { start_year };
        if season.end_suffix() != end_suffix {
            return Err(SeasonParseError::Mismatch {
                label: s.to_string(),
                expected: season.end_suffix(),
            });
        }
        Ok(season)
    }
}
