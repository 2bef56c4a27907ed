use std::collections::BTreeSet;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Calendar bucket size used to scope aggregation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    Month,
    Year,
}

impl Granularity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Granularity::Month => "month",
            Granularity::Year => "year",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "month" | "monthly" => Some(Granularity::Month),
            "year" | "yearly" | "annual" => Some(Granularity::Year),
            _ => None,
        }
    }
}

/// A calendar bucket: one month or one year. Periods are derived from the
/// data on every load, never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Period {
    Month { year: i32, month: u32 },
    Year { year: i32 },
}

impl Period {
    /// The bucket a date falls into at the given granularity.
    pub fn of(date: NaiveDate, granularity: Granularity) -> Self {
        match granularity {
            Granularity::Month => Period::Month {
                year: date.year(),
                month: date.month(),
            },
            Granularity::Year => Period::Year { year: date.year() },
        }
    }

    pub fn granularity(&self) -> Granularity {
        match self {
            Period::Month { .. } => Granularity::Month,
            Period::Year { .. } => Granularity::Year,
        }
    }

    /// First day of the bucket. Months are validated at construction, so
    /// the date here always exists.
    pub fn start(&self) -> NaiveDate {
        match *self {
            Period::Month { year, month } => NaiveDate::from_ymd_opt(year, month, 1).unwrap(),
            Period::Year { year } => NaiveDate::from_ymd_opt(year, 1, 1).unwrap(),
        }
    }

    /// Membership test: a month bucket matches on (year, month), a year
    /// bucket on the year alone.
    pub fn contains(&self, date: NaiveDate) -> bool {
        match *self {
            Period::Month { year, month } => date.year() == year && date.month() == month,
            Period::Year { year } => date.year() == year,
        }
    }
}

// Periods are ordered by their start instant. Buckets of one granularity
// are disjoint, so ties only occur across granularities; the year bucket
// sorts first there to keep the order total and deterministic.
impl Ord for Period {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.start()
            .cmp(&other.start())
            .then_with(|| match (self, other) {
                (Period::Year { .. }, Period::Month { .. }) => std::cmp::Ordering::Less,
                (Period::Month { .. }, Period::Year { .. }) => std::cmp::Ordering::Greater,
                _ => std::cmp::Ordering::Equal,
            })
    }
}

impl PartialOrd for Period {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl std::fmt::Display for Period {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match *self {
            Period::Month { year, month } => write!(f, "{:04}-{:02}", year, month),
            Period::Year { year } => write!(f, "{:04}", year),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid period '{0}', expected YYYY or YYYY-MM")]
pub struct ParsePeriodError(String);

impl FromStr for Period {
    type Err = ParsePeriodError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ParsePeriodError(s.to_string());
        match s.split_once('-') {
            Some((year, month)) => {
                let year: i32 = year.parse().map_err(|_| invalid())?;
                let month: u32 = month.parse().map_err(|_| invalid())?;
                if !(1..=12).contains(&month) {
                    return Err(invalid());
                }
                Ok(Period::Month { year, month })
            }
            None => {
                let year: i32 = s.parse().map_err(|_| invalid())?;
                Ok(Period::Year { year })
            }
        }
    }
}

/// Derive the distinct periods covered by the given dates, most recent
/// first. This is what a period selector offers the user.
pub fn derive_periods(
    dates: impl IntoIterator<Item = NaiveDate>,
    granularity: Granularity,
) -> Vec<Period> {
    let buckets: BTreeSet<Period> = dates
        .into_iter()
        .map(|date| Period::of(date, granularity))
        .collect();
    buckets.into_iter().rev().collect()
}
