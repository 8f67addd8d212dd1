//! Calendar month handling for seasonality and projection timing

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ForecastError;

/// Calendar month, numbered 1-12
///
/// Every month-keyed table in the crate is indexed by this enum so that
/// numeric and textual month keys can never drift apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CalendarMonth {
    January = 1,
    February = 2,
    March = 3,
    April = 4,
    May = 5,
    June = 6,
    July = 7,
    August = 8,
    September = 9,
    October = 10,
    November = 11,
    December = 12,
}

impl CalendarMonth {
    /// All months in calendar order
    pub const ALL: [CalendarMonth; 12] = [
        CalendarMonth::January,
        CalendarMonth::February,
        CalendarMonth::March,
        CalendarMonth::April,
        CalendarMonth::May,
        CalendarMonth::June,
        CalendarMonth::July,
        CalendarMonth::August,
        CalendarMonth::September,
        CalendarMonth::October,
        CalendarMonth::November,
        CalendarMonth::December,
    ];

    /// Month from its number (1 = January)
    pub fn from_number(number: u32) -> Option<Self> {
        if (1..=12).contains(&number) {
            Some(Self::ALL[(number - 1) as usize])
        } else {
            None
        }
    }

    /// Month of a date
    pub fn of(date: NaiveDate) -> Self {
        // chrono guarantees month() in 1..=12
        Self::ALL[date.month0() as usize]
    }

    /// Month number (1 = January)
    pub fn number(self) -> u32 {
        self as u32
    }

    /// Zero-based index for array lookups
    pub fn index(self) -> usize {
        self as usize - 1
    }

    /// Month `n` steps later, wrapping at December
    pub fn plus(self, n: u32) -> Self {
        Self::ALL[(self.index() + n as usize) % 12]
    }

    /// Following month
    pub fn next(self) -> Self {
        self.plus(1)
    }

    /// Calendar quarter (1-4)
    pub fn quarter(self) -> u32 {
        (self.number() - 1) / 3 + 1
    }

    /// Three-letter English abbreviation
    pub fn short_name(self) -> &'static str {
        match self {
            CalendarMonth::January => "Jan",
            CalendarMonth::February => "Feb",
            CalendarMonth::March => "Mar",
            CalendarMonth::April => "Apr",
            CalendarMonth::May => "May",
            CalendarMonth::June => "Jun",
            CalendarMonth::July => "Jul",
            CalendarMonth::August => "Aug",
            CalendarMonth::September => "Sep",
            CalendarMonth::October => "Oct",
            CalendarMonth::November => "Nov",
            CalendarMonth::December => "Dec",
        }
    }
}

impl fmt::Display for CalendarMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.short_name())
    }
}

impl FromStr for CalendarMonth {
    type Err = ForecastError;

    /// Accepts a month number ("12") or an English name/abbreviation ("Dec", "december")
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if let Ok(number) = trimmed.parse::<u32>() {
            return Self::from_number(number)
                .ok_or_else(|| ForecastError::Parse(format!("month out of range: {}", trimmed)));
        }
        let lower = trimmed.to_ascii_lowercase();
        Self::ALL
            .iter()
            .copied()
            .find(|m| lower.len() >= 3 && m.full_name().to_ascii_lowercase().starts_with(&lower))
            .ok_or_else(|| ForecastError::Parse(format!("unknown month: {}", trimmed)))
    }
}

impl CalendarMonth {
    fn full_name(self) -> &'static str {
        match self {
            CalendarMonth::January => "January",
            CalendarMonth::February => "February",
            CalendarMonth::March => "March",
            CalendarMonth::April => "April",
            CalendarMonth::May => "May",
            CalendarMonth::June => "June",
            CalendarMonth::July => "July",
            CalendarMonth::August => "August",
            CalendarMonth::September => "September",
            CalendarMonth::October => "October",
            CalendarMonth::November => "November",
            CalendarMonth::December => "December",
        }
    }
}

/// A (year, month) pair used to key monthly aggregates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct YearMonth {
    pub year: i32,
    pub month: CalendarMonth,
}

impl YearMonth {
    pub fn new(year: i32, month: CalendarMonth) -> Self {
        Self { year, month }
    }

    pub fn of(date: NaiveDate) -> Self {
        Self::new(date.year(), CalendarMonth::of(date))
    }

    /// Month `n` steps later, rolling the year
    pub fn plus(self, n: u32) -> Self {
        let zero_based = self.month.index() as u32 + n;
        Self {
            year: self.year + (zero_based / 12) as i32,
            month: self.month.plus(n),
        }
    }

    /// Label such as "Nov 2025"
    pub fn label(&self) -> String {
        format!("{} {}", self.month, self.year)
    }
}
