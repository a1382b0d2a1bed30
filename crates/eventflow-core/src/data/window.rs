//! Calendar dates and the date window used to slice event graphs.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::data::errors::EventGraphError;

/// Recency scale used when the window has zero width.
pub const ZERO_WIDTH_SCALE: f64 = 0.0;

/// Parses an ISO `yyyy-mm-dd` date. A leading `-` marks a year before the
/// common era (`-0044-03-15`).
pub fn parse_iso_date(raw: &str) -> Result<NaiveDate, EventGraphError> {
    let invalid = || EventGraphError::InvalidDate(raw.to_string());
    let trimmed = raw.trim();
    let (negative, body) = match trimmed.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, trimmed),
    };

    let mut parts = body.split('-');
    let (Some(year), Some(month), Some(day), None) =
        (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return Err(invalid());
    };

    let year: i32 = year.parse().map_err(|_| invalid())?;
    let month: u32 = month.parse().map_err(|_| invalid())?;
    let day: u32 = day.parse().map_err(|_| invalid())?;
    let year = if negative { -year } else { year };

    NaiveDate::from_ymd_opt(year, month, day).ok_or_else(invalid)
}

/// Formats a date as ISO `yyyy-mm-dd`.
pub fn format_iso_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Anything accepted as a window bound: a calendar date or an ISO string.
pub trait IntoDate {
    fn into_date(self) -> Result<NaiveDate, EventGraphError>;
}

impl IntoDate for NaiveDate {
    fn into_date(self) -> Result<NaiveDate, EventGraphError> {
        Ok(self)
    }
}

impl IntoDate for &str {
    fn into_date(self) -> Result<NaiveDate, EventGraphError> {
        parse_iso_date(self)
    }
}

impl IntoDate for String {
    fn into_date(self) -> Result<NaiveDate, EventGraphError> {
        parse_iso_date(&self)
    }
}

impl IntoDate for &String {
    fn into_date(self) -> Result<NaiveDate, EventGraphError> {
        parse_iso_date(self)
    }
}

/// A closed date interval with optional bounds. Missing bounds are filled in
/// from the graph being sliced (earliest departure, latest arrival).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DateWindow {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl DateWindow {
    /// Window covering the whole graph.
    pub fn full() -> Self {
        Self::default()
    }

    pub fn between(start: impl IntoDate, end: impl IntoDate) -> Result<Self, EventGraphError> {
        Ok(Self {
            start: Some(start.into_date()?),
            end: Some(end.into_date()?),
        })
    }

    pub fn starting(start: impl IntoDate) -> Result<Self, EventGraphError> {
        Ok(Self {
            start: Some(start.into_date()?),
            end: None,
        })
    }

    pub fn ending(end: impl IntoDate) -> Result<Self, EventGraphError> {
        Ok(Self {
            start: None,
            end: Some(end.into_date()?),
        })
    }

    /// Builds a window from optional ISO strings, as read from a command line
    /// or a configuration file.
    pub fn parse(start: Option<&str>, end: Option<&str>) -> Result<Self, EventGraphError> {
        Ok(Self {
            start: start.map(parse_iso_date).transpose()?,
            end: end.map(parse_iso_date).transpose()?,
        })
    }

    /// Fills in missing bounds.
    pub fn resolve(&self, min_date: NaiveDate, max_date: NaiveDate) -> ResolvedWindow {
        ResolvedWindow {
            start: self.start.unwrap_or(min_date),
            end: self.end.unwrap_or(max_date),
        }
    }

    /// True when both bounds of `other` lie inside this window. An open bound
    /// here contains anything; an open bound on `other` is only contained by
    /// an open bound.
    pub fn contains_window(&self, other: &DateWindow) -> bool {
        let start_ok = match (self.start, other.start) {
            (None, _) => true,
            (Some(_), None) => false,
            (Some(mine), Some(theirs)) => mine <= theirs,
        };
        let end_ok = match (self.end, other.end) {
            (None, _) => true,
            (Some(_), None) => false,
            (Some(mine), Some(theirs)) => theirs <= mine,
        };
        start_ok && end_ok
    }
}

/// A window with both bounds fixed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl ResolvedWindow {
    /// Whether an edge departing `from` and arriving `to` falls inside the
    /// window (both bounds inclusive).
    pub fn contains(&self, from: NaiveDate, to: NaiveDate) -> bool {
        from >= self.start && to <= self.end
    }

    pub fn width_days(&self) -> i64 {
        (self.end - self.start).num_days()
    }

    /// Position of `date` in the window, clamped to `[0, 1]`. Zero-width (or
    /// inverted) windows yield `ZERO_WIDTH_SCALE`.
    pub fn scale(&self, date: NaiveDate) -> f64 {
        let width = self.width_days();
        if width <= 0 {
            return ZERO_WIDTH_SCALE;
        }
        let offset = (date - self.start).num_days() as f64;
        (offset / width as f64).clamp(0.0, 1.0)
    }
}

impl From<ResolvedWindow> for DateWindow {
    fn from(window: ResolvedWindow) -> Self {
        DateWindow {
            start: Some(window.start),
            end: Some(window.end),
        }
    }
}
