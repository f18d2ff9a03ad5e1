//! Formatting of requested trip dates for display.
//!
//! Input comes straight from a form field and may be absent or malformed.
//! Neither is an error: the formatted fields are left empty instead.

use std::fmt::Write as _;

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};
use medride_types::config::LocaleConfig;

/// Accepted shapes of a requested date-time, tried in order.
const DATE_TIME_PATTERNS: &[&str] = &[
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%d %H:%M:%S",
];

/// The two display fields derived from a requested date-time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormattedSchedule {
    pub contracted_date: String,
    pub scheduled_date_time: String,
}

/// Renders requested date-times with the configured locale conventions.
#[derive(Debug, Clone)]
pub struct ScheduleFormatter {
    date_format: String,
    time_format: String,
}

impl ScheduleFormatter {
    pub fn new(locale: &LocaleConfig) -> Self {
        Self {
            date_format: locale.date_format.clone(),
            time_format: locale.time_format.clone(),
        }
    }

    /// Format `raw` into the contracted date and scheduled date-time.
    ///
    /// Absent, blank or unparseable input yields empty strings.
    pub fn format(&self, raw: Option<&str>) -> FormattedSchedule {
        let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
            return FormattedSchedule::default();
        };

        let Some(at) = parse_requested(raw) else {
            tracing::debug!(input = raw, "unparseable requested date-time, leaving schedule empty");
            return FormattedSchedule::default();
        };

        let contracted_date = render(&at, &self.date_format);
        let time = render(&at, &self.time_format);
        let scheduled_date_time = match (contracted_date.is_empty(), time.is_empty()) {
            (false, false) => format!("{contracted_date} {time}"),
            (false, true) => contracted_date.clone(),
            (true, _) => String::new(),
        };

        FormattedSchedule {
            contracted_date,
            scheduled_date_time,
        }
    }
}

impl Default for ScheduleFormatter {
    fn default() -> Self {
        Self::new(&LocaleConfig::default())
    }
}

/// Parse a requested date-time. Date-only input is taken at midnight.
pub fn parse_requested(raw: &str) -> Option<NaiveDateTime> {
    for pattern in DATE_TIME_PATTERNS {
        if let Ok(at) = NaiveDateTime::parse_from_str(raw, pattern) {
            return Some(at);
        }
    }
    if let Ok(at) = DateTime::parse_from_rfc3339(raw) {
        return Some(at.naive_local());
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .map(|date| date.and_time(NaiveTime::MIN))
}

/// Render with a user-supplied pattern; an invalid pattern renders empty.
fn render(at: &NaiveDateTime, pattern: &str) -> String {
    let mut out = String::new();
    if write!(out, "{}", at.format(pattern)).is_err() {
        tracing::warn!(pattern, "invalid date format pattern");
        return String::new();
    }
    out
}
