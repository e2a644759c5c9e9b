//! Date parsing and display formatting for date widgets

use chrono::format::{Fixed, Item, StrftimeItems};
use chrono::{DateTime, Datelike, Locale, NaiveDate, NaiveDateTime, TimeZone, Utc};
use std::fmt::Write;

/// Formats committed dates with a fixed pattern and locale, and reads
/// stored values back.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DateFormatter<'a> {
    pattern: &'a str,
    locale: Locale,
}

impl<'a> DateFormatter<'a> {
    pub fn new(pattern: &'a str, locale: Locale) -> Self {
        Self { pattern, locale }
    }

    pub fn pattern(&self) -> &str {
        self.pattern
    }

    /// Display text for `value`, or `None` when the pattern is malformed
    pub fn format(&self, value: NaiveDateTime) -> Option<String> {
        if !is_valid_pattern(self.pattern) {
            return None;
        }
        let mut out = String::new();
        write!(out, "{}", Utc.from_utc_datetime(&value).format_localized(self.pattern, self.locale)).ok()?;
        Some(out)
    }

    /// Read a stored value. Tries RFC 3339 (kept in its own offset), ISO
    /// date-time, ISO date, then the display pattern in the formatter's locale.
    pub fn parse(&self, raw: &str) -> Option<NaiveDateTime> {
        let raw = raw.trim();
        if raw.is_empty() {
            return None;
        }

        if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
            return Some(dt.naive_local());
        }
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S") {
            return Some(dt);
        }
        if let Ok(d) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
            return d.and_hms_opt(0, 0, 0);
        }
        self.parse_display(raw)
    }

    fn parse_display(&self, raw: &str) -> Option<NaiveDateTime> {
        if self.locale == Locale::en_US {
            return parse_with(raw, self.pattern);
        }

        let weekday_specs: Vec<&str> = [("%A", Fixed::LongWeekdayName), ("%a", Fixed::ShortWeekdayName)]
            .into_iter()
            .filter(|(_, fixed)| uses(self.pattern, fixed.clone()))
            .map(|(spec, _)| spec)
            .collect();

        // Swap one localized weekday name for the English one chrono parses;
        // chrono rejects a weekday that does not match the date.
        // 2024-01-01 is a Monday.
        for day in 1..=7 {
            let Some(date) = NaiveDate::from_ymd_opt(2024, 1, day).and_then(|d| d.and_hms_opt(0, 0, 0)) else {
                continue;
            };
            let utc = Utc.from_utc_datetime(&date);
            for spec in &weekday_specs {
                let local = utc.format_localized(spec, self.locale).to_string();
                let english = utc.format(spec).to_string();
                if local.is_empty() || local == english {
                    continue;
                }
                let found = replacements(raw, &local, &english).find_map(|c| self.parse_months(&c));
                if let Some(dt) = found {
                    return Some(dt);
                }
            }
        }
        self.parse_months(raw)
    }

    /// Try each month's localized name in the month position: swap it for
    /// the month number and parse against the numeric form of the pattern.
    fn parse_months(&self, raw: &str) -> Option<NaiveDateTime> {
        if !uses(self.pattern, Fixed::LongMonthName) && !uses(self.pattern, Fixed::ShortMonthName) {
            return parse_with(raw, self.pattern);
        }
        let numeric = self.pattern.replace("%B", "%m").replace("%b", "%m").replace("%h", "%m");

        (1..=12)
            .find_map(|month| {
                let first = Utc.from_utc_datetime(&month_start(month)?);
                let mut names: Vec<String> = ["%B", "%b"]
                    .into_iter()
                    .map(|spec| first.format_localized(spec, self.locale).to_string())
                    .filter(|name| !name.is_empty())
                    .collect();
                names.dedup();

                let number = format!("{:02}", month);
                names.iter().find_map(|name| {
                    replacements(raw, name, &number)
                        .find_map(|candidate| parse_with(&candidate, &numeric))
                        .filter(|dt| dt.month() == month)
                })
            })
            .or_else(|| parse_with(raw, self.pattern))
    }
}

/// `raw` with one occurrence of `from` replaced by `to`, for each occurrence
fn replacements<'s>(raw: &'s str, from: &'s str, to: &'s str) -> impl Iterator<Item = String> + 's {
    raw.match_indices(from)
        .map(move |(at, _)| format!("{}{}{}", &raw[..at], to, &raw[at + from.len()..]))
}

fn month_start(month: u32) -> Option<NaiveDateTime> {
    NaiveDate::from_ymd_opt(2000, month, 1).and_then(|d| d.and_hms_opt(0, 0, 0))
}

fn parse_with(raw: &str, pattern: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(raw, pattern).ok().or_else(|| {
        NaiveDate::parse_from_str(raw, pattern)
            .ok()
            .and_then(|d| d.and_hms_opt(0, 0, 0))
    })
}

/// True when `pattern` contains the given fixed specifier
fn uses(pattern: &str, wanted: Fixed) -> bool {
    StrftimeItems::new(pattern).any(|item| item == Item::Fixed(wanted.clone()))
}

/// True when every specifier in `pattern` is understood by chrono
pub fn is_valid_pattern(pattern: &str) -> bool {
    !StrftimeItems::new(pattern).any(|item| matches!(item, Item::Error))
}

/// Resolve a locale name such as `nl_NL`
pub fn locale_from_name(name: &str) -> Option<Locale> {
    Locale::try_from(name).ok()
}
