//! Calendar dates to decimal years.
//!
//! Tip names of dated phylogenies usually end in their sampling date, e.g.
//! `hCoV-19/Laos/NIID-1/2020_2020-03-24`. Dates may be incomplete (`2020-03`
//! or `2020`) or already be decimal years (`2020.23`); [decimal_date]
//! handles all of these given a [DateFormat].

use chrono::{Datelike, NaiveDate, NaiveDateTime, Timelike};
use thiserror::Error;

/// Default date format, as used in tip names and metadata
pub const DEFAULT_DATE_FORMAT: &str = "%Y-%m-%d";

/// Default separator of date components
pub const DEFAULT_DATE_SPLITTER: &str = "-";

/// Filler for date components dropped with variable granularity
const DROPPED_COMPONENT: &str = "01";

/// Specifiers which already fix the day (and month) of a date
const FULL_DATE_SPECIFIERS: [&str; 4] = ["%F", "%D", "%x", "%j"];
const MONTH_SPECIFIERS: [&str; 4] = ["%m", "%b", "%B", "%h"];
const DAY_SPECIFIERS: [&str; 2] = ["%d", "%e"];

/// Error converting a date to a decimal year.
#[derive(Debug, Error)]
pub enum DateError {
    #[error("Date '{date}' does not match format '{format}': {source}")]
    Format {
        date: String,
        format: String,
        source: chrono::ParseError,
    },
    #[error("Date '{0}' is out of range")]
    OutOfRange(String),
    #[error("No date field in tip name '{0}'")]
    MissingToken(String),
}

// =#========================================================================#=
// DATE FORMAT
// =#========================================================================#=
/// Describes how calendar dates are written.
///
/// # Configuration
/// * `with_format(fmt)` - `strftime`-style format, default [DEFAULT_DATE_FORMAT]
/// * `with_splitter(s)` - separator of components, default [DEFAULT_DATE_SPLITTER]
/// * `with_variable(true)` - accept dates with trailing components missing,
///   e.g. `2020-03` or `2020`; missing month and day count as 1
#[derive(Debug, Clone, PartialEq)]
pub struct DateFormat {
    format: String,
    splitter: String,
    variable: bool,
}

impl Default for DateFormat {
    fn default() -> Self {
        Self {
            format: DEFAULT_DATE_FORMAT.to_string(),
            splitter: DEFAULT_DATE_SPLITTER.to_string(),
            variable: false,
        }
    }
}

impl DateFormat {
    /// Default format with variable granularity enabled.
    pub fn variable() -> Self {
        Self::default().with_variable(true)
    }

    pub fn with_format(mut self, format: &str) -> Self {
        self.format = format.to_string();
        self
    }

    pub fn with_splitter(mut self, splitter: &str) -> Self {
        self.splitter = splitter.to_string();
        self
    }

    pub fn with_variable(mut self, variable: bool) -> Self {
        self.variable = variable;
        self
    }

    /// Returns `date` completed with filler components for the ones missing,
    /// if variable granularity is enabled.
    fn complete<'a>(&self, date: &'a str) -> std::borrow::Cow<'a, str> {
        if !self.variable || self.splitter.is_empty() {
            return date.into();
        }

        let expected = self.format.split(self.splitter.as_str()).count();
        let present = date.split(self.splitter.as_str()).count();
        if present >= expected || expected - present > 2 {
            return date.into();
        }

        let mut completed = date.to_string();
        for _ in present..expected {
            completed.push_str(&self.splitter);
            completed.push_str(DROPPED_COMPONENT);
        }
        completed.into()
    }
}

// =#========================================================================#=
// CONVERSION
// =#========================================================================#=
/// Checks if a string can be read as a float, ignoring surrounding whitespace.
///
/// # Examples
/// ```
/// use phylokit::dates::is_float;
///
/// assert!(is_float("3.14"));
/// assert!(is_float(" -2 "));
/// assert!(is_float("1e5"));
/// assert!(!is_float("abc"));
/// assert!(!is_float(""));
/// assert!(!is_float("2020-01-01"));
/// ```
pub fn is_float(value: &str) -> bool {
    value.trim().parse::<f64>().is_ok()
}

/// Converts a calendar date to a decimal year.
///
/// The result is `year + elapsed / length`, where `elapsed` is the time since
/// the beginning of the year and `length` the length of that year, both in
/// seconds. Input that already is a number is returned unchanged, so decimal
/// dates pass through; note that this also hides wrongly formatted numbers.
///
/// # Errors
/// Returns [DateError::Format] if the date does not match the format.
///
/// # Examples
/// ```
/// use phylokit::dates::{decimal_date, DateFormat};
///
/// assert_eq!(decimal_date("2020-01-01", &DateFormat::default()).unwrap(), 2020.0);
/// assert_eq!(decimal_date("2020-07-02", &DateFormat::default()).unwrap(), 2020.5);
/// assert_eq!(decimal_date("2020", &DateFormat::variable()).unwrap(), 2020.0);
/// assert_eq!(decimal_date("2015.5", &DateFormat::default()).unwrap(), 2015.5);
/// assert!(decimal_date("2020-13-01", &DateFormat::default()).is_err());
/// ```
pub fn decimal_date(date: &str, format: &DateFormat) -> Result<f64, DateError> {
    if let Ok(value) = date.trim().parse::<f64>() {
        return Ok(value);
    }

    let completed = format.complete(date);
    let datetime = parse_datetime(&completed, &format.format).map_err(|source| DateError::Format {
        date: date.to_string(),
        format: format.format.clone(),
        source,
    })?;

    let year = datetime.year();
    let out_of_range = || DateError::OutOfRange(date.to_string());
    let begin = NaiveDate::from_ymd_opt(year, 1, 1).ok_or_else(out_of_range)?;
    let end = NaiveDate::from_ymd_opt(year + 1, 1, 1).ok_or_else(out_of_range)?;

    let elapsed = (datetime.date() - begin).num_seconds() + i64::from(datetime.time().num_seconds_from_midnight());
    let length = (end - begin).num_seconds();

    Ok(year as f64 + elapsed as f64 / length as f64)
}

/// Parses with time of day if the format has one, otherwise as midnight.
///
/// Formats without month or day, e.g. `%Y-%m` or `%b %Y`, get them
/// appended as 1.
fn parse_datetime(date: &str, format: &str) -> Result<NaiveDateTime, chrono::ParseError> {
    let (date, format) = with_default_fields(date, format);
    match NaiveDateTime::parse_from_str(&date, &format) {
        Ok(datetime) => Ok(datetime),
        Err(err) => {
            let day = NaiveDate::parse_from_str(&date, &format).map_err(|_| err)?;
            Ok(day.and_time(chrono::NaiveTime::MIN))
        }
    }
}

fn with_default_fields(date: &str, format: &str) -> (String, String) {
    let mut date = date.to_string();
    let mut format = format.to_string();
    if FULL_DATE_SPECIFIERS.iter().any(|s| format.contains(s)) {
        return (date, format);
    }

    if !MONTH_SPECIFIERS.iter().any(|s| format.contains(s)) {
        date.push(' ');
        date.push_str(DROPPED_COMPONENT);
        format.push_str(" %m");
    }
    if !DAY_SPECIFIERS.iter().any(|s| format.contains(s)) {
        date.push(' ');
        date.push_str(DROPPED_COMPONENT);
        format.push_str(" %d");
    }
    (date, format)
}

/// Extracts the date token from a tip name.
///
/// Surrounding single quotes are removed and the name is split on
/// `delimiter`; `position` selects the field, negative values counting
/// from the end (`-1` is the last field).
///
/// # Examples
/// ```
/// use phylokit::dates::date_token;
///
/// assert_eq!(date_token("'OQ291490_Laos_2022-06-18'", "_", -1), Some("2022-06-18"));
/// assert_eq!(date_token("2019-12-30|EPI_ISL_402123", "|", 0), Some("2019-12-30"));
/// assert_eq!(date_token("A_B", "_", 5), None);
/// ```
pub fn date_token<'a>(name: &'a str, delimiter: &str, position: isize) -> Option<&'a str> {
    let fields: Vec<&str> = name.trim_matches('\'').split(delimiter).collect();
    let index = if position < 0 {
        fields.len().checked_sub(position.unsigned_abs())?
    } else {
        position as usize
    };
    fields.get(index).copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decimal_date_within_year() {
        let format = DateFormat::default();
        for date in ["2019-01-01", "2019-06-15", "2019-12-31", "2020-02-29"] {
            let value = decimal_date(date, &format).unwrap();
            let year: f64 = date[..4].parse().unwrap();
            assert!(value >= year && value < year + 1.0, "{date} -> {value}");
        }
    }

    #[test]
    fn test_variable_granularity() {
        let format = DateFormat::variable();
        assert_eq!(decimal_date("2021", &format).unwrap(), 2021.0);
        assert_eq!(
            decimal_date("2021-02", &format).unwrap(),
            decimal_date("2021-02-01", &DateFormat::default()).unwrap()
        );
        // without variable granularity incomplete dates fail
        assert!(decimal_date("2021-02", &DateFormat::default()).is_err());
    }

    #[test]
    fn test_custom_format() {
        let format = DateFormat::default().with_format("%Y/%m/%d").with_splitter("/");
        assert_eq!(decimal_date("2020/07/02", &format).unwrap(), 2020.5);
    }

    #[test]
    fn test_month_only_formats() {
        let march = decimal_date("2020-03-01", &DateFormat::default()).unwrap();
        assert!((march - (2020.0 + 60.0 / 366.0)).abs() < 1e-12);

        let format = DateFormat::default().with_format("%Y-%m");
        assert_eq!(decimal_date("2020-03", &format).unwrap(), march);
        let format = DateFormat::default().with_format("%b %Y").with_splitter(" ");
        assert_eq!(decimal_date("Mar 2020", &format).unwrap(), march);
        let format = DateFormat::default().with_format("%Y-%m").with_splitter("");
        assert!(decimal_date("2020-13", &format).is_err());
    }

    #[test]
    fn test_datetime_format() {
        let format = DateFormat::default().with_format("%Y-%m-%d %H:%M");
        let noon = decimal_date("2021-01-01 12:00", &format).unwrap();
        assert!((noon - (2021.0 + 0.5 / 365.0)).abs() < 1e-12);
    }

    #[test]
    fn test_malformed_date() {
        let err = decimal_date("March 2020", &DateFormat::variable()).unwrap_err();
        assert!(matches!(err, DateError::Format { .. }));
    }
}
