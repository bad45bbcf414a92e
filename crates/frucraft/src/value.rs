//! Typed field values and the conversions between user text and stored bytes.
//!
//! Conversions applied by setters:
//! 1. Numbers: decimal text, surrounding whitespace ignored.
//! 2. Date/time: `H:M DD.MM.YY` parsed into minutes since 1996-01-01 00:00.
//! 3. Text: bytes are stored verbatim and shown as Latin-1, NUL rendered as space.

use chrono::{NaiveDate, NaiveDateTime, TimeDelta};

use crate::{
    constants::{BEGIN_DATE, DATE_DISPLAY_FORMAT, DATE_INPUT_FORMAT, DATE_TIME_SIZE},
    errors::ValidationError,
};

/// A decoded field value, see [crate::field::Field::value].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    /// Format version number.
    Version(u8),
    /// Offset or length: stored quanta and the byte count they stand for.
    Quanta { quanta: usize, bytes: usize },
    /// Composite type/length byte.
    TypeLength { type_code: u8, len: usize },
    /// Data or free text bytes (info text without its terminator).
    Text(Vec<u8>),
    /// Minutes since 1996-01-01 00:00.
    Minutes(u64),
    /// Table code and its name if the table knows it.
    Code { code: u8, name: Option<&'static str> },
    /// Number of padding bytes.
    Padding(usize),
    Checksum(u8),
    /// Opaque payload.
    Raw(Vec<u8>),
}

fn input_str(input: &[u8]) -> Option<&str> {
    std::str::from_utf8(input).ok().map(str::trim)
}

/// Parses decimal text into an unsigned number.
pub fn parse_number(input: &[u8]) -> Result<u64, ValidationError> {
    input_str(input)
        .and_then(|s| s.parse::<u64>().ok())
        .ok_or_else(|| ValidationError::NotANumber {
            input: String::from_utf8_lossy(input).into_owned(),
        })
}

/// Parses decimal text into a 1-byte code.
pub fn parse_code(input: &[u8]) -> Result<u8, ValidationError> {
    let value = parse_number(input)?;
    u8::try_from(value).map_err(|_| ValidationError::CodeOutOfRange {
        value,
        max: u8::MAX as u64,
    })
}

/// Start of the manufacturing date/time count.
pub fn epoch() -> NaiveDateTime {
    let (year, month, day) = BEGIN_DATE;
    NaiveDate::from_ymd_opt(year, month, day)
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .unwrap_or_default()
}

/// Largest minute count a date/time field can hold.
pub const MAX_MINUTES: u64 = (1 << (8 * DATE_TIME_SIZE)) - 1;

/// Converts a minute count into a calendar date/time.
pub fn minutes_to_datetime(minutes: u64) -> Option<NaiveDateTime> {
    let delta = TimeDelta::try_minutes(i64::try_from(minutes).ok()?)?;
    epoch().checked_add_signed(delta)
}

/// Minute count of a calendar date/time, `None` when it cannot be stored.
pub fn datetime_to_minutes(datetime: NaiveDateTime) -> Option<u64> {
    let minutes = (datetime - epoch()).num_minutes();
    u64::try_from(minutes).ok().filter(|&m| m <= MAX_MINUTES)
}

/// Parses `H:M DD.MM.YY` into a minute count.
pub fn parse_datetime(input: &[u8]) -> Result<u64, ValidationError> {
    let text = String::from_utf8_lossy(input).into_owned();
    let datetime = input_str(input)
        .and_then(|s| NaiveDateTime::parse_from_str(s, DATE_INPUT_FORMAT).ok())
        .ok_or_else(|| ValidationError::InvalidDate {
            input: text.clone(),
        })?;

    datetime_to_minutes(datetime).ok_or(ValidationError::DateOutOfRange { input: text })
}

/// Renders a minute count as `Fri Mar 15 14:30 2024`.
pub fn describe_minutes(minutes: u64) -> String {
    minutes_to_datetime(minutes)
        .map(|dt| dt.format(DATE_DISPLAY_FORMAT).to_string())
        .unwrap_or_else(|| "Invalid date".to_string())
}

/// Renders a minute count in the setter's input format.
pub fn format_minutes_input(minutes: u64) -> Option<String> {
    minutes_to_datetime(minutes).map(|dt| dt.format(DATE_INPUT_FORMAT).to_string())
}

/// Decodes bytes as ISO-8859-1, NUL shown as a space.
pub fn latin1(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|&b| if b == 0 { ' ' } else { char::from(b) })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_number() {
        assert_eq!(parse_number(b"72"), Ok(72));
        assert_eq!(parse_number(b" 8 "), Ok(8));
        assert_eq!(
            parse_number(b"eight"),
            Err(ValidationError::NotANumber {
                input: "eight".to_string()
            })
        );
        assert!(parse_number(b"-1").is_err());
    }

    #[test]
    fn test_parse_code_range() {
        assert_eq!(parse_code(b"23"), Ok(23));
        assert_eq!(
            parse_code(b"256"),
            Err(ValidationError::CodeOutOfRange {
                value: 256,
                max: 255
            })
        );
    }

    #[test]
    fn test_parse_datetime() {
        // 10301 days from 1996-01-01 to 2024-03-15, plus 14:30
        assert_eq!(parse_datetime(b"14:30 15.03.24"), Ok(10301 * 1440 + 870));
        assert_eq!(parse_datetime(b"00:00 01.01.96"), Ok(0));
    }

    #[test]
    fn test_parse_datetime_rejects_garbage() {
        assert!(matches!(
            parse_datetime(b"2024-03-15"),
            Err(ValidationError::InvalidDate { .. })
        ));
        assert!(matches!(
            parse_datetime(b"25:00 01.01.20"),
            Err(ValidationError::InvalidDate { .. })
        ));
    }

    #[test]
    fn test_parse_datetime_out_of_range() {
        assert!(matches!(
            parse_datetime(b"23:59 31.12.95"),
            Err(ValidationError::DateOutOfRange { .. })
        ));
        assert!(matches!(
            parse_datetime(b"00:00 01.01.40"),
            Err(ValidationError::DateOutOfRange { .. })
        ));
    }

    #[test]
    fn test_describe_minutes() {
        assert_eq!(describe_minutes(10301 * 1440 + 870), "Fri Mar 15 14:30 2024");
        assert_eq!(describe_minutes(0), "Mon Jan 01 00:00 1996");
    }

    #[test]
    fn test_format_minutes_input_roundtrip() {
        let minutes = parse_datetime(b"09:05 01.07.11").unwrap();
        assert_eq!(format_minutes_input(minutes).as_deref(), Some("09:05 01.07.11"));
    }

    #[test]
    fn test_latin1() {
        assert_eq!(latin1(b"ACME\0"), "ACME ");
        assert_eq!(latin1(&[0xE9]), "é");
    }
}
