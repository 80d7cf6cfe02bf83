//! Coupon window timestamps

use jiff::{
    Timestamp,
    civil::{Date, DateTime},
    tz::TimeZone,
};
use thiserror::Error;

#[derive(Debug, Error)]
#[error("invalid timestamp `{input}`")]
pub struct InstantParseError {
    input: String,

    #[source]
    source: jiff::Error,
}

/// Parse a coupon window bound into an absolute instant.
///
/// Input carrying an offset (`2026-03-01T10:00:00Z`, `...+06:00`) is taken as-is. Naive
/// date-times and bare dates are read as wall-clock time in `zone`.
///
/// # Errors
///
/// Returns [`InstantParseError`] when the input is none of the accepted forms, or names a
/// wall-clock time `zone` cannot represent.
pub fn parse_instant(input: &str, zone: &TimeZone) -> Result<Timestamp, InstantParseError> {
    let input = input.trim();

    if let Ok(timestamp) = input.parse::<Timestamp>() {
        return Ok(timestamp);
    }

    let error = |source| InstantParseError {
        input: input.to_string(),
        source,
    };

    let civil = match input.parse::<DateTime>() {
        Ok(datetime) => datetime,
        Err(datetime_error) => input
            .parse::<Date>()
            .map(|date| date.at(0, 0, 0, 0))
            .map_err(|_| error(datetime_error))?,
    };

    civil
        .to_zoned(zone.clone())
        .map(|zoned| zoned.timestamp())
        .map_err(error)
}

#[cfg(test)]
mod tests {
    use jiff::tz;

    use super::*;

    fn dhaka() -> TimeZone {
        TimeZone::fixed(tz::offset(6))
    }

    #[test]
    fn naive_datetime_uses_store_zone() {
        let instant = parse_instant("2026-03-01T10:00:00", &dhaka()).expect("should parse");

        assert_eq!(instant.to_string(), "2026-03-01T04:00:00Z");
    }

    #[test]
    fn bare_date_is_midnight_in_store_zone() {
        let instant = parse_instant("2026-03-01", &dhaka()).expect("should parse");

        assert_eq!(instant.to_string(), "2026-02-28T18:00:00Z");
    }

    #[test]
    fn explicit_offset_is_respected() {
        let instant = parse_instant("2026-03-01T10:00:00Z", &dhaka()).expect("should parse");

        assert_eq!(instant.to_string(), "2026-03-01T10:00:00Z");
    }

    #[test]
    fn garbage_is_rejected() {
        assert!(parse_instant("next tuesday", &dhaka()).is_err());
    }
}
