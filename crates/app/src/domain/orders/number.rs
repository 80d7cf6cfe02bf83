//! Order numbers

use jiff::Timestamp;
use rand::Rng;

/// `ORD`, the UTC time to the millisecond and a random four digit suffix, e.g.
/// `ORD202603140930120457031`.
#[must_use]
pub fn order_number(now: Timestamp) -> String {
    order_number_with_suffix(now, rand::thread_rng().gen_range(0..10_000))
}

fn order_number_with_suffix(now: Timestamp, suffix: u16) -> String {
    let millis = now.subsec_millisecond().rem_euclid(1000);

    format!(
        "ORD{}{millis:03}{:04}",
        now.strftime("%Y%m%d%H%M%S"),
        suffix % 10_000
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_utc_time_with_milliseconds() -> Result<(), jiff::Error> {
        let now: Timestamp = "2026-03-14T09:30:12.045+06:00".parse()?;

        assert_eq!(
            order_number_with_suffix(now, 7031),
            "ORD202603140330120457031"
        );

        Ok(())
    }

    #[test]
    fn whole_seconds_pad_milliseconds_and_suffix() -> Result<(), jiff::Error> {
        let now: Timestamp = "2026-01-01T00:00:00Z".parse()?;

        assert_eq!(order_number_with_suffix(now, 42), "ORD202601010000000000042");

        Ok(())
    }

    #[test]
    fn same_millisecond_numbers_keep_the_time_prefix() -> Result<(), jiff::Error> {
        let first: Timestamp = "2026-03-14T09:30:12.045100Z".parse()?;
        let second: Timestamp = "2026-03-14T09:30:12.045900Z".parse()?;

        let first = order_number(first);
        let second = order_number(second);

        assert_eq!(first.len(), 24);
        assert!(first.starts_with("ORD20260314093012045"));
        assert!(second.starts_with("ORD20260314093012045"));

        Ok(())
    }
}
