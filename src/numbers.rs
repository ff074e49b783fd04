//! Human-readable document numbers

use jiff::{Timestamp, tz::TimeZone};
use rand::Rng;

/// Order number prefix.
pub const ORDER_PREFIX: &str = "ORD";

/// Payment number prefix.
pub const PAYMENT_PREFIX: &str = "PAY";

/// Customer code prefix.
pub const CUSTOMER_PREFIX: &str = "CUST";

/// Builds `{prefix}-{YYYYMMDD}-{NNNN}` from the UTC date of `now` and a random
/// four digit suffix.
///
/// Numbers are for people, not identity: collisions are possible and the
/// backend's unique constraint is the last word.
pub fn dated(prefix: &str, now: Timestamp, rng: &mut impl Rng) -> String {
    let date = now.to_zoned(TimeZone::UTC).strftime("%Y%m%d");
    let suffix: u16 = rng.gen_range(0..10_000);

    format!("{prefix}-{date}-{suffix:04}")
}

/// An order number such as `ORD-20261018-0042`.
pub fn order_number(now: Timestamp, rng: &mut impl Rng) -> String {
    dated(ORDER_PREFIX, now, rng)
}

/// A payment number such as `PAY-20261018-0042`.
pub fn payment_number(now: Timestamp, rng: &mut impl Rng) -> String {
    dated(PAYMENT_PREFIX, now, rng)
}

/// A customer code built from the last six digits of the millisecond clock,
/// e.g. `CUST-512345`.
pub fn customer_code(now: Timestamp) -> String {
    let tail = now.as_millisecond().rem_euclid(1_000_000);

    format!("{CUSTOMER_PREFIX}-{tail:06}")
}

#[cfg(test)]
mod tests {
    use rand::{SeedableRng, rngs::StdRng};
    use testresult::TestResult;

    use super::*;

    #[test]
    fn order_number_has_date_and_four_digits() -> TestResult {
        let now: Timestamp = "2026-10-18T23:30:00Z".parse()?;
        let mut rng = StdRng::seed_from_u64(7);

        let number = order_number(now, &mut rng);

        assert!(number.starts_with("ORD-20261018-"));
        assert_eq!(number.len(), "ORD-20261018-0000".len());
        assert!(number.chars().skip(13).all(|c| c.is_ascii_digit()));

        Ok(())
    }

    #[test]
    fn date_is_taken_in_utc() -> TestResult {
        let now: Timestamp = "2026-10-18T23:30:00-08:00".parse()?;
        let mut rng = StdRng::seed_from_u64(7);

        assert!(payment_number(now, &mut rng).starts_with("PAY-20261019-"));

        Ok(())
    }

    #[test]
    fn customer_code_pads_to_six_digits() -> TestResult {
        let now = Timestamp::from_millisecond(1_000_000_000_042)?;

        assert_eq!(customer_code(now), "CUST-000042");

        Ok(())
    }
}
