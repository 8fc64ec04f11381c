//! Time conversions with explicit, direction-specific rounding.
//!
//! Scaling to a finer unit always truncates: manufacturing precision a
//! timestamp never had would make a later event appear to start earlier
//! than its neighbour and trip the time-warp check. Scaling to a coarser
//! unit rounds half to even at three decimal places, matching the source
//! precision of `-verbose:gc` output.

use super::half_even_div;

pub const MICROS_PER_MILLI: i64 = 1_000;
pub const MICROS_PER_SECOND: i64 = 1_000_000;

/// Parse a non-negative decimal literal into an integer count of
/// `10^-frac_digits` units, truncating extra fractional digits.
///
/// A `,` fractional separator (locale-dependent JVM output) is accepted and
/// treated exactly like `.`.
fn parse_scaled(raw: &str, frac_digits: u32) -> Option<i64> {
    let raw = raw.trim();
    if raw.is_empty() || raw.starts_with('-') {
        return None;
    }
    let normalized = raw.replace(',', ".");
    let (int_part, frac_part) = match normalized.split_once('.') {
        Some((i, f)) => (i, f),
        None => (normalized.as_str(), ""),
    };
    if !int_part.chars().all(|c| c.is_ascii_digit())
        || !frac_part.chars().all(|c| c.is_ascii_digit())
        || (int_part.is_empty() && frac_part.is_empty())
    {
        return None;
    }

    let scale = 10i64.checked_pow(frac_digits)?;
    let whole: i64 = if int_part.is_empty() {
        0
    } else {
        int_part.parse().ok()?
    };

    // Truncate (never round up) anything finer than the target unit.
    let mut frac: i64 = 0;
    let mut digits = 0u32;
    for c in frac_part.chars().take(frac_digits as usize) {
        frac = frac * 10 + i64::from(c.to_digit(10)?);
        digits += 1;
    }
    frac *= 10i64.pow(frac_digits - digits);

    whole.checked_mul(scale)?.checked_add(frac)
}

/// Seconds literal ("0.0383370" or "0,0383370") to whole microseconds.
pub fn seconds_to_micros(raw: &str) -> Option<i64> {
    parse_scaled(raw, 6)
}

/// Seconds literal to whole milliseconds, truncating.
pub fn seconds_to_millis(raw: &str) -> Option<i64> {
    parse_scaled(raw, 3)
}

/// Milliseconds literal ("5.123" from unified logging) to whole
/// microseconds.
pub fn millis_to_micros(raw: &str) -> Option<i64> {
    parse_scaled(raw, 3)
}

/// Sum a batch of seconds literals and express the total in milliseconds.
///
/// Summation happens at microsecond precision so sub-millisecond digits of
/// the individual durations still contribute to the total; only the final
/// conversion truncates.
pub fn total_seconds_to_millis<'a, I>(durations: I) -> Option<i64>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut total_micros: i64 = 0;
    for raw in durations {
        total_micros = total_micros.checked_add(seconds_to_micros(raw)?)?;
    }
    Some(total_micros / MICROS_PER_MILLI)
}

/// Microseconds to milliseconds, half-to-even (coarser unit).
pub fn micros_to_millis_half_even(micros: i64) -> i64 {
    half_even_div(micros, MICROS_PER_MILLI)
}

/// Render a microsecond count as seconds with three decimal places,
/// rounding half to even.
pub fn micros_to_seconds_display(micros: i64) -> String {
    let millis = micros_to_millis_half_even(micros);
    format!("{}.{:03}", millis / 1_000, millis % 1_000)
}

#[cfg(test)]
mod tests {
    use super::*;

    // ─── Truncation (finer unit) ────────────────────────────────

    #[test]
    fn seconds_to_millis_truncates_at_midpoint() {
        assert_eq!(seconds_to_millis("0.0975"), Some(97));
        assert_eq!(seconds_to_millis("0.0985"), Some(98));
    }

    #[test]
    fn seconds_to_micros_truncates_extra_digits() {
        assert_eq!(seconds_to_micros("0.0383370"), Some(38_337));
        assert_eq!(seconds_to_micros("0.0000009"), Some(0));
    }

    #[test]
    fn finer_then_coarser_never_exceeds_source() {
        // Truncation-down law: s -> us -> ms never exceeds direct s -> ms.
        for raw in ["0.0975", "0.0985", "1.9999", "0.0004546"] {
            let direct = seconds_to_millis(raw).unwrap();
            let round_trip = seconds_to_micros(raw).unwrap() / MICROS_PER_MILLI;
            assert!(round_trip <= direct, "{raw}: {round_trip} > {direct}");
        }
    }

    // ─── Decimal comma ──────────────────────────────────────────

    #[test]
    fn comma_and_dot_are_equivalent() {
        assert_eq!(seconds_to_millis("0,0225213"), Some(22));
        assert_eq!(seconds_to_millis("0.0225213"), Some(22));
        assert_eq!(
            seconds_to_micros("0,0225213"),
            seconds_to_micros("0.0225213")
        );
    }

    // ─── Sum law ────────────────────────────────────────────────

    #[test]
    fn total_duration_sums_before_truncating() {
        let total = total_seconds_to_millis(["0.0226730", "0.0624566", "0.0857010"]);
        assert_eq!(total, Some(170));
        // Truncating each term first would lose a millisecond.
        let per_term: i64 = [22, 62, 85].iter().sum();
        assert_eq!(per_term, 169);
    }

    // ─── Coarser unit (half to even) ────────────────────────────

    #[test]
    fn micros_to_millis_rounds_half_even() {
        assert_eq!(micros_to_millis_half_even(97_500), 98);
        assert_eq!(micros_to_millis_half_even(98_500), 98);
        assert_eq!(micros_to_millis_half_even(97_499), 97);
    }

    #[test]
    fn seconds_display_has_three_places() {
        assert_eq!(micros_to_seconds_display(38_337), "0.038");
        assert_eq!(micros_to_seconds_display(1_500_499), "1.500");
    }

    // ─── Malformed input ────────────────────────────────────────

    #[test]
    fn rejects_garbage() {
        assert_eq!(seconds_to_micros(""), None);
        assert_eq!(seconds_to_micros("-0.5"), None);
        assert_eq!(seconds_to_micros("1.2.3"), None);
        assert_eq!(seconds_to_micros("abc"), None);
    }

    #[test]
    fn accepts_integral_literals() {
        assert_eq!(seconds_to_millis("2"), Some(2_000));
        assert_eq!(millis_to_micros("7"), Some(7_000));
    }
}
