//! Units module — decimal-safe time, ratio, and memory-size conversions.
//!
//! Every numeric literal in a GC log is a decimal string (with `.` or `,`
//! as the fractional separator). Conversions here never go through floats:
//! values are parsed straight into integer counts of the target unit so the
//! rounding direction is exact and testable.

pub mod memory;
pub mod ratio;
pub mod time;

pub use memory::{MemSize, SizeUnit};
pub use ratio::{percent, throughput};

/// Integer division rounding half to even (banker's rounding).
///
/// Both operands must be non-negative and `d` non-zero.
pub(crate) fn half_even_div(n: i64, d: i64) -> i64 {
    debug_assert!(n >= 0 && d > 0);
    let q = n / d;
    let r = n % d;
    match (2 * r).cmp(&d) {
        std::cmp::Ordering::Less => q,
        std::cmp::Ordering::Greater => q + 1,
        std::cmp::Ordering::Equal => {
            if q % 2 == 0 {
                q
            } else {
                q + 1
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn half_even_rounds_down_below_midpoint() {
        assert_eq!(half_even_div(4972, 100), 50);
    }

    #[test]
    fn half_even_rounds_up_above_midpoint() {
        assert_eq!(half_even_div(4989, 100), 50);
    }

    #[test]
    fn half_even_ties_go_to_even() {
        assert_eq!(half_even_div(250, 100), 2);
        assert_eq!(half_even_div(350, 100), 4);
        assert_eq!(half_even_div(450, 100), 4);
    }
}
