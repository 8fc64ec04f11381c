//! Percent and throughput calculations.

use super::half_even_div;

/// Percentage of `part` in `whole`, rounded half to even.
///
/// `percent(0, 0)` is 100 by convention (an empty interval spent none of
/// its time anywhere). `percent(part > 0, 0)` yields the `i64::MAX`
/// sentinel — undefined/overflow, deliberately never an error.
pub fn percent(part: i64, whole: i64) -> i64 {
    if whole == 0 {
        return if part == 0 { 100 } else { i64::MAX };
    }
    half_even_div(part * 100, whole)
}

/// Share of wall-clock time spent outside GC between two consecutive
/// collections, as a percent.
///
/// `total` spans from the prior collection's start to the current one's
/// end; `not_gc` removes both pause durations from it. 0 means the
/// interval was all GC, 100 means none of it was.
pub fn throughput(
    cur_duration: i64,
    cur_timestamp: i64,
    prior_duration: i64,
    prior_timestamp: i64,
) -> i64 {
    let total = cur_timestamp + cur_duration - prior_timestamp;
    let not_gc = (total - cur_duration - prior_duration).max(0);
    percent(not_gc, total)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percent_half_even() {
        assert_eq!(percent(90, 181), 50);
        assert_eq!(percent(1, 3), 33);
        assert_eq!(percent(2, 3), 67);
    }

    #[test]
    fn percent_empty_whole_is_full() {
        assert_eq!(percent(0, 0), 100);
    }

    #[test]
    fn percent_overflow_sentinel() {
        assert_eq!(percent(5, 0), i64::MAX);
    }

    #[test]
    fn throughput_boundary_case() {
        assert_eq!(throughput(81, 1000, 10, 900), 50);
    }

    #[test]
    fn throughput_all_gc_is_zero() {
        // Back-to-back pauses covering the whole interval.
        assert_eq!(throughput(100, 100, 100, 0), 0);
    }

    #[test]
    fn throughput_no_gc_is_hundred() {
        assert_eq!(throughput(0, 1000, 0, 0), 100);
    }

    #[test]
    fn throughput_overlapping_pauses_clamps_to_zero() {
        // Known multi-threaded logging artifact: pauses that overlap would
        // make not_gc negative; clamp instead of reporting nonsense.
        assert_eq!(throughput(100, 50, 100, 0), 0);
    }
}
