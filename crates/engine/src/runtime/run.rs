//! Run — the whole pipeline over one log: preprocess, classify, verify.

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::classify::{self, TypedEvent};
use crate::conf::EngineConfig;
use crate::error::EngineError;
use crate::order;
use crate::preprocess::Driver;
use crate::units::{ratio, time};

use super::boot;

/// Aggregate counters for one processed log.
#[derive(Debug, Serialize)]
pub struct RunSummary {
    pub events: usize,
    pub unidentified: usize,
    pub unidentified_dropped: u64,
    /// Sum of blocking-event durations.
    pub total_pause_micros: i64,
    /// Application throughput across the last pause interval, percent.
    pub throughput_percent: Option<i64>,
}

/// Processes one log's lines end to end.
///
/// Ordering is verified after hydration, at the output boundary; a time
/// warp is fatal and no events are returned.
pub fn run<I>(config: &EngineConfig, lines: I) -> Result<(Vec<TypedEvent>, RunSummary), EngineError>
where
    I: IntoIterator,
    I::Item: Into<String>,
{
    let jvm_start = boot::jvm_start(config)?;

    let preprocessed = Driver::new(config.unidentified_capacity).run(lines);
    if preprocessed.unidentified_dropped > 0 {
        warn!(
            dropped = preprocessed.unidentified_dropped,
            "unidentified bucket overflowed"
        );
    }
    for line in &preprocessed.unidentified {
        debug!(line = line.as_str(), "unidentified");
    }

    let events = classify::classify_all(&preprocessed.lines, jvm_start.as_ref());
    order::verify(&events, config.time_warp_tolerance_micros())?;

    let summary = summarize(&events, &preprocessed);
    info!(
        events = summary.events,
        unidentified = summary.unidentified,
        total_pause = %time::micros_to_seconds_display(summary.total_pause_micros),
        "run complete"
    );
    Ok((events, summary))
}

fn summarize(
    events: &[TypedEvent],
    preprocessed: &crate::preprocess::PreprocessOutput,
) -> RunSummary {
    let total_pause_micros = events
        .iter()
        .filter(|e| e.kind.is_blocking())
        .filter_map(|e| e.duration_micros)
        .sum();

    let mut throughput_percent = None;
    let mut prior: Option<(i64, i64)> = None;
    for event in events.iter().filter(|e| e.kind.is_blocking()) {
        let (Some(ts), Some(duration)) = (event.timestamp_micros, event.duration_micros) else {
            continue;
        };
        let ts_millis = time::micros_to_millis_half_even(ts);
        let duration_millis = time::micros_to_millis_half_even(duration);
        if let Some((prior_duration, prior_ts)) = prior {
            throughput_percent =
                Some(ratio::throughput(duration_millis, ts_millis, prior_duration, prior_ts));
        }
        prior = Some((duration_millis, ts_millis));
    }

    RunSummary {
        events: events.len(),
        unidentified: preprocessed.unidentified.len(),
        unidentified_dropped: preprocessed.unidentified_dropped,
        total_pause_micros,
        throughput_percent,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::EventType;

    fn config() -> EngineConfig {
        EngineConfig::default()
    }

    #[test]
    fn a_raw_cms_fragment_flows_through_to_typed_events() {
        let lines = [
            "46674.719: [GC (Allocation Failure) 46674.719: [ParNew46674.749: [CMS-concurrent-abortable-preclean: 1.046/2.508 secs] [Times: user=1.33 sys=0.06, real=2.51 secs]",
            ": 153599K->17023K(153600K), 0.0383370 secs] 229326K->95417K(494976K), 0.0384820 secs] [Times: user=0.06 sys=0.00, real=0.04 secs]",
        ];
        let (events, summary) = run(&config(), lines).unwrap();
        assert_eq!(
            events.iter().map(|e| e.kind).collect::<Vec<_>>(),
            vec![EventType::ParNew, EventType::CmsConcurrent]
        );
        assert_eq!(summary.events, 2);
        assert_eq!(summary.total_pause_micros, 38_482);
        assert_eq!(summary.unidentified, 0);
    }

    #[test]
    fn a_time_warped_log_is_fatal() {
        let lines = [
            "60.000: [GC pause (G1 Evacuation Pause) (young), 0.0209631 secs]",
            "1.000: [GC pause (G1 Evacuation Pause) (young), 0.0100000 secs]",
        ];
        assert!(matches!(
            run(&config(), lines),
            Err(EngineError::TimeWarp { .. })
        ));
    }

    #[test]
    fn throughput_covers_the_last_pause_interval() {
        // prior pause: 10 ms at t=900 ms; current: 81 ms at t=1000 ms.
        let lines = [
            "0.900: [GC pause (G1 Evacuation Pause) (young), 0.0100000 secs]",
            "1.000: [GC pause (G1 Evacuation Pause) (young), 0.0810000 secs]",
        ];
        let (_, summary) = run(&config(), lines).unwrap();
        assert_eq!(summary.throughput_percent, Some(50));
    }

    #[test]
    fn noise_is_counted_not_fatal() {
        let lines = ["complete garbage", "more garbage"];
        let (events, summary) = run(&config(), lines).unwrap();
        assert!(events.is_empty());
        assert_eq!(summary.unidentified, 2);
    }
}
