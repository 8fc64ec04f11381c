//! Classification module — canonical lines in, typed events out.
//!
//! The cascade names each line (ordered rules, first match wins, grammar
//! steered by the previous event); hydration then lifts timestamps,
//! durations, and heap transitions into a [`TypedEvent`].

pub mod cascade;
pub mod hydrate;
pub mod model;

pub use cascade::classify;
pub use hydrate::hydrate;
pub use model::{EventType, MemDelta, TypedEvent};

use chrono::{DateTime, FixedOffset};

/// Classifies and hydrates a whole run of canonical lines in order.
pub fn classify_all(
    lines: &[String],
    jvm_start: Option<&DateTime<FixedOffset>>,
) -> Vec<TypedEvent> {
    let mut prior: Option<EventType> = None;
    lines
        .iter()
        .map(|line| {
            let kind = classify(line, prior);
            prior = Some(kind);
            hydrate(kind, line, jvm_start)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn a_mixed_run_classifies_in_stream_order() {
        let lines: Vec<String> = [
            "Java HotSpot(TM) 64-Bit Server VM (25.282-b08) for linux-amd64",
            "46674.719: [GC (Allocation Failure) 46674.719: [ParNew: 153599K->17023K(153600K), 0.0383370 secs] 229326K->95417K(494976K), 0.0384820 secs]",
            "46674.749: [CMS-concurrent-abortable-preclean: 1.046/2.508 secs]",
        ]
        .into_iter()
        .map(String::from)
        .collect();
        let events = classify_all(&lines, None);
        assert_eq!(
            events.iter().map(|e| e.kind).collect::<Vec<_>>(),
            vec![
                EventType::LogHeader,
                EventType::ParNew,
                EventType::CmsConcurrent
            ]
        );
        assert_eq!(events[1].timestamp_micros, Some(46_674_719_000));
    }
}
