//! Ordering verification — the time-warp guard at the output boundary.
//!
//! Hydrated events must move forward on the uptime axis. A start that
//! jumps backwards past the tolerance means the file is not one log (a
//! restarted JVM appended to the same path, or two files concatenated),
//! and every downstream computation against prior events would be
//! silently wrong. That is fatal, not skippable.

use tracing::warn;

use crate::classify::{EventType, TypedEvent};
use crate::error::EngineError;

/// Slack allowed before a backwards jump counts as a warp. Tick-rounded
/// decorators and late-flushed concurrent lines jitter by far less.
pub const DEFAULT_TOLERANCE_SECS: u64 = 5;

// Safepoint accounting stamps its line at safepoint end, so projecting
// timestamp + duration forward overshoots; those kinds cannot anchor the
// overlap check.
fn anchors_overlap(kind: EventType) -> bool {
    kind.is_blocking()
        && !matches!(
            kind,
            EventType::ApplicationStoppedTime | EventType::UnifiedSafepoint
        )
}

/// Verifies stream order, returning the first warp found.
pub fn verify(events: &[TypedEvent], tolerance_micros: i64) -> Result<(), EngineError> {
    let mut prior: Option<&TypedEvent> = None;
    for event in events {
        let Some(ts) = event.timestamp_micros else {
            continue;
        };
        if let Some(p) = prior {
            let prior_ts = p.timestamp_micros.unwrap_or(0);
            if ts + tolerance_micros < prior_ts {
                return Err(time_warp(p, event));
            }
            if anchors_overlap(p.kind) && event.kind.is_blocking() {
                if let Some(end) = p.end_micros() {
                    if ts + tolerance_micros < end {
                        return Err(time_warp(p, event));
                    }
                }
            }
        }
        prior = Some(event);
    }
    Ok(())
}

fn time_warp(prior: &TypedEvent, event: &TypedEvent) -> EngineError {
    warn!(
        prior = prior.line.as_str(),
        event = event.line.as_str(),
        "time warp detected"
    );
    EngineError::TimeWarp {
        first: prior.line.clone(),
        second: event.line.clone(),
    }
}
