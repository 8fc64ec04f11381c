//! Event taxonomy and the hydrated event record.

use chrono::{DateTime, FixedOffset};
use serde::Serialize;

use crate::units::MemSize;

/// Every event kind the cascade can recognize.
///
/// Closed by design: adding a collector means adding variants here and
/// rules to the cascade tables, and the compiler walks every match that
/// needs to learn about them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum EventType {
    // Legacy serial collector
    SerialNew,
    SerialOld,
    // Legacy parallel collector
    ParallelScavenge,
    ParallelFullGc,
    // Legacy CMS
    ParNew,
    CmsInitialMark,
    CmsRemark,
    CmsConcurrent,
    CmsFullGc,
    // Legacy G1
    G1YoungPause,
    G1MixedPause,
    G1YoungInitialMark,
    G1Remark,
    G1Cleanup,
    G1FullGc,
    G1Concurrent,
    // Legacy Shenandoah
    ShenandoahInitMark,
    ShenandoahFinalMark,
    ShenandoahFinalEvac,
    ShenandoahInitUpdateRefs,
    ShenandoahFinalUpdateRefs,
    ShenandoahDegeneratedGc,
    ShenandoahConcurrent,
    // Legacy safepoint accounting
    ApplicationStoppedTime,
    ApplicationConcurrentTime,
    // Unified logging
    UnifiedG1YoungPause,
    UnifiedG1MixedPause,
    UnifiedG1ConcurrentStart,
    UnifiedYoungPause,
    UnifiedRemark,
    UnifiedCleanup,
    UnifiedFullGc,
    UnifiedShenandoahInitMark,
    UnifiedShenandoahFinalMark,
    UnifiedShenandoahFinalEvac,
    UnifiedShenandoahInitUpdateRefs,
    UnifiedShenandoahFinalUpdateRefs,
    UnifiedConcurrent,
    UnifiedSafepoint,
    /// Phase detail, heap region summary, and other `GC(n)` chatter that
    /// carries no pause of its own.
    UnifiedGcInfo,
    // Grammar-neutral
    LogHeader,
    Unknown,
}

impl EventType {
    /// Whether the kind belongs to the unified-logging grammar.
    pub fn is_unified(&self) -> bool {
        use EventType::*;
        matches!(
            self,
            UnifiedG1YoungPause
                | UnifiedG1MixedPause
                | UnifiedG1ConcurrentStart
                | UnifiedYoungPause
                | UnifiedRemark
                | UnifiedCleanup
                | UnifiedFullGc
                | UnifiedShenandoahInitMark
                | UnifiedShenandoahFinalMark
                | UnifiedShenandoahFinalEvac
                | UnifiedShenandoahInitUpdateRefs
                | UnifiedShenandoahFinalUpdateRefs
                | UnifiedConcurrent
                | UnifiedSafepoint
                | UnifiedGcInfo
        )
    }

    /// Whether the event runs alongside the application rather than
    /// stopping it.
    pub fn is_concurrent(&self) -> bool {
        use EventType::*;
        matches!(
            self,
            CmsConcurrent
                | G1Concurrent
                | ShenandoahConcurrent
                | UnifiedConcurrent
                | ApplicationConcurrentTime
        )
    }

    /// Whether the event stops application threads. Blocking events may
    /// not overlap each other; concurrent ones legitimately do.
    pub fn is_blocking(&self) -> bool {
        use EventType::*;
        !self.is_concurrent() && !matches!(self, LogHeader | Unknown | UnifiedGcInfo)
    }
}

/// A heap occupancy transition, `BEFORE->AFTER(COMMITTED)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MemDelta {
    pub before: MemSize,
    pub after: MemSize,
    pub committed: MemSize,
}

/// A classified, fully hydrated event.
#[derive(Debug, Clone, Serialize)]
pub struct TypedEvent {
    pub kind: EventType,
    /// Microseconds since JVM start, when the line carried (or implied)
    /// an uptime.
    pub timestamp_micros: Option<i64>,
    /// Wall-clock stamp, when the line carried one.
    pub datestamp: Option<DateTime<FixedOffset>>,
    /// Event duration in microseconds.
    pub duration_micros: Option<i64>,
    /// Whole-heap transition, when the line reports one.
    pub heap: Option<MemDelta>,
    /// Young-generation transition, when reported separately.
    pub young: Option<MemDelta>,
    /// The canonical line the event was hydrated from.
    pub line: String,
}

impl TypedEvent {
    /// End of the event on the uptime axis, when both halves are known.
    pub fn end_micros(&self) -> Option<i64> {
        match (self.timestamp_micros, self.duration_micros) {
            (Some(ts), Some(d)) => Some(ts + d),
            (Some(ts), None) => Some(ts),
            _ => None,
        }
    }
}
