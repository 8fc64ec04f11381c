//! Event hydration — pulling timestamps, durations, and heap deltas out
//! of a classified line.
//!
//! Hydration trusts the cascade: a line classified as a pause carries the
//! shapes the recognizer matched on, so extraction here is best-effort
//! field by field but never reclassifies. Fields a line genuinely does
//! not carry stay `None`.

use std::sync::OnceLock;

use chrono::{DateTime, FixedOffset};
use regex::Regex;

use super::model::{EventType, MemDelta, TypedEvent};
use crate::decorator;
use crate::units::{time, MemSize};

const MEM: &str = r"[\d.,]+(?:[KMG]B?|B)";

fn transition_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(&format!(r"({MEM})->({MEM})\(({MEM})\)")).expect("valid transition regex")
    })
}

fn young_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(&format!(
            r"\[(?:DefNew|ParNew(?: \(promotion failed\))?|PSYoungGen): ({MEM})->({MEM})\(({MEM})\)"
        ))
        .expect("valid young transition regex")
    })
}

// Metaspace/perm transitions describe class storage, not the heap.
fn metaspace_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r", \[(?:Metaspace|PSPermGen|CMS Perm|Perm): [^\]]+\]")
            .expect("valid metaspace regex")
    })
}

fn legacy_secs_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?:, |/)([\d.,]+) secs\]").expect("valid secs regex"))
}

fn legacy_ms_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r", ([\d.,]+) ms\]").expect("valid ms regex"))
}

fn unified_ms_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r" ([\d.,]+)ms$").expect("valid unified ms regex"))
}

fn stopped_secs_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"stopped: ([\d.,]+) seconds").expect("valid stopped regex")
    })
}

fn application_secs_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"Application time: ([\d.,]+) seconds").expect("valid application regex")
    })
}

fn delta(before: &str, after: &str, committed: &str) -> Option<MemDelta> {
    Some(MemDelta {
        before: MemSize::parse(before)?,
        after: MemSize::parse(after)?,
        committed: MemSize::parse(committed)?,
    })
}

/// Whole-heap transition: the last one on the line, class storage
/// excluded.
fn heap_delta(line: &str) -> Option<MemDelta> {
    let scrubbed = metaspace_re().replace_all(line, "");
    let caps = transition_re().captures_iter(&scrubbed).last()?;
    delta(&caps[1], &caps[2], &caps[3])
}

fn young_delta(line: &str) -> Option<MemDelta> {
    let caps = young_re().captures(line)?;
    delta(&caps[1], &caps[2], &caps[3])
}

fn legacy_duration(line: &str) -> Option<i64> {
    if let Some(caps) = legacy_secs_re().captures_iter(line).last() {
        return time::seconds_to_micros(caps.get(1)?.as_str());
    }
    let caps = legacy_ms_re().captures_iter(line).last()?;
    time::millis_to_micros(caps.get(1)?.as_str())
}

fn unified_duration(body: &str) -> Option<i64> {
    if let Some(caps) = unified_ms_re().captures(body) {
        return time::millis_to_micros(caps.get(1)?.as_str());
    }
    let caps = stopped_secs_re().captures(body)?;
    time::seconds_to_micros(caps.get(1)?.as_str())
}

/// Hydrates one classified line into a [`TypedEvent`].
pub fn hydrate(
    kind: EventType,
    line: &str,
    jvm_start: Option<&DateTime<FixedOffset>>,
) -> TypedEvent {
    let mut timestamp_micros = None;
    let mut datestamp = None;
    let mut duration_micros = None;
    let mut heap = None;
    let mut young = None;

    if kind.is_unified() {
        if let Some((dec, body)) = decorator::strip_unified(line) {
            datestamp = dec.datestamp;
            timestamp_micros = dec.uptime_micros.or_else(|| {
                let (start, stamp) = (jvm_start?, dec.datestamp?);
                Some(((stamp - *start).num_microseconds()?).max(0))
            });
            duration_micros = unified_duration(body);
            heap = heap_delta(body);
        }
    } else {
        if let Some((dec, _)) = decorator::strip(line) {
            datestamp = dec.datestamp;
            timestamp_micros = dec.resolved_micros(jvm_start);
        }
        duration_micros = match kind {
            EventType::ApplicationStoppedTime => stopped_secs_re()
                .captures(line)
                .and_then(|caps| time::seconds_to_micros(&caps[1])),
            EventType::ApplicationConcurrentTime => application_secs_re()
                .captures(line)
                .and_then(|caps| time::seconds_to_micros(&caps[1])),
            EventType::LogHeader | EventType::Unknown => None,
            _ => legacy_duration(line),
        };
        if !matches!(kind, EventType::LogHeader | EventType::Unknown) {
            heap = heap_delta(line);
            young = young_delta(line);
        }
    }

    TypedEvent {
        kind,
        timestamp_micros,
        datestamp,
        duration_micros,
        heap,
        young,
        line: line.to_string(),
    }
}
