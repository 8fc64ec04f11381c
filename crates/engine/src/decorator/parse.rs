//! Longest-prefix decorator recognition and de-duplication.

use std::sync::OnceLock;

use chrono::{DateTime, FixedOffset};
use regex::Regex;

use crate::units::time;

pub(crate) const DATESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3f%z";

fn datestamp_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^(\d{4}-\d{2}-\d{2}T\d{2}:\d{2}:\d{2}\.\d{3}[+-]\d{4}): ")
            .expect("valid datestamp regex")
    })
}

fn timestamp_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(\d+[.,]\d{3}): ").expect("valid timestamp regex"))
}

/// The de-duplicated decorator of a legacy log line. Immutable once parsed.
#[derive(Debug, Clone, PartialEq)]
pub struct Decorator {
    /// Absolute datestamp, when `-XX:+PrintGCDateStamps` was on.
    pub datestamp: Option<DateTime<FixedOffset>>,
    /// Seconds since JVM start, as whole microseconds.
    pub uptime_micros: Option<i64>,
}

impl Decorator {
    /// Resolve to a single microsecond timestamp relative to JVM start.
    ///
    /// The relative timestamp wins when present; a lone datestamp needs the
    /// externally supplied JVM start date to become an elapsed time.
    pub fn resolved_micros(&self, jvm_start: Option<&DateTime<FixedOffset>>) -> Option<i64> {
        if let Some(uptime) = self.uptime_micros {
            return Some(uptime);
        }
        let date = self.datestamp?;
        let start = jvm_start?;
        let elapsed = date.signed_duration_since(*start).num_microseconds()?;
        Some(elapsed.max(0))
    }
}

/// Find the longest valid decorator prefix of `line`.
///
/// Returns the de-duplicated decorator and the payload after it, or `None`
/// when the line carries no decorator — expected and non-fatal, callers
/// fall back to family-specific handling.
///
/// Duplicated datestamps/timestamps (a known logging defect: the prefix
/// writer races with itself and prints each half twice) are consumed and
/// collapsed to the first occurrence of each.
pub fn strip(line: &str) -> Option<(Decorator, &str)> {
    strip_counted(line).map(|(dec, rest, _, _)| (dec, rest))
}

/// Like [`strip`], additionally reporting how many datestamp and timestamp
/// tokens were consumed. The date-stamp normalizer keys on counts > 1.
pub(crate) fn strip_counted(line: &str) -> Option<(Decorator, &str, u8, u8)> {
    let mut rest = line;
    let mut datestamp: Option<DateTime<FixedOffset>> = None;
    let mut uptime: Option<i64> = None;
    let mut dates_seen = 0u8;
    let mut times_seen = 0u8;

    loop {
        if dates_seen < 2 {
            if let Some(caps) = datestamp_re().captures(rest) {
                let parsed =
                    DateTime::parse_from_str(caps.get(1)?.as_str(), DATESTAMP_FORMAT).ok()?;
                if datestamp.is_none() {
                    datestamp = Some(parsed);
                }
                dates_seen += 1;
                rest = &rest[caps.get(0)?.len()..];
                continue;
            }
        }
        if times_seen < 2 {
            if let Some(caps) = timestamp_re().captures(rest) {
                let micros = time::seconds_to_micros(caps.get(1)?.as_str())?;
                if uptime.is_none() {
                    uptime = Some(micros);
                }
                times_seen += 1;
                rest = &rest[caps.get(0)?.len()..];
                continue;
            }
        }
        break;
    }

    if dates_seen == 0 && times_seen == 0 {
        return None;
    }

    Some((
        Decorator {
            datestamp,
            uptime_micros: uptime,
        },
        rest,
        dates_seen,
        times_seen,
    ))
}

/// The bracketed decorations of a unified-logging line.
#[derive(Debug, Clone, PartialEq)]
pub struct UnifiedDecorator {
    pub uptime_micros: Option<i64>,
    pub datestamp: Option<DateTime<FixedOffset>>,
    /// Comma-joined tag set of the last tag bracket (e.g. "gc,start").
    pub tags: String,
}

impl UnifiedDecorator {
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.split(',').any(|t| t.trim() == tag)
    }
}

fn unified_datestamp_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^\d{4}-\d{2}-\d{2}T\d{2}:\d{2}:\d{2}\.\d{3}[+-]\d{4}$")
            .expect("valid unified datestamp regex")
    })
}

const UNIFIED_LEVELS: [&str; 5] = ["trace", "debug", "info", "warning", "error"];

/// Strip the leading `[…][…]` decoration brackets of a unified-logging
/// line. Returns `None` unless the line starts with an uptime or datestamp
/// bracket — the discriminator between the two top-level grammars.
pub fn strip_unified(line: &str) -> Option<(UnifiedDecorator, &str)> {
    let mut rest = line;
    let mut uptime: Option<i64> = None;
    let mut datestamp: Option<DateTime<FixedOffset>> = None;
    let mut tags = String::new();

    while let Some(body) = rest.strip_prefix('[') {
        let close = body.find(']')?;
        let content = body[..close].trim();

        if let Some(seconds) = content.strip_suffix('s') {
            if let Some(micros) = time::seconds_to_micros(seconds) {
                if uptime.is_none() {
                    uptime = Some(micros);
                }
                rest = &body[close + 1..];
                continue;
            }
        }
        if unified_datestamp_re().is_match(content) {
            if datestamp.is_none() {
                datestamp = DateTime::parse_from_str(content, DATESTAMP_FORMAT).ok();
            }
            rest = &body[close + 1..];
            continue;
        }
        if UNIFIED_LEVELS.contains(&content) {
            rest = &body[close + 1..];
            continue;
        }
        if !content.is_empty()
            && content
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == ',')
        {
            tags = content.to_string();
            rest = &body[close + 1..];
            continue;
        }
        // Not a decoration bracket (e.g. "[Times: …]"); stop here.
        break;
    }

    if uptime.is_none() && datestamp.is_none() {
        return None;
    }

    Some((
        UnifiedDecorator {
            uptime_micros: uptime,
            datestamp,
            tags,
        },
        rest.strip_prefix(' ').unwrap_or(rest),
    ))
}
