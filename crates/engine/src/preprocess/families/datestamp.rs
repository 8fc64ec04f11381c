//! Decoration repair and heap-dump stripping.
//!
//! Some JVMs emit the same decoration twice when two logging flags race
//! on one line (`DATE: DATE: TS: TS: [GC …`). This family collapses the
//! run back to a single `DATE: TS:` pair. It also drops `{Heap before GC
//! invocations=…}` dumps, which describe generations line by line and
//! carry no event of their own.

use std::sync::OnceLock;

use regex::Regex;

use crate::decorator::parse::{strip_counted, DATESTAMP_FORMAT};
use crate::preprocess::model::{FamilyId, PreprocessContext};
use crate::preprocess::traits::{FamilyPreprocessor, Window};

fn heap_dump_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"^(?:\{Heap before GC invocations=\d+|Heap after GC invocations=\d+|\}$|\s+(?:par new generation|def new generation|tenured generation|concurrent mark-sweep generation|concurrent-mark-sweep perm gen|PSYoungGen|ParOldGen|PSOldGen|garbage-first heap|region size|eden space|from space|to space|object space|the space|Metaspace|class space|compacting perm gen))",
        )
        .expect("valid heap dump regex")
    })
}

fn duplicated_decoration(line: &str) -> Option<String> {
    let (decorator, rest, dates, times) = strip_counted(line)?;
    if dates <= 1 && times <= 1 {
        return None;
    }
    let mut repaired = String::with_capacity(line.len());
    if let Some(datestamp) = decorator.datestamp {
        repaired.push_str(&datestamp.format(DATESTAMP_FORMAT).to_string());
        repaired.push_str(": ");
    }
    if let Some(micros) = decorator.uptime_micros {
        repaired.push_str(&format!("{}.{:03}: ", micros / 1_000_000, micros % 1_000_000 / 1_000));
    }
    repaired.push_str(rest);
    Some(repaired)
}

pub struct DateStampPreprocessor;

impl FamilyPreprocessor for DateStampPreprocessor {
    fn family(&self) -> FamilyId {
        FamilyId::DateStamp
    }

    fn matches(&self, window: &Window<'_>, ctx: &PreprocessContext) -> bool {
        if ctx.owner().is_some() {
            return false;
        }
        heap_dump_re().is_match(window.current) || duplicated_decoration(window.current).is_some()
    }

    fn process(&self, window: &Window<'_>, _ctx: &mut PreprocessContext) -> Vec<String> {
        if heap_dump_re().is_match(window.current) {
            return Vec::new();
        }
        match duplicated_decoration(window.current) {
            Some(repaired) => vec![repaired],
            None => Vec::new(),
        }
    }
}
