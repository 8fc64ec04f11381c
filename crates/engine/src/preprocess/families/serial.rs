//! Serial family preprocessor.
//!
//! `-XX:+PrintTenuringDistribution` splits a DefNew collection across
//! three or more physical lines: the header ends mid-token at `[DefNew`,
//! the tenuring table follows, and the size/duration body arrives on a
//! `: `-prefixed closing line.
//!
//! ```text
//! 0.521: [GC (Allocation Failure) 0.521: [DefNew
//! Desired survivor size 524288 bytes, new threshold 7 (max 15)
//! - age   1:     268432 bytes,     268432 total
//! : 8192K->1024K(9216K), 0.0047345 secs] 8192K->5120K(19456K), 0.0048456 secs]
//! ```

use std::sync::OnceLock;

use regex::Regex;

use super::DECORATOR;
use crate::preprocess::model::{FamilyId, PreprocessContext};
use crate::preprocess::traits::{FamilyPreprocessor, Window};

fn begin_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(&format!(
            r"^{DECORATOR}\[GC \((?:Allocation Failure|System\.gc\(\)|GCLocker Initiated GC)\) {DECORATOR}\[DefNew$"
        ))
        .expect("valid serial begin regex")
    })
}

fn tenuring_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"^(?:Desired survivor size \d+ bytes, new threshold \d+ \(max \d+\)|- age\s+\d+:\s+\d+ bytes,\s+\d+ total)$",
        )
        .expect("valid tenuring regex")
    })
}

fn end_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"^(: \d+K->\d+K\(\d+K\), [\d.,]+ secs\] \d+K->\d+K\(\d+K\), [\d.,]+ secs\])(?: \[Times:.*)?$",
        )
        .expect("valid serial end regex")
    })
}

pub struct SerialPreprocessor;

impl FamilyPreprocessor for SerialPreprocessor {
    fn family(&self) -> FamilyId {
        FamilyId::Serial
    }

    fn matches(&self, window: &Window<'_>, ctx: &PreprocessContext) -> bool {
        match ctx.owner() {
            Some(FamilyId::Serial) if ctx.is_mid_event() => {
                tenuring_re().is_match(window.current) || end_re().is_match(window.current)
            }
            None => begin_re().is_match(window.current),
            _ => false,
        }
    }

    fn process(&self, window: &Window<'_>, ctx: &mut PreprocessContext) -> Vec<String> {
        if ctx.owner() == Some(FamilyId::Serial) && ctx.is_mid_event() {
            if let Some(caps) = end_re().captures(window.current) {
                return ctx.complete(&caps[1]);
            }
            // Tenuring distribution rows carry nothing downstream.
            return Vec::new();
        }

        ctx.begin_event(FamilyId::Serial, window.current.trim_end());
        Vec::new()
    }
}
