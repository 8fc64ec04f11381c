//! Parallel (throughput) family preprocessor.
//!
//! Two multi-line shapes occur. Tenuring distribution splits a scavenge
//! between its cause header and the `[PSYoungGen: …]` body, and
//! `-XX:+PrintAdaptiveSizePolicy` interleaves ergonomics commentary into a
//! full collection:
//!
//! ```text
//! 0.521: [Full GC (Ergonomics) AdaptiveSizeStart: 0.521 collection: 1
//! PSAdaptiveSizePolicy::compute_eden_space_size: costs minor_time: 0.000521 …
//! AdaptiveSizeStop: collection: 1
//!  [PSYoungGen: 2688K->0K(18944K)] [ParOldGen: 13568K->13462K(44032K)] 16256K->13462K(62976K), [Metaspace: 3150K->3150K(1056768K)], 0.0427351 secs]
//! ```

use std::sync::OnceLock;

use regex::Regex;

use super::DECORATOR;
use crate::preprocess::model::{FamilyId, PreprocessContext};
use crate::preprocess::traits::{FamilyPreprocessor, Window};

fn begin_split_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(&format!(
            r"^{DECORATOR}\[(?:Full )?GC \((?:Allocation Failure|GCLocker Initiated GC|Metadata GC Threshold|System\.gc\(\)|Ergonomics)\)\s*$"
        ))
        .expect("valid parallel split regex")
    })
}

fn begin_ergonomics_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(&format!(
            r"^({DECORATOR}\[(?:Full )?GC \((?:Ergonomics|Allocation Failure|System\.gc\(\)|Metadata GC Threshold)\) )AdaptiveSizeStart: [\d.,]+ collection: \d+\s*$"
        ))
        .expect("valid parallel ergonomics regex")
    })
}

fn middle_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"^(?:PS[A-Za-z]+Policy::|AdaptiveSize(?:Start|Stop): |Desired survivor size \d+ bytes|- age\s+\d+:|\s+(?:avg_survived_padded_avg|avg_promoted_padded_avg|base_footprint):)",
        )
        .expect("valid parallel middle regex")
    })
}

fn end_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"^ ?(\[PSYoungGen: \d+K->\d+K\(\d+K\)\].*?, [\d.,]+ secs\])(?: \[Times:.*)?$",
        )
        .expect("valid parallel end regex")
    })
}

/// Does the lookahead line continue a parallel event body?
fn is_continuation(next: Option<&str>) -> bool {
    match next {
        Some(line) => middle_re().is_match(line) || end_re().is_match(line),
        None => false,
    }
}

pub struct ParallelPreprocessor;

impl FamilyPreprocessor for ParallelPreprocessor {
    fn family(&self) -> FamilyId {
        FamilyId::Parallel
    }

    fn matches(&self, window: &Window<'_>, ctx: &PreprocessContext) -> bool {
        match ctx.owner() {
            Some(FamilyId::Parallel) if ctx.is_mid_event() => {
                middle_re().is_match(window.current) || end_re().is_match(window.current)
            }
            None => {
                begin_ergonomics_re().is_match(window.current)
                    || (begin_split_re().is_match(window.current) && is_continuation(window.next))
            }
            _ => false,
        }
    }

    fn process(&self, window: &Window<'_>, ctx: &mut PreprocessContext) -> Vec<String> {
        if ctx.owner() == Some(FamilyId::Parallel) && ctx.is_mid_event() {
            if let Some(caps) = end_re().captures(window.current) {
                return ctx.complete(&format!(" {}", &caps[1]));
            }
            // Ergonomics / tenuring commentary is discarded.
            return Vec::new();
        }

        if let Some(caps) = begin_ergonomics_re().captures(window.current) {
            ctx.begin_event(FamilyId::Parallel, caps[1].trim_end());
            return Vec::new();
        }

        ctx.begin_event(FamilyId::Parallel, window.current.trim_end());
        Vec::new()
    }
}
