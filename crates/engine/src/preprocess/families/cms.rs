//! CMS family preprocessor.
//!
//! CMS logging interleaves concurrent-phase completion markers into the
//! middle of a ParNew pause's physical lines. The marker belongs to a
//! different event and must come out *after* the pause, never inside it:
//!
//! ```text
//! 46674.719: [GC (Allocation Failure) 46674.719: [ParNew46674.749: [CMS-concurrent-abortable-preclean: 1.046/2.508 secs] [Times: user=1.33 sys=0.06, real=2.51 secs]
//! : 153599K->17023K(153600K), 0.0383370 secs] 229326K->95417K(494976K), 0.0384820 secs] [Times: user=0.06 sys=0.00, real=0.04 secs]
//! ```
//!
//! normalizes to the ParNew canonical line followed by the entangled
//! `46674.749: [CMS-concurrent-abortable-preclean: 1.046/2.508 secs]`.

use std::sync::OnceLock;

use regex::Regex;

use super::DECORATOR;
use crate::preprocess::model::{FamilyId, PreprocessContext};
use crate::preprocess::traits::{FamilyPreprocessor, Window};

fn begin_glued_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(&format!(
            r"^({DECORATOR}\[GC \((?:Allocation Failure|GCLocker Initiated GC|CMS Final Remark)\) {DECORATOR}\[ParNew)({DECORATOR}\[CMS-concurrent-(?:mark|preclean|abortable-preclean|sweep|reset): [\d.,]+/[\d.,]+ secs\])(?: \[Times:[^\]]*\])?$"
        ))
        .expect("valid cms glued regex")
    })
}

fn begin_split_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(&format!(
            r"^{DECORATOR}\[GC \((?:Allocation Failure|GCLocker Initiated GC)\) {DECORATOR}\[ParNew$"
        ))
        .expect("valid cms split regex")
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
        .expect("valid cms end regex")
    })
}

pub struct CmsPreprocessor;

impl FamilyPreprocessor for CmsPreprocessor {
    fn family(&self) -> FamilyId {
        FamilyId::Cms
    }

    fn matches(&self, window: &Window<'_>, ctx: &PreprocessContext) -> bool {
        match ctx.owner() {
            Some(FamilyId::Cms) if ctx.is_mid_event() => {
                tenuring_re().is_match(window.current) || end_re().is_match(window.current)
            }
            None => {
                begin_glued_re().is_match(window.current)
                    || begin_split_re().is_match(window.current)
            }
            _ => false,
        }
    }

    fn process(&self, window: &Window<'_>, ctx: &mut PreprocessContext) -> Vec<String> {
        if ctx.owner() == Some(FamilyId::Cms) && ctx.is_mid_event() {
            if let Some(caps) = end_re().captures(window.current) {
                return ctx.complete(&caps[1]);
            }
            return Vec::new();
        }

        if let Some(caps) = begin_glued_re().captures(window.current) {
            ctx.begin_event(FamilyId::Cms, &caps[1]);
            ctx.entangle(caps[2].to_string());
            return Vec::new();
        }

        ctx.begin_event(FamilyId::Cms, window.current.trim_end());
        Vec::new()
    }
}
