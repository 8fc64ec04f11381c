//! G1 family preprocessor.
//!
//! A G1 pause spans a header line, a block of indented phase details, and
//! a closing `[Times: …]` line. Concurrent-cycle markers run on their own
//! thread and land anywhere inside that block, sometimes glued onto the
//! header or splitting the pause duration onto its own line:
//!
//! ```text
//! 0.895: [GC pause (G1 Evacuation Pause) (young)0.895: [GC concurrent-root-region-scan-end, 0.0001607 secs]
//! 0.895: [GC concurrent-mark-start]
//! , 0.0209631 secs]
//!    [Parallel Time: 1.9 ms, GC Workers: 4]
//!    [Eden: 24.0M(24.0M)->0.0B(13.0M) Survivors: 0.0B->3072.0K Heap: 24.2M(256.0M)->5836.6K(256.0M)]
//!  [Times: user=0.01 sys=0.00, real=0.02 secs]
//! ```
//!
//! yields the stitched pause line (with a trailing heap transition pulled
//! up from the Eden summary) followed by the two concurrent markers.

use std::sync::OnceLock;

use regex::Regex;

use super::DECORATOR;
use crate::preprocess::model::{FamilyId, PreprocessContext};
use crate::preprocess::traits::{FamilyPreprocessor, Window};

fn pause_head_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(&format!(
            r"^({DECORATOR}\[GC pause \([^)]+\)(?: \((?:young|mixed)\))?(?: \(initial-mark\))?)(.*)$"
        ))
        .expect("valid g1 pause head regex")
    })
}

fn concurrent_line_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(&format!(
            r"^{DECORATOR}\[GC concurrent-[a-z-]+(?:, [\d.,]+ secs)?\]$"
        ))
        .expect("valid g1 concurrent regex")
    })
}

// Pause duration glued onto the front of a concurrent marker.
fn glued_duration_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(&format!(
            r"^({DECORATOR}\[GC concurrent-[a-z-]+\])(, [\d.,]+ secs\])$"
        ))
        .expect("valid g1 glued duration regex")
    })
}

fn duration_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^, [\d.,]+ secs\]$").expect("valid g1 duration regex"))
}

fn eden_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"^\s+\[Eden: .* Heap: ([\d.,]+[BKMG])\([\d.,]+[BKMG]\)->([\d.,]+[BKMG])\(([\d.,]+[BKMG])\)\]$",
        )
        .expect("valid g1 eden regex")
    })
}

fn times_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^ \[Times: .*\]\s*$").expect("valid g1 times regex"))
}

fn detail_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\s{2,}\[.*$").expect("valid g1 detail regex"))
}

fn complete_tail(tail: &str) -> bool {
    duration_re().is_match(tail)
}

pub struct G1Preprocessor;

impl FamilyPreprocessor for G1Preprocessor {
    fn family(&self) -> FamilyId {
        FamilyId::G1
    }

    fn matches(&self, window: &Window<'_>, ctx: &PreprocessContext) -> bool {
        match ctx.owner() {
            Some(FamilyId::G1) if ctx.is_mid_event() => {
                times_re().is_match(window.current)
                    || eden_re().is_match(window.current)
                    || detail_re().is_match(window.current)
                    || duration_re().is_match(window.current)
                    || glued_duration_re().is_match(window.current)
                    || concurrent_line_re().is_match(window.current)
            }
            None => {
                let Some(caps) = pause_head_re().captures(window.current) else {
                    return false;
                };
                let tail = &caps[2];
                if tail.is_empty() || concurrent_line_re().is_match(tail) {
                    return true;
                }
                // Canonical one-liner: only claim it when detail lines
                // follow, otherwise it passes through untouched.
                complete_tail(tail)
                    && window.next.is_some_and(|n| detail_re().is_match(n))
            }
            _ => false,
        }
    }

    fn process(&self, window: &Window<'_>, ctx: &mut PreprocessContext) -> Vec<String> {
        if ctx.owner() == Some(FamilyId::G1) && ctx.is_mid_event() {
            if times_re().is_match(window.current) {
                return ctx.complete("");
            }
            if let Some(caps) = eden_re().captures(window.current) {
                ctx.append(&format!(" {}->{}({})", &caps[1], &caps[2], &caps[3]));
                return Vec::new();
            }
            if detail_re().is_match(window.current) {
                return Vec::new();
            }
            if duration_re().is_match(window.current) {
                ctx.append(window.current);
                return Vec::new();
            }
            if let Some(caps) = glued_duration_re().captures(window.current) {
                ctx.entangle(caps[1].to_string());
                ctx.append(&caps[2]);
                return Vec::new();
            }
            ctx.entangle(window.current.to_string());
            return Vec::new();
        }

        let caps = pause_head_re()
            .captures(window.current)
            .unwrap_or_else(|| unreachable!("process called without matches"));
        let tail = caps.get(2).map_or("", |m| m.as_str()).to_string();
        ctx.begin_event(FamilyId::G1, &caps[1]);
        if concurrent_line_re().is_match(&tail) {
            ctx.entangle(tail);
        } else if !tail.is_empty() {
            ctx.append(&tail);
        }
        Vec::new()
    }
}
