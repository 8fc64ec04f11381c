//! Preprocessing driver.
//!
//! Feeds each raw line, with one line of lookback and one of lookahead,
//! through the family preprocessors in priority order. An open event's
//! owning family is always consulted first so that ambiguous closing
//! shapes (CMS and Serial share one) land with the family that opened
//! them. Lines no family claims either pass through untouched, when they
//! already look like a canonical event line, or fall into the bounded
//! unidentified bucket. A pass-through line arriving while an event is
//! still assembling is deferred through the entangled queue so the
//! enclosing event's canonical line always comes out first.

use regex::Regex;
use tracing::{debug, trace};

use super::families::{
    strip_times_suffix, CmsPreprocessor, DateStampPreprocessor, G1Preprocessor,
    ParallelPreprocessor, SerialPreprocessor, ShenandoahPreprocessor,
};
use super::model::{PreprocessContext, UnidentifiedBucket};
use super::traits::{FamilyPreprocessor, Window};

/// Result of a full preprocessing run.
#[derive(Debug, Default)]
pub struct PreprocessOutput {
    /// Canonical single-line events, in emission order.
    pub lines: Vec<String>,
    /// Lines no rule claimed, up to the bucket capacity.
    pub unidentified: Vec<String>,
    /// Unidentified lines discarded once the bucket filled.
    pub unidentified_dropped: u64,
}

pub struct Driver {
    // Order matters! More specific families first: CMS before Serial
    // because they share a closing shape, the repair family last so it
    // only sees what nobody else wanted.
    families: Vec<Box<dyn FamilyPreprocessor>>,
    ctx: PreprocessContext,
    bucket: UnidentifiedBucket,
    lines: Vec<String>,
}

impl Driver {
    pub fn new(unidentified_capacity: usize) -> Self {
        Self {
            families: vec![
                Box::new(CmsPreprocessor),
                Box::new(G1Preprocessor),
                Box::new(ParallelPreprocessor),
                Box::new(SerialPreprocessor),
                Box::new(ShenandoahPreprocessor),
                Box::new(DateStampPreprocessor),
            ],
            ctx: PreprocessContext::new(),
            bucket: UnidentifiedBucket::new(unidentified_capacity),
            lines: Vec::new(),
        }
    }

    /// Runs the whole pipeline over an ordered line source.
    pub fn run<I>(mut self, source: I) -> PreprocessOutput
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        let raw: Vec<String> = source
            .into_iter()
            .map(Into::into)
            .filter(|l| !l.trim().is_empty())
            .collect();

        for (i, line) in raw.iter().enumerate() {
            let window = Window::new(
                if i > 0 { Some(raw[i - 1].as_str()) } else { None },
                line,
                raw.get(i + 1).map(String::as_str),
            );
            self.accept(&window);
        }
        self.finish()
    }

    fn accept(&mut self, window: &Window<'_>) {
        // Owner-first tie-break.
        if let Some(owner) = self.ctx.owner() {
            if let Some(family) = self.families.iter().find(|f| f.family() == owner) {
                if family.matches(window, &self.ctx) {
                    let emitted = family.process(window, &mut self.ctx);
                    self.lines.extend(emitted);
                    return;
                }
            }
        }

        for family in &self.families {
            if family.matches(window, &self.ctx) {
                trace!(family = family.family().as_str(), line = window.current, "claimed");
                let emitted = family.process(window, &mut self.ctx);
                self.lines.extend(emitted);
                return;
            }
        }

        if is_well_formed(window.current) {
            let line = strip_times_suffix(window.current).to_string();
            // A well-formed line arriving while another family's event is
            // still assembling is an interleaved fragment: it must come
            // out after the enclosing event, not inside it.
            if self.ctx.is_mid_event() {
                self.ctx.entangle(line);
            } else {
                self.lines.push(line);
            }
            return;
        }

        if window.current.trim_start().starts_with("[Times: ") {
            trace!(line = window.current, "stray wall clock breakdown dropped");
            return;
        }

        debug!(line = window.current, "unidentified line");
        self.bucket.push(window.current.to_string());
    }

    fn finish(mut self) -> PreprocessOutput {
        self.lines.extend(self.ctx.force_flush());
        let (unidentified, dropped) = self.bucket.into_lines();
        PreprocessOutput {
            lines: self.lines,
            unidentified,
            unidentified_dropped: dropped,
        }
    }
}

/// Whether a line already looks like a canonical event line and can pass
/// through without any family's help.
fn is_well_formed(line: &str) -> bool {
    const HEADERS: [&str; 6] = [
        "Java HotSpot(TM)",
        "OpenJDK 64-Bit",
        "Memory:",
        "CommandLine flags:",
        "Application time:",
        "Total time for which application threads were stopped:",
    ];
    if HEADERS.iter().any(|h| line.starts_with(h)) {
        return true;
    }
    if crate::decorator::strip_unified(line).is_some() {
        return true;
    }
    let Some((_, rest)) = crate::decorator::strip(line) else {
        return false;
    };
    if !rest.starts_with('[') {
        return rest.starts_with("Application time:")
            || rest.starts_with("Total time for which application threads were stopped:");
    }
    let body = strip_times_suffix(line);
    body.ends_with("secs]")
        || body.ends_with("ms]")
        || body.ends_with(")]")
        || body.ends_with("-start]")
        || body.ends_with("-end]")
        || heap_transition_tail_re().is_match(body)
}

// Stitched pause lines end with the heap transition pulled up from the
// detail block, e.g. `… secs] 24.2M->5836.6K(256.0M)`.
fn heap_transition_tail_re() -> &'static Regex {
    static RE: std::sync::OnceLock<Regex> = std::sync::OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r" [\d.,]+[BKMG]->[\d.,]+[BKMG]\([\d.,]+[BKMG]\)$")
            .expect("valid heap transition regex")
    })
}
