//! Model — preprocessing context, family ids, and the unidentified bucket.

use std::collections::VecDeque;

use serde::Serialize;

/// A collector family with its own logging grammar.
///
/// `DateStamp` is the family-agnostic normalizer for duplicated decorators
/// and verbose heap dumps; it participates in dispatch like any family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FamilyId {
    Cms,
    G1,
    Parallel,
    Serial,
    Shenandoah,
    DateStamp,
}

impl FamilyId {
    pub fn as_str(&self) -> &'static str {
        match self {
            FamilyId::Cms => "cms",
            FamilyId::G1 => "g1",
            FamilyId::Parallel => "parallel",
            FamilyId::Serial => "serial",
            FamilyId::Shenandoah => "shenandoah",
            FamilyId::DateStamp => "date_stamp",
        }
    }
}

/// Per-file mutable state shared by all family preprocessors.
///
/// Illegal states are unrepresentable by construction: an assembling event
/// always has an owner, and the entangled queue only drains through a
/// completed or force-flushed event.
#[derive(Debug, Default)]
pub struct PreprocessContext {
    owner: Option<FamilyId>,
    mid_event: bool,
    pending: String,
    entangled: VecDeque<String>,
}

impl PreprocessContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// The family currently owning an in-progress multi-line region.
    pub fn owner(&self) -> Option<FamilyId> {
        self.owner
    }

    /// True while a multi-line event body is being assembled (as opposed
    /// to a throwaway block, which has an owner but no pending fragment).
    pub fn is_mid_event(&self) -> bool {
        self.mid_event
    }

    pub fn pending(&self) -> &str {
        &self.pending
    }

    /// Start assembling a multi-line event owned by `family`.
    pub fn begin_event(&mut self, family: FamilyId, fragment: &str) {
        tracing::trace!(family = family.as_str(), "preprocess: event begins");
        self.owner = Some(family);
        self.mid_event = true;
        self.pending.clear();
        self.pending.push_str(fragment);
    }

    /// Claim ownership of a throwaway block (discarded line run).
    pub fn begin_block(&mut self, family: FamilyId) {
        tracing::trace!(family = family.as_str(), "preprocess: throwaway block begins");
        self.owner = Some(family);
        self.mid_event = false;
        self.pending.clear();
    }

    /// Append a continuation fragment to the pending event.
    pub fn append(&mut self, fragment: &str) {
        debug_assert!(self.mid_event, "append without an open event");
        self.pending.push_str(fragment);
    }

    /// Defer an unrelated fragment until the enclosing event closes.
    pub fn entangle(&mut self, fragment: String) {
        tracing::trace!(fragment = %fragment, "preprocess: entangled fragment queued");
        self.entangled.push_back(fragment);
    }

    /// Close the pending event with `terminator` and emit it followed by
    /// every entangled fragment in FIFO order.
    pub fn complete(&mut self, terminator: &str) -> Vec<String> {
        debug_assert!(self.mid_event, "complete without an open event");
        let mut canonical = std::mem::take(&mut self.pending);
        canonical.push_str(terminator);
        self.owner = None;
        self.mid_event = false;

        let mut emitted = vec![canonical];
        emitted.extend(self.entangled.drain(..));
        emitted
    }

    /// Close a throwaway block without emitting anything.
    pub fn end_block(&mut self) {
        self.owner = None;
        self.mid_event = false;
    }

    /// End-of-input: emit whatever was assembled plus any entangled
    /// fragments. A truncated file is not an error.
    pub fn force_flush(&mut self) -> Vec<String> {
        let mut emitted = Vec::new();
        if self.mid_event && !self.pending.is_empty() {
            tracing::debug!("preprocess: flushing unterminated event at end of input");
            emitted.push(std::mem::take(&mut self.pending));
        }
        emitted.extend(self.entangled.drain(..));
        self.owner = None;
        self.mid_event = false;
        self.pending.clear();
        emitted
    }
}

/// Bounded overflow bucket for lines nothing could make sense of.
///
/// Once full, further lines are counted and dropped — a deliberate lossy
/// degradation that bounds memory on garbled input.
#[derive(Debug)]
pub struct UnidentifiedBucket {
    lines: Vec<String>,
    dropped: u64,
    capacity: usize,
}

impl UnidentifiedBucket {
    pub fn new(capacity: usize) -> Self {
        Self {
            lines: Vec::new(),
            dropped: 0,
            capacity,
        }
    }

    pub fn push(&mut self, line: String) {
        if self.lines.len() < self.capacity {
            self.lines.push(line);
        } else {
            self.dropped += 1;
            tracing::trace!(dropped = self.dropped, "unidentified bucket full, dropping line");
        }
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Lines discarded beyond capacity.
    pub fn dropped(&self) -> u64 {
        self.dropped
    }

    pub fn into_lines(self) -> (Vec<String>, u64) {
        (self.lines, self.dropped)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ─── Context lifecycle ──────────────────────────────────────

    #[test]
    fn event_assembly_and_completion() {
        let mut ctx = PreprocessContext::new();
        ctx.begin_event(FamilyId::Cms, "0.521: [GC [ParNew");
        assert_eq!(ctx.owner(), Some(FamilyId::Cms));
        assert!(ctx.is_mid_event());

        let emitted = ctx.complete(": 1K->2K(3K), 0.001 secs]");
        assert_eq!(emitted, vec!["0.521: [GC [ParNew: 1K->2K(3K), 0.001 secs]"]);
        assert_eq!(ctx.owner(), None);
        assert!(!ctx.is_mid_event());
    }

    #[test]
    fn entangled_fragments_replay_fifo_after_event() {
        let mut ctx = PreprocessContext::new();
        ctx.begin_event(FamilyId::Cms, "head");
        ctx.entangle("first".to_string());
        ctx.entangle("second".to_string());

        let emitted = ctx.complete("-tail");
        assert_eq!(emitted, vec!["head-tail", "first", "second"]);
    }

    #[test]
    fn throwaway_block_emits_nothing() {
        let mut ctx = PreprocessContext::new();
        ctx.begin_block(FamilyId::Serial);
        assert_eq!(ctx.owner(), Some(FamilyId::Serial));
        assert!(!ctx.is_mid_event());
        ctx.end_block();
        assert_eq!(ctx.owner(), None);
    }

    #[test]
    fn force_flush_emits_partial_event_and_entangled() {
        let mut ctx = PreprocessContext::new();
        ctx.begin_event(FamilyId::G1, "partial pause body");
        ctx.entangle("deferred".to_string());

        let emitted = ctx.force_flush();
        assert_eq!(emitted, vec!["partial pause body", "deferred"]);
        assert!(ctx.force_flush().is_empty());
    }

    // ─── Bucket bound ───────────────────────────────────────────

    #[test]
    fn bucket_caps_at_capacity_without_error() {
        let mut bucket = UnidentifiedBucket::new(3);
        for i in 0..10 {
            bucket.push(format!("garbage {i}"));
        }
        assert_eq!(bucket.len(), 3);
        assert_eq!(bucket.dropped(), 7);
        assert_eq!(bucket.lines()[0], "garbage 0");
    }
}
