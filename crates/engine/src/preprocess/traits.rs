//! Core trait for family preprocessors and the sliding input window.

use super::model::{FamilyId, PreprocessContext};

/// A 3-line window over the raw input stream. `previous` is `None` on the
/// first line; `next` is `None` at end of input.
#[derive(Debug, Clone, Copy)]
pub struct Window<'a> {
    pub previous: Option<&'a str>,
    pub current: &'a str,
    pub next: Option<&'a str>,
}

impl<'a> Window<'a> {
    pub fn new(previous: Option<&'a str>, current: &'a str, next: Option<&'a str>) -> Self {
        Self {
            previous,
            current,
            next,
        }
    }
}

/// One collector family's normalization state machine.
///
/// `matches` must mirror the dispatch inside `process` exactly: the driver
/// only calls `process` on the family whose `matches` accepted the window,
/// so a disagreement between the two would silently misroute lines.
pub trait FamilyPreprocessor: Send + Sync {
    fn family(&self) -> FamilyId;

    /// Does any of this family's rules claim the current line?
    fn matches(&self, window: &Window<'_>, ctx: &PreprocessContext) -> bool;

    /// Consume the current line, mutating the context; returns zero or
    /// more canonical lines ready for classification.
    fn process(&self, window: &Window<'_>, ctx: &mut PreprocessContext) -> Vec<String>;
}
