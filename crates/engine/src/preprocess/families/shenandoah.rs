//! Shenandoah family preprocessor.
//!
//! Legacy Shenandoah brackets every phase with a `, start]` announcement,
//! a few indented worker/pacer lines, and a closing line carrying the
//! real duration:
//!
//! ```text
//! 16.153: [Pause Init Mark, start]
//!     Using 2 of 4 workers for init marking
//!     Pacer for Mark. Expected Live: 43M, Free: 2761M, Non-Taxable: 276M, Alloc Tax Rate: 0.2x
//! 16.154: [Pause Init Mark, 0.772 ms]
//! ```
//!
//! Only the closing line survives; the announcement and the indented
//! block are throwaway.

use std::sync::OnceLock;

use regex::Regex;

use super::DECORATOR;
use crate::preprocess::model::{FamilyId, PreprocessContext};
use crate::preprocess::traits::{FamilyPreprocessor, Window};

fn start_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(&format!(
            r"^{DECORATOR}\[(?:Pause|Concurrent) .*, start\]$"
        ))
        .expect("valid shenandoah start regex")
    })
}

fn end_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(&format!(
            r"^{DECORATOR}\[(?:Pause|Concurrent) .*, [\d.,]+ ms\]$"
        ))
        .expect("valid shenandoah end regex")
    })
}

fn middle_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\s{2,}\S").expect("valid shenandoah middle regex"))
}

pub struct ShenandoahPreprocessor;

impl FamilyPreprocessor for ShenandoahPreprocessor {
    fn family(&self) -> FamilyId {
        FamilyId::Shenandoah
    }

    fn matches(&self, window: &Window<'_>, ctx: &PreprocessContext) -> bool {
        match ctx.owner() {
            Some(FamilyId::Shenandoah) => {
                middle_re().is_match(window.current) || end_re().is_match(window.current)
            }
            None => start_re().is_match(window.current),
            _ => false,
        }
    }

    fn process(&self, window: &Window<'_>, ctx: &mut PreprocessContext) -> Vec<String> {
        if ctx.owner() == Some(FamilyId::Shenandoah) {
            if end_re().is_match(window.current) {
                ctx.end_block();
                return vec![window.current.to_string()];
            }
            return Vec::new();
        }

        ctx.begin_block(FamilyId::Shenandoah);
        Vec::new()
    }
}
