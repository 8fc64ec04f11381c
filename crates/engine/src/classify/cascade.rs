//! The classification cascade.
//!
//! Two ordered rule tables, one per logging grammar. Within a table the
//! first matching rule wins, so specific shapes sit above the generic
//! ones they would otherwise shadow (initial-mark above young, Full GC
//! with a CMS body above ParNew). The grammar tried first follows the
//! previous event: logs do not switch grammar mid-stream, so a legacy
//! prior makes the legacy table cheaper to hit. Grammar-neutral priors
//! (headers, unknowns) leave the unified table first.

use std::sync::OnceLock;

use regex::Regex;

use super::model::EventType;
use crate::decorator;

fn table(rules: &[(EventType, &str)]) -> Vec<(EventType, Regex)> {
    rules
        .iter()
        .map(|(kind, pattern)| {
            (
                *kind,
                Regex::new(pattern).expect("valid classification rule"),
            )
        })
        .collect()
}

fn legacy_rules() -> &'static [(EventType, Regex)] {
    static RULES: OnceLock<Vec<(EventType, Regex)>> = OnceLock::new();
    RULES.get_or_init(|| {
        use EventType::*;
        table(&[
            (CmsInitialMark, r"\[GC \(CMS Initial Mark\)"),
            (CmsRemark, r"\[GC \(CMS Final Remark\)"),
            (CmsConcurrent, r"\[CMS-concurrent-"),
            (CmsFullGc, r"\(concurrent mode failure\)"),
            (CmsFullGc, r"\[CMS: "),
            (ParNew, r"\[ParNew"),
            (ParallelFullGc, r"\[Full GC \([^)]+\).*\[(?:PSYoungGen|ParOldGen)"),
            (ParallelScavenge, r"\[PSYoungGen"),
            (SerialOld, r"\[Tenured"),
            (SerialNew, r"\[DefNew"),
            (G1YoungInitialMark, r"\[GC pause \([^)]+\) \(young\) \(initial-mark\)"),
            (G1MixedPause, r"\[GC pause \([^)]+\) \(mixed\)"),
            (G1YoungPause, r"\[GC pause \([^)]+\) \(young\)"),
            (G1Remark, r"\[GC remark"),
            (G1Cleanup, r"\[GC cleanup"),
            (G1Concurrent, r"\[GC concurrent-"),
            (G1FullGc, r"\[Full GC \([^)]+\)\s+[\d.,]+[BKMG]->"),
            (ShenandoahInitMark, r"\[Pause Init Mark"),
            (ShenandoahFinalMark, r"\[Pause Final Mark"),
            (ShenandoahFinalEvac, r"\[Pause Final Evac"),
            (ShenandoahInitUpdateRefs, r"\[Pause Init Update Refs"),
            (ShenandoahFinalUpdateRefs, r"\[Pause Final Update Refs"),
            (ShenandoahDegeneratedGc, r"\[Pause Degenerated GC"),
            (ShenandoahConcurrent, r"\[Concurrent [a-z]"),
            (ApplicationStoppedTime, r"Total time for which application threads were stopped"),
            (ApplicationConcurrentTime, r"Application time:"),
            (LogHeader, r"^(?:Java HotSpot|OpenJDK|Memory:|CommandLine flags:)"),
        ])
    })
}

// Matched against the body left after stripping the bracket decorations.
fn unified_rules() -> &'static [(EventType, Regex)] {
    static RULES: OnceLock<Vec<(EventType, Regex)>> = OnceLock::new();
    RULES.get_or_init(|| {
        use EventType::*;
        table(&[
            (LogHeader, r"^(?:Using |Version |CPUs: |Memory: |Heap [Rr]egion [Ss]ize|Heap [Mm]in|Heap [Mm]ax|Initial [Cc]apacity)"),
            (UnifiedSafepoint, r#"^(?:Entering safepoint region: |Leaving safepoint region|Safepoint ")"#),
            (UnifiedSafepoint, r"^Total time for which application threads were stopped"),
            (UnifiedG1ConcurrentStart, r"^GC\(\d+\) Pause Young \(Concurrent Start\)"),
            (UnifiedG1MixedPause, r"^GC\(\d+\) Pause Young \((?:Mixed|Prepare Mixed)\)"),
            (UnifiedG1YoungPause, r"^GC\(\d+\) Pause Young \(Normal\)"),
            (UnifiedYoungPause, r"^GC\(\d+\) Pause Young"),
            (UnifiedRemark, r"^GC\(\d+\) Pause Remark"),
            (UnifiedCleanup, r"^GC\(\d+\) Pause Cleanup"),
            (UnifiedFullGc, r"^GC\(\d+\) Pause Full"),
            (UnifiedShenandoahInitMark, r"^GC\(\d+\) Pause Init Mark"),
            (UnifiedShenandoahFinalMark, r"^GC\(\d+\) Pause Final Mark"),
            (UnifiedShenandoahFinalEvac, r"^GC\(\d+\) Pause Final Evac"),
            (UnifiedShenandoahInitUpdateRefs, r"^GC\(\d+\) Pause Init Update Refs"),
            (UnifiedShenandoahFinalUpdateRefs, r"^GC\(\d+\) Pause Final Update Refs"),
            (UnifiedConcurrent, r"^GC\(\d+\) Concurrent"),
            // Any other decorated line is phase/heap chatter.
            (UnifiedGcInfo, r"."),
        ])
    })
}

fn first_match(rules: &[(EventType, Regex)], body: &str) -> Option<EventType> {
    rules
        .iter()
        .find(|(_, rule)| rule.is_match(body))
        .map(|(kind, _)| *kind)
}

fn classify_unified(line: &str) -> Option<EventType> {
    let (_, body) = decorator::strip_unified(line)?;
    first_match(unified_rules(), body)
}

fn classify_legacy(line: &str) -> Option<EventType> {
    first_match(legacy_rules(), line)
}

/// Classifies one canonical line, steered by the previous event's kind.
pub fn classify(line: &str, prior: Option<EventType>) -> EventType {
    use EventType::{LogHeader, Unknown};
    let legacy_first =
        prior.is_some_and(|p| !p.is_unified() && !matches!(p, LogHeader | Unknown));
    let kind = if legacy_first {
        classify_legacy(line).or_else(|| classify_unified(line))
    } else {
        classify_unified(line).or_else(|| classify_legacy(line))
    };
    kind.unwrap_or(Unknown)
}

#[cfg(test)]
mod tests {
    use super::*;
    use EventType::*;

    fn fresh(line: &str) -> EventType {
        classify(line, None)
    }

    // ─── Legacy grammar ────────────────────────────────────────────────

    #[test]
    fn legacy_pauses_classify_by_body() {
        let cases: &[(&str, EventType)] = &[
            (
                "0.189: [GC (Allocation Failure) 0.189: [DefNew: 8192K->1024K(9216K), 0.0047345 secs] 8192K->5120K(19456K), 0.0048456 secs]",
                SerialNew,
            ),
            (
                "2.869: [Full GC (Metadata GC Threshold) 2.869: [Tenured: 2741K->4098K(10944K), 0.0291590 secs] 7875K->4098K(15872K), [Metaspace: 20599K->20599K(1069056K)], 0.0292780 secs]",
                SerialOld,
            ),
            (
                "10.392: [GC (Allocation Failure) [PSYoungGen: 76288K->10725K(88576K)] 76288K->10733K(290816K), 0.0089752 secs]",
                ParallelScavenge,
            ),
            (
                "15.309: [Full GC (Ergonomics) [PSYoungGen: 10725K->0K(88576K)] [ParOldGen: 68245K->77207K(202240K)] 78970K->77207K(290816K), 0.2953254 secs]",
                ParallelFullGc,
            ),
            (
                "46674.719: [GC (Allocation Failure) 46674.719: [ParNew: 153599K->17023K(153600K), 0.0383370 secs] 229326K->95417K(494976K), 0.0384820 secs]",
                ParNew,
            ),
            (
                "46674.750: [GC (CMS Initial Mark) [1 CMS-initial-mark: 78393K(341376K)] 95525K(494976K), 0.0088506 secs]",
                CmsInitialMark,
            ),
            (
                "46674.749: [CMS-concurrent-abortable-preclean: 1.046/2.508 secs]",
                CmsConcurrent,
            ),
            (
                "46680.015: [Full GC (Allocation Failure) 46680.015: [CMS: 341375K->341375K(341376K), 1.9561473 secs] 494975K->427836K(494976K), 1.9563790 secs]",
                CmsFullGc,
            ),
            (
                "0.895: [GC pause (G1 Evacuation Pause) (young), 0.0209631 secs] 24.2M->5836.6K(256.0M)",
                G1YoungPause,
            ),
            (
                "1.547: [GC pause (G1 Evacuation Pause) (young) (initial-mark), 0.0097210 secs]",
                G1YoungInitialMark,
            ),
            ("0.898: [GC concurrent-mark-end, 0.0030597 secs]", G1Concurrent),
            ("16.154: [Pause Init Mark, 0.772 ms]", ShenandoahInitMark),
            (
                "16.676: [Concurrent marking 16217M->16790M(51200M), 522.513 ms]",
                ShenandoahConcurrent,
            ),
            (
                "5.351: Total time for which application threads were stopped: 0.0004600 seconds, Stopping threads took: 0.0000779 seconds",
                ApplicationStoppedTime,
            ),
            ("Application time: 0.3440086 seconds", ApplicationConcurrentTime),
            (
                "Java HotSpot(TM) 64-Bit Server VM (25.282-b08) for linux-amd64",
                LogHeader,
            ),
        ];
        for (line, expected) in cases {
            assert_eq!(fresh(line), *expected, "line: {line}");
        }
    }

    #[test]
    fn promotion_failure_with_cms_body_outranks_parnew() {
        let line = "46679.819: [GC (Allocation Failure) 46679.819: [ParNew (promotion failed): 153600K->153600K(153600K), 0.1950430 secs]46680.015: [CMS: 341375K->341375K(341376K), 1.9561473 secs] 494975K->427836K(494976K), 2.1516564 secs]";
        assert_eq!(fresh(line), CmsFullGc);
    }

    // ─── Unified grammar ───────────────────────────────────────────────

    #[test]
    fn unified_pauses_classify_by_stripped_body() {
        let cases: &[(&str, EventType)] = &[
            (
                "[0.295s][info][gc] GC(0) Pause Young (Normal) (G1 Evacuation Pause) 24M->3M(256M) 1.234ms",
                UnifiedG1YoungPause,
            ),
            (
                "[5.119s][info][gc] GC(37) Pause Young (Concurrent Start) (Metadata GC Threshold) 334M->119M(1024M) 33.138ms",
                UnifiedG1ConcurrentStart,
            ),
            (
                "[7.009s][info][gc] GC(41) Pause Young (Mixed) (G1 Evacuation Pause) 247M->119M(1024M) 17.918ms",
                UnifiedG1MixedPause,
            ),
            (
                "[5.131s][info][gc] GC(38) Pause Remark 121M->121M(1024M) 5.022ms",
                UnifiedRemark,
            ),
            (
                "[5.141s][info][gc] GC(38) Concurrent Cycle 21.748ms",
                UnifiedConcurrent,
            ),
            (
                "[12.018s][info][gc] GC(65) Pause Full (System.gc()) 120M->58M(1024M) 201.700ms",
                UnifiedFullGc,
            ),
            (
                "[0.101s][info][gc] GC(2) Pause Init Mark 0.437ms",
                UnifiedShenandoahInitMark,
            ),
            (
                "[2.132s][info][safepoint] Safepoint \"Cleanup\", Time since last: 1000237 ns",
                UnifiedSafepoint,
            ),
            ("[0.006s][info][gc] Using G1", LogHeader),
            (
                "[5.122s][info][gc,heap] GC(37) Eden regions: 38->0(44)",
                UnifiedGcInfo,
            ),
        ];
        for (line, expected) in cases {
            assert_eq!(fresh(line), *expected, "line: {line}");
        }
    }

    // ─── Grammar steering ──────────────────────────────────────────────

    #[test]
    fn prior_event_steers_grammar_order_but_not_the_result() {
        let legacy = "0.898: [GC concurrent-mark-end, 0.0030597 secs]";
        assert_eq!(classify(legacy, Some(UnifiedG1YoungPause)), G1Concurrent);
        let unified = "[5.141s][info][gc] GC(38) Concurrent Cycle 21.748ms";
        assert_eq!(classify(unified, Some(ParNew)), UnifiedConcurrent);
    }

    #[test]
    fn unmatched_lines_are_unknown() {
        assert_eq!(fresh("random stderr noise"), Unknown);
    }

    #[test]
    fn neutral_prior_keeps_unified_table_first() {
        let line = "[0.295s][info][gc] GC(0) Pause Young (Normal) (G1 Evacuation Pause) 24M->3M(256M) 1.234ms";
        assert_eq!(classify(line, Some(LogHeader)), UnifiedG1YoungPause);
        assert_eq!(classify(line, Some(Unknown)), UnifiedG1YoungPause);
    }
}
