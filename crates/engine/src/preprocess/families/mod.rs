//! Individual collector-family preprocessors.
//!
//! Order matters at the driver: specific grammars (CMS, G1, Parallel,
//! Serial, Shenandoah) are consulted before the family-agnostic date-stamp
//! normalizer.

pub mod cms;
pub mod datestamp;
pub mod g1;
pub mod parallel;
pub mod serial;
pub mod shenandoah;

pub use cms::CmsPreprocessor;
pub use datestamp::DateStampPreprocessor;
pub use g1::G1Preprocessor;
pub use parallel::ParallelPreprocessor;
pub use serial::SerialPreprocessor;
pub use shenandoah::ShenandoahPreprocessor;

/// Regex fragment matching a legacy decorator prefix: datestamp and/or
/// relative timestamp, either possibly written twice by defective JDK
/// builds.
pub(crate) const DECORATOR: &str =
    r"(?:\d{4}-\d{2}-\d{2}T\d{2}:\d{2}:\d{2}\.\d{3}[+-]\d{4}: ){0,2}(?:\d+[.,]\d{3}: ){0,2}";

/// Drop a trailing `[Times: user=… sys=…, real=… secs]` suffix. The wall
/// clock breakdown carries nothing classification needs.
pub(crate) fn strip_times_suffix(line: &str) -> &str {
    match line.find(" [Times: ") {
        Some(at) => line[..at].trim_end(),
        None => line.trim_end(),
    }
}
