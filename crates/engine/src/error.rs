//! Engine error taxonomy.
//!
//! Recoverable conditions (unidentified lines, bucket overflow) never show
//! up here: they are tracked as data in the preprocessing driver. Errors in
//! this enum abort the current file.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    /// A later event's start timestamp precedes an earlier one by more than
    /// the configured tolerance. Fatal for the whole run: the downstream
    /// pause/throughput math would be meaningless on warped input.
    #[error("time warp: event starting at `{second}` precedes `{first}` beyond tolerance")]
    TimeWarp {
        /// Canonical line of the earlier-positioned event.
        first: String,
        /// Canonical line of the offending later event.
        second: String,
    },

    #[error("invalid JVM start date `{0}` (expected ISO-8601 with offset, e.g. 2023-04-01T12:34:56.789+0000)")]
    InvalidJvmStartDate(String),

    #[error("config error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
