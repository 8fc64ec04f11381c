//! Decorator module — the timestamp/datestamp prefix on raw log lines.
//!
//! Two grammars exist. Legacy logging writes `DATESTAMP: TIMESTAMP: ` in
//! front of the payload (either half optional, and certain JDK builds emit
//! either half twice). Unified logging wraps its decorations in leading
//! brackets: `[0.100s][info][gc] …`.

pub mod parse;

pub use parse::{strip, strip_unified, Decorator, UnifiedDecorator};
