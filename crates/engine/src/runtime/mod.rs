//! Runtime module — process lifecycle: boot, run, report.

pub mod boot;
pub mod run;

pub use run::{run, RunSummary};
