//! Preprocessing module — per-family normalization of raw GC log output.
//!
//! Collector families write multi-line, version-drifted grammars; this
//! module stitches, splits, and strips them into canonical single logical
//! lines, the contract boundary with classification.
//!
//! # Architecture
//!
//! - `traits.rs`: the family preprocessor seam and the 3-line window
//! - `model.rs`: preprocessing context, family ids, unidentified bucket
//! - `families/`: one state machine per collector family
//! - `driver.rs`: priority-ordered dispatch, pass-through, EOF flushing
//!
//! # Guarantees
//!
//! - Output preserves input order except for entangled-line replay, which
//!   is deterministic (FIFO, immediately after the enclosing event closes)
//! - The unidentified bucket is capacity-bounded; overflow is dropped
//! - An unterminated multi-line event at EOF is still emitted

pub mod driver;
pub mod families;
pub mod model;
pub mod traits;

pub use driver::{Driver, PreprocessOutput};
pub use model::{FamilyId, PreprocessContext, UnidentifiedBucket};
pub use traits::{FamilyPreprocessor, Window};

/// Default capacity of the unidentified-line bucket.
pub const DEFAULT_UNIDENTIFIED_CAPACITY: usize = 1000;
