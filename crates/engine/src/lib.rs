// Domain-driven module structure for the GC log engine.

// Core infrastructure
pub mod error;
pub mod units;
pub mod decorator;

// Domain modules
pub mod conf;
pub mod preprocess;
pub mod classify;
pub mod order;
pub mod runtime;
