//! Query outcomes, provenance and statistics

mod outcome;
mod stats;

pub use outcome::{Provenance, QueryError, QueryErrorKind, QueryOutcome};
pub use stats::{CacheStats, QueryRecord};
