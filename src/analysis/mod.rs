//! Analyzers deriving report metrics from normalized provider data
//!
//! All analyzers are pure computations over in-memory records; no I/O
//! happens in this module.

pub mod regional;
pub mod related;
pub mod series;
pub mod summary;

pub use regional::RegionalRanker;
pub use related::RelatedRanker;
pub use series::{SeriesMetrics, TimeSeriesAnalyzer};
pub use summary::synthesize;
