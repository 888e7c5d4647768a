//! Analysis modules.
//!
//! Series building, the numeric aggregator, and per-dataset statistics.

pub mod aggregator;
pub mod series;
pub mod stats;

pub use aggregator::*;
pub use series::*;
pub use stats::*;
