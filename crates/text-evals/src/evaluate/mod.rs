//! Batch evaluation over registered metrics.
//!
//! Build an [`Evaluation`] directly from metric values, or declaratively from an
//! [`EvalConfig`] naming built-in metrics. Either way, a run validates the batch,
//! calls each metric once over the whole batch, and merges the score vectors
//! into one result record per item.

pub mod config;
pub mod evaluation;

pub use config::*;
pub use evaluation::*;
