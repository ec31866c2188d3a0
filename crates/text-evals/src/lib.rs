//! Declarative text evaluation.
//!
//! Register named metrics that compare a prediction with its reference
//! ([`PairwiseMetric`]) or score a prediction alone ([`PointwiseMetric`]), then run
//! them together over a batch with an [`Evaluation`]:
//!
//! ```
//! use text_evals::{EvalContext, Evaluation, Instance, metrics, score};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), text_evals::EvalError> {
//! let evaluation = Evaluation::pairwise(
//!     "answers",
//!     "word overlap and quote growth",
//!     vec![
//!         metrics::word_overlap(),
//!         metrics::quotes_count().to_pairwise(score::difference),
//!     ],
//! );
//!
//! let results = evaluation
//!     .run_pairwise(&EvalContext::new(), &[Instance::new("a cat sat", "a dog sat")])
//!     .await?;
//! assert_eq!(results[0].metric_results["word_overlap"], 0.5);
//! assert_eq!(results[0].metric_results["quotes_count"], 0.0);
//! # Ok(())
//! # }
//! ```

pub mod core;
pub mod data;
pub mod evaluate;
pub mod metrics;
pub mod utils;

pub use crate::core::score;
pub use crate::core::*;
pub use data::*;
pub use evaluate::*;
pub use utils::*;
