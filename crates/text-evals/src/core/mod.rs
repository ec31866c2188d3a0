pub mod adapter;
pub mod context;
pub mod errors;
pub mod metric;
pub mod score;

pub use adapter::*;
pub use context::*;
pub use errors::*;
pub use metric::*;
pub use score::PairwiseScoreFn;
