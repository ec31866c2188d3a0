pub mod instance;
pub mod result;

pub use instance::*;
pub use result::*;
