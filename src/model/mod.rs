pub mod filters;
pub mod types;

pub use filters::*;
pub use types::*;
