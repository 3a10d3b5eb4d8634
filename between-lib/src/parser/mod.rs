pub mod error;
pub mod stylesheet;

pub use error::{ParseError, Position};
pub use stylesheet::{parse_stylesheet, MAX_NESTING_DEPTH};
