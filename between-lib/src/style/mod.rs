pub mod heading;
pub mod selector_split;
pub mod selector_stems;

pub use heading::{is_heading, HeadingMatcher};
pub use selector_split::break_selectors;
pub use selector_stems::{is_related, selector_stems, StemSet};
