//! Blank line normalization for stylesheets.
//!
//! Rules that belong to the same block (by BEM-style naming) are kept
//! together, unrelated rules are separated, and section heading comments and
//! `@media`-style groups get room around them. Only the whitespace between
//! nodes changes, plus selector lists when `breakMultipleSelectors` is on.
//!
//! ```
//! use between_lib::{Between, Options};
//!
//! let between = Between::new(Options::default()).unwrap();
//! let css = between.process_str(".block {}\n\n.block__el {}\nstrong {}").unwrap();
//! assert_eq!(css, ".block {}\n.block__el {}\n\nstrong {}");
//! ```

pub mod config;
pub mod parser;
pub mod processor;
pub mod spacing;
pub mod style;
pub mod tree;

pub use config::{ConfigError, Options};
pub use parser::{parse_stylesheet, ParseError, MAX_NESTING_DEPTH};
pub use processor::{process_css, Between, Error};
pub use tree::css_tree::Stylesheet;
