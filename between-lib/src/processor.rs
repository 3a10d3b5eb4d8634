use crate::config::{ConfigError, Options};
use crate::parser::{parse_stylesheet, ParseError};
use crate::spacing::SpacingContext;
use crate::style::heading::HeadingMatcher;
use crate::tree::css_tree::Stylesheet;
use rayon::prelude::*;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// A configured spacing pass, reusable across stylesheets.
///
/// Every call starts from a clean traversal state, so one `Between` can be
/// shared between threads and used on unrelated inputs.
#[derive(Debug, Clone)]
pub struct Between {
    options: Options,
    headings: HeadingMatcher,
}

impl Between {
    pub fn new(options: Options) -> Result<Self, ConfigError> {
        let headings = options.heading_matcher()?;
        Ok(Between { options, headings })
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Respace a parsed stylesheet in place.
    pub fn process(&self, sheet: &mut Stylesheet) {
        SpacingContext::new(&self.options, &self.headings, sheet.line_ending).run(sheet);
    }

    /// Parse, respace and serialize `css`.
    pub fn process_str(&self, css: &str) -> Result<String, ParseError> {
        let mut sheet = parse_stylesheet(css)?;
        self.process(&mut sheet);
        Ok(sheet.to_css())
    }

    /// Process independent stylesheets in parallel. Results are in input order.
    pub fn process_batch<S>(&self, sources: &[S]) -> Vec<Result<String, ParseError>>
    where
        S: AsRef<str> + Sync,
    {
        log::info!("processing {} stylesheets", sources.len());
        sources
            .par_iter()
            .map(|source| self.process_str(source.as_ref()))
            .collect()
    }
}

/// Respace `css` with `options`.
pub fn process_css(css: &str, options: &Options) -> Result<String, Error> {
    let between = Between::new(options.clone())?;
    Ok(between.process_str(css)?)
}
