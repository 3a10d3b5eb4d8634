use regex::Regex;

/// Recognizes section heading comments such as `/* ==== Layout ==== */`.
#[derive(Debug, Clone)]
pub struct HeadingMatcher {
    /// `None` when heading detection is disabled.
    pattern: Option<Regex>,
}

impl HeadingMatcher {
    /// Build a matcher for comments containing any of `identifiers`.
    ///
    /// Identifiers are matched literally (`***` is not a regex). An empty
    /// list, or one made only of empty strings, disables detection.
    pub fn new<S: AsRef<str>>(identifiers: &[S]) -> Result<Self, regex::Error> {
        let escaped: Vec<String> = identifiers
            .iter()
            .map(|id| id.as_ref())
            .filter(|id| !id.is_empty())
            .map(regex::escape)
            .collect();

        if escaped.is_empty() {
            return Ok(Self::disabled());
        }

        let pattern = Regex::new(&escaped.join("|"))?;
        Ok(HeadingMatcher {
            pattern: Some(pattern),
        })
    }

    pub fn disabled() -> Self {
        HeadingMatcher { pattern: None }
    }

    pub fn is_enabled(&self) -> bool {
        self.pattern.is_some()
    }

    pub fn is_heading(&self, text: &str) -> bool {
        self.pattern
            .as_ref()
            .is_some_and(|pattern| pattern.is_match(text))
    }
}

/// One-off check of `text` against `identifiers`.
///
/// Prefer building a `HeadingMatcher` once when checking many comments.
pub fn is_heading<S: AsRef<str>>(text: &str, identifiers: &[S]) -> bool {
    HeadingMatcher::new(identifiers).is_ok_and(|matcher| matcher.is_heading(text))
}
