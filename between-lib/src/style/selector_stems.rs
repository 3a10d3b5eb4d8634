//! Selector stems and the relatedness heuristic.
//!
//! This is deliberately not a selector parser. Selectors are reduced to
//! "stems" by naming convention: a class or id is cut at the first BEM
//! element/modifier marker, pseudo-class or attribute selector, and a plain
//! element selector contributes its leading element names. Two rules are
//! related when the stems of one show up in the selectors of the other.

use std::collections::BTreeSet;

/// Set of selector stems, e.g. `{".block", "#main", "li"}`.
pub type StemSet = BTreeSet<String>;

/// Markers that end a class/id stem: BEM element, BEM modifier, pseudo
/// class or element, attribute selector.
const STEM_TERMINATORS: &[&str] = &["__", "--", ":", "["];

/// Replace combinators with spaces and collapse whitespace.
///
/// `li+li` becomes `li li`. A `~` directly followed by `=` belongs to an
/// attribute operator (`[class~=x]`) and is kept.
pub fn remove_combinators(selector: &str) -> String {
    let mut spaced = String::with_capacity(selector.len());
    let mut chars = selector.chars().peekable();
    while let Some(ch) = chars.next() {
        match ch {
            '+' | '>' => spaced.push(' '),
            '~' if chars.peek() != Some(&'=') => spaced.push(' '),
            _ => spaced.push(ch),
        }
    }
    spaced.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn is_named(token: &str) -> bool {
    token.starts_with('.') || token.starts_with('#')
}

/// Cut a class/id token at the first stem terminator.
fn named_stem(token: &str) -> &str {
    let end = STEM_TERMINATORS
        .iter()
        .filter_map(|marker| token.find(marker))
        .min()
        .unwrap_or(token.len());
    &token[..end]
}

/// Length of the element name at the start of `token`, or 0 if the token
/// does not start with one.
fn element_name_len(token: &str) -> usize {
    let mut chars = token.char_indices();
    match chars.next() {
        Some((_, c)) if c.is_ascii_alphabetic() => {}
        _ => return 0,
    }
    chars
        .find(|&(_, c)| !(c.is_ascii_alphanumeric() || c == '-' || c == '_'))
        .map_or(token.len(), |(idx, _)| idx)
}

/// The leading run of element names in a combinator-free selector.
///
/// `ul li.active a` gives `["ul", "li"]`: the run stops at the first token
/// that is not purely an element name, keeping that token's element prefix.
/// `.nav li` gives nothing, since the selector is scoped to a class.
pub fn leading_elements(selector: &str) -> Vec<&str> {
    let mut elements = Vec::new();
    for token in selector.split(' ').filter(|t| !t.is_empty()) {
        let len = element_name_len(token);
        if len == 0 {
            break;
        }
        elements.push(&token[..len]);
        if len < token.len() {
            break;
        }
    }
    elements
}

/// Reduce a list of selectors to their stems.
///
/// # Arguments
///
/// * `selectors` - Selector strings, e.g. the selector list of one rule.
///
/// # Returns
///
/// The union of the class/id stems and leading element names of every
/// selector.
pub fn selector_stems<S: AsRef<str>>(selectors: &[S]) -> StemSet {
    let mut stems = StemSet::new();
    for selector in selectors {
        let selector = remove_combinators(selector.as_ref());

        // class/id/BEM stems
        for token in selector.split(' ').filter(|t| is_named(t)) {
            stems.insert(named_stem(token).to_string());
        }

        // plain elements, if not already scoped to a class/id block
        for element in leading_elements(&selector) {
            stems.insert(element.to_string());
        }
    }
    stems
}

/// True if the first occurrence of `part` in `text` is not followed by an
/// ASCII letter, so `.foo` is found in `.foo__bar` and `.foo:hover` but not
/// in `.foobar`. Later occurrences are not looked at.
fn contains_bounded(text: &str, part: &str) -> bool {
    if part.is_empty() {
        return false;
    }
    text.find(part).is_some_and(|idx| {
        !text[idx + part.len()..]
            .chars()
            .next()
            .is_some_and(|c| c.is_ascii_alphabetic())
    })
}

fn starts_with_bounded(token: &str, stem: &str) -> bool {
    token.starts_with(stem)
        && !token[stem.len()..]
            .chars()
            .next()
            .is_some_and(|c| c.is_ascii_alphabetic())
}

/// Decide whether `selectors` belong to the block described by `stems`.
///
/// Class and id stems match anywhere in a selector (with a letter boundary
/// after them). Element stems only match the selector's leading element
/// names, so `.menu p` is not pulled into a group of plain `p` rules.
/// Returns false if either side is empty.
pub fn is_related<S: AsRef<str>>(stems: &StemSet, selectors: &[S]) -> bool {
    if stems.is_empty() || selectors.is_empty() {
        return false;
    }

    let (named, elements): (Vec<&str>, Vec<&str>) = stems
        .iter()
        .map(String::as_str)
        .partition(|stem| is_named(stem));

    for selector in selectors {
        let selector = remove_combinators(selector.as_ref());

        if named.iter().any(|stem| contains_bounded(&selector, stem)) {
            return true;
        }

        if !elements.is_empty() {
            let leading = leading_elements(&selector);
            if elements
                .iter()
                .any(|stem| leading.iter().any(|token| starts_with_bounded(token, stem)))
            {
                return true;
            }
        }
    }
    false
}
