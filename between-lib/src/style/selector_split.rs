use crate::tree::css_tree::{split_top_level_commas, LineEnding};

/// Indentation of a node, taken from the last line of its leading
/// whitespace (the whole slot if it has no line break).
pub fn indentation_of(before: &str) -> &str {
    match before.rfind('\n') {
        Some(idx) => &before[idx + 1..],
        None => before,
    }
}

/// Put each selector of a selector list on its own line.
///
/// `a:hover, a:focus` with indentation `"  "` becomes `"a:hover,\n  a:focus"`.
/// Only commas separating selectors are touched; whitespace around them is
/// dropped. Returns `None` for a single selector.
pub fn break_selectors(selector: &str, indentation: &str, line_ending: LineEnding) -> Option<String> {
    let parts = split_top_level_commas(selector);
    if parts.len() < 2 {
        return None;
    }

    let separator = format!(",{}{}", line_ending.as_str(), indentation);
    let last = parts.len() - 1;
    let broken = parts
        .iter()
        .enumerate()
        .map(|(idx, part)| match idx {
            0 => part.trim_end(),
            _ if idx == last => part.trim_start(),
            _ => part.trim(),
        })
        .collect::<Vec<_>>()
        .join(&separator);
    Some(broken)
}
