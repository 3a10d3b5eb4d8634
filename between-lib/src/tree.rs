use std::fmt;

pub mod css_tree {
    /// Line break style of a stylesheet, detected from its first line break.
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
    pub enum LineEnding {
        #[default]
        Lf,
        CrLf,
    }

    impl LineEnding {
        pub fn detect(source: &str) -> Self {
            match source.find('\n') {
                Some(idx) if idx > 0 && source.as_bytes()[idx - 1] == b'\r' => LineEnding::CrLf,
                _ => LineEnding::Lf,
            }
        }

        pub fn as_str(self) -> &'static str {
            match self {
                LineEnding::Lf => "\n",
                LineEnding::CrLf => "\r\n",
            }
        }
    }

    /// A parsed stylesheet. Serializing it with `Display` reproduces the
    /// source text exactly, apart from slots that were edited.
    #[derive(Debug, Clone, Default, PartialEq, Eq)]
    pub struct Stylesheet {
        pub nodes: Vec<Node>,
        /// Whitespace after the last node.
        pub after: String,
        pub line_ending: LineEnding,
    }

    /// One node of the tree together with its leading whitespace slot.
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct Node {
        pub before: String,
        pub kind: NodeKind,
    }

    #[derive(Debug, Clone, PartialEq, Eq)]
    pub enum NodeKind {
        Rule(Rule),
        Comment(Comment),
        AtRule(AtRule),
    }

    /// A style rule. The body is kept verbatim, declarations are never looked at.
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct Rule {
        /// e.g. ".block,\n.another-block"
        pub selector: String,
        /// Whitespace between the selector and `{`.
        pub between: String,
        /// Everything between `{` and the matching `}`.
        pub body: String,
    }

    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct Comment {
        /// Text between `/*` and `*/`.
        pub text: String,
    }

    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct AtRule {
        /// Name without the `@`, e.g. "media".
        pub name: String,
        /// Raw text between the name and the block or `;`, e.g. " print ".
        pub params: String,
        pub block: AtRuleBlock,
    }

    #[derive(Debug, Clone, PartialEq, Eq)]
    pub enum AtRuleBlock {
        /// `@import url(x.css);`. The final statement may omit its semicolon.
        Statement { semicolon: bool },
        /// A conditional group (`@media`, `@supports`, ...) holding child nodes.
        Nested(Block),
        /// Any other block (`@font-face`, `@keyframes`, ...), kept verbatim.
        Opaque(String),
    }

    #[derive(Debug, Clone, Default, PartialEq, Eq)]
    pub struct Block {
        pub nodes: Vec<Node>,
        /// Whitespace before the closing `}`.
        pub after: String,
    }

    /// At-rules whose block contains rules rather than declarations.
    pub const CONDITIONAL_GROUP_RULES: &[&str] = &[
        "media",
        "supports",
        "document",
        "-moz-document",
        "layer",
        "container",
        "scope",
        "starting-style",
    ];

    pub fn is_conditional_group(name: &str) -> bool {
        CONDITIONAL_GROUP_RULES
            .iter()
            .any(|group| group.eq_ignore_ascii_case(name))
    }

    impl Stylesheet {
        pub fn to_css(&self) -> String {
            self.to_string()
        }
    }

    impl Node {
        pub fn new(before: impl Into<String>, kind: NodeKind) -> Self {
            Node {
                before: before.into(),
                kind,
            }
        }

        pub fn as_rule(&self) -> Option<&Rule> {
            match &self.kind {
                NodeKind::Rule(rule) => Some(rule),
                _ => None,
            }
        }

        pub fn as_comment(&self) -> Option<&Comment> {
            match &self.kind {
                NodeKind::Comment(comment) => Some(comment),
                _ => None,
            }
        }

        pub fn as_at_rule(&self) -> Option<&AtRule> {
            match &self.kind {
                NodeKind::AtRule(at_rule) => Some(at_rule),
                _ => None,
            }
        }
    }

    impl Rule {
        /// The comma separated selector list, each entry trimmed.
        ///
        /// Commas inside `()`, `[]` or strings do not separate selectors, so
        /// `:is(a, b)` stays one entry.
        pub fn selectors(&self) -> Vec<String> {
            split_top_level_commas(&self.selector)
                .into_iter()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from)
                .collect()
        }
    }

    impl AtRule {
        pub fn is_statement(&self) -> bool {
            matches!(self.block, AtRuleBlock::Statement { .. })
        }

        /// Selectors of every direct child rule of a conditional group.
        pub fn child_selectors(&self) -> Vec<String> {
            let mut selectors: Vec<String> = Vec::new();
            if let AtRuleBlock::Nested(block) = &self.block {
                for rule in block.nodes.iter().filter_map(Node::as_rule) {
                    for selector in rule.selectors() {
                        if !selectors.contains(&selector) {
                            selectors.push(selector);
                        }
                    }
                }
            }
            selectors
        }
    }

    /// Splits `text` at commas that are not nested in brackets or strings.
    pub fn split_top_level_commas(text: &str) -> Vec<&str> {
        let mut parts = Vec::new();
        let mut depth = 0usize;
        let mut quote: Option<char> = None;
        let mut escaped = false;
        let mut start = 0;

        for (idx, ch) in text.char_indices() {
            if escaped {
                escaped = false;
                continue;
            }
            match ch {
                '\\' => escaped = true,
                '"' | '\'' => match quote {
                    Some(q) if q == ch => quote = None,
                    None => quote = Some(ch),
                    _ => {}
                },
                _ if quote.is_some() => {}
                '(' | '[' => depth += 1,
                ')' | ']' => depth = depth.saturating_sub(1),
                ',' if depth == 0 => {
                    parts.push(&text[start..idx]);
                    start = idx + 1;
                }
                _ => {}
            }
        }
        parts.push(&text[start..]);
        parts
    }
}

use css_tree::{AtRule, AtRuleBlock, Node, NodeKind, Stylesheet};

impl fmt::Display for Stylesheet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for node in &self.nodes {
            write!(f, "{}", node)?;
        }
        f.write_str(&self.after)
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.before)?;
        match &self.kind {
            NodeKind::Rule(rule) => write!(f, "{}{}{{{}}}", rule.selector, rule.between, rule.body),
            NodeKind::Comment(comment) => write!(f, "/*{}*/", comment.text),
            NodeKind::AtRule(at_rule) => write!(f, "{}", at_rule),
        }
    }
}

impl fmt::Display for AtRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "@{}{}", self.name, self.params)?;
        match &self.block {
            AtRuleBlock::Statement { semicolon: true } => f.write_str(";"),
            AtRuleBlock::Statement { semicolon: false } => Ok(()),
            AtRuleBlock::Nested(block) => {
                f.write_str("{")?;
                for node in &block.nodes {
                    write!(f, "{}", node)?;
                }
                write!(f, "{}}}", block.after)
            }
            AtRuleBlock::Opaque(body) => write!(f, "{{{}}}", body),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::css_tree::*;

    fn rule(selector: &str) -> Rule {
        Rule {
            selector: selector.to_string(),
            between: " ".to_string(),
            body: " ".to_string(),
        }
    }

    #[test]
    fn test_selectors_split_and_trim() {
        let r = rule(".block,\n.another-block");
        assert_eq!(r.selectors(), vec![".block", ".another-block"]);
    }

    #[test]
    fn test_selectors_ignore_nested_commas() {
        let r = rule(":is(a, b) span, a[title=\"x,y\"]");
        assert_eq!(r.selectors(), vec![":is(a, b) span", "a[title=\"x,y\"]"]);
    }

    #[test]
    fn test_line_ending_detection() {
        assert_eq!(LineEnding::detect("a {}\r\nb {}"), LineEnding::CrLf);
        assert_eq!(LineEnding::detect("a {}\nb {}"), LineEnding::Lf);
        assert_eq!(LineEnding::detect("a {}"), LineEnding::Lf);
    }

    #[test]
    fn test_child_selectors_are_deduplicated() {
        let group = AtRule {
            name: "media".to_string(),
            params: " print ".to_string(),
            block: AtRuleBlock::Nested(Block {
                nodes: vec![
                    Node::new("\n  ", NodeKind::Rule(rule(".a, .b"))),
                    Node::new("\n  ", NodeKind::Comment(Comment { text: " x ".to_string() })),
                    Node::new("\n  ", NodeKind::Rule(rule(".b"))),
                ],
                after: "\n".to_string(),
            }),
        };
        assert_eq!(group.child_selectors(), vec![".a", ".b"]);
    }

    #[test]
    fn test_display_round_trips_nested_group() {
        let sheet = Stylesheet {
            nodes: vec![Node::new(
                "",
                NodeKind::AtRule(AtRule {
                    name: "media".to_string(),
                    params: " print ".to_string(),
                    block: AtRuleBlock::Nested(Block {
                        nodes: vec![Node::new("\n  ", NodeKind::Rule(rule(".a")))],
                        after: "\n".to_string(),
                    }),
                }),
            )],
            after: "\n".to_string(),
            line_ending: LineEnding::Lf,
        };
        assert_eq!(sheet.to_css(), "@media print {\n  .a { }\n}\n");
    }

    #[test]
    fn test_is_conditional_group_ignores_case() {
        assert!(is_conditional_group("MEDIA"));
        assert!(is_conditional_group("supports"));
        assert!(!is_conditional_group("font-face"));
    }
}
