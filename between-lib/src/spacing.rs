//! The spacing pass.
//!
//! Walks the tree depth first and rewrites the leading whitespace of every
//! node according to what precedes it:
//!
//! - rule after rule: related rules are kept together, an unrelated rule
//!   starts a new block
//! - heading comments get extra space before and after
//! - conditional groups (`@media`, ...) are spaced by whether their rules
//!   belong to the block around them
//!
//! "The block" is the stem set of the rule that started it (see
//! [`crate::style::selector_stems`]). It is the only state the pass keeps
//! and lives in a `SpacingContext` created for one walk.

use crate::config::Options;
use crate::style::heading::HeadingMatcher;
use crate::style::selector_split::{break_selectors, indentation_of};
use crate::style::selector_stems::{is_related, selector_stems, StemSet};
use crate::tree::css_tree::{AtRule, AtRuleBlock, LineEnding, Node, NodeKind, Rule, Stylesheet};
use log::{debug, trace};

/// What the previous sibling of a node is, as far as spacing cares.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Preceding {
    Rule,
    HeadingComment,
    Comment,
    /// Any at-rule, with or without a block.
    AtRule,
}

/// Replace the blank lines in a leading whitespace slot.
///
/// Line breaks are dropped and `count + 1` fresh ones are written in front
/// of what remains (the indentation), giving exactly `count` blank lines
/// between this node and the previous one.
pub fn with_blank_lines(before: &str, count: usize, line_ending: LineEnding) -> String {
    let indentation: String = before.chars().filter(|&c| c != '\n' && c != '\r').collect();
    let mut spaced = line_ending.as_str().repeat(count + 1);
    spaced.push_str(&indentation);
    spaced
}

/// Traversal state for one spacing pass.
pub struct SpacingContext<'a> {
    options: &'a Options,
    headings: &'a HeadingMatcher,
    line_ending: LineEnding,
    /// Stems of the rule(s) that started the current block.
    block_stems: StemSet,
}

impl<'a> SpacingContext<'a> {
    pub fn new(options: &'a Options, headings: &'a HeadingMatcher, line_ending: LineEnding) -> Self {
        SpacingContext {
            options,
            headings,
            line_ending,
            block_stems: StemSet::new(),
        }
    }

    /// Space a whole stylesheet.
    pub fn run(mut self, sheet: &mut Stylesheet) {
        self.walk(&mut sheet.nodes);
    }

    /// Space `nodes` and, recursively, the children of conditional groups.
    ///
    /// Recursion follows the tree; trees from the parser are at most
    /// [`crate::parser::MAX_NESTING_DEPTH`] groups deep.
    pub fn walk(&mut self, nodes: &mut [Node]) {
        for idx in 0..nodes.len() {
            let (preceding, rest) = nodes.split_at_mut(idx);
            let preceding = preceding.last().map(|prev| self.classify(prev));
            let node = &mut rest[0];

            self.visit(preceding, node);

            if let NodeKind::AtRule(AtRule {
                block: AtRuleBlock::Nested(block),
                ..
            }) = &mut node.kind
            {
                self.walk(&mut block.nodes);
            }
        }
    }

    fn classify(&self, node: &Node) -> Preceding {
        match &node.kind {
            NodeKind::Rule(_) => Preceding::Rule,
            NodeKind::Comment(comment) if self.headings.is_heading(&comment.text) => {
                Preceding::HeadingComment
            }
            NodeKind::Comment(_) => Preceding::Comment,
            NodeKind::AtRule(_) => Preceding::AtRule,
        }
    }

    fn visit(&mut self, preceding: Option<Preceding>, node: &mut Node) {
        let Node { before, kind } = node;
        let count = match kind {
            NodeKind::Rule(rule) => {
                if self.options.break_multiple_selectors {
                    self.break_rule_selectors(rule, before);
                }
                self.rule_spacing(preceding, rule)
            }
            NodeKind::Comment(comment) => {
                let heading = self.headings.is_heading(&comment.text);
                match preceding {
                    None => None,
                    Some(_) if heading => Some(self.options.space_heading_before),
                    Some(Preceding::HeadingComment) => Some(self.options.space_heading_after),
                    Some(_) => None,
                }
            }
            NodeKind::AtRule(at_rule) => self.at_rule_spacing(preceding, at_rule),
        };

        if let Some(count) = count {
            *before = with_blank_lines(before, count, self.line_ending);
        }
    }

    fn rule_spacing(&mut self, preceding: Option<Preceding>, rule: &Rule) -> Option<usize> {
        let selectors = rule.selectors();
        let options = self.options;

        match preceding {
            // first in its block: nothing to space against
            None => {
                self.reseed(&selectors);
                None
            }
            Some(Preceding::Rule) => Some(self.related_or_reseed(
                &selectors,
                options.space_related_rule,
                options.space_unrelated_rule,
            )),
            Some(Preceding::HeadingComment) => {
                self.reseed(&selectors);
                Some(options.space_heading_after)
            }
            Some(Preceding::AtRule) => Some(self.related_or_reseed(
                &selectors,
                options.space_related_at_rule,
                options.space_unrelated_at_rule,
            )),
            Some(Preceding::Comment) => {
                self.reseed(&selectors);
                None
            }
        }
    }

    /// Pick `related` if the selectors continue the current block, otherwise
    /// start a new block from them and pick `unrelated`.
    fn related_or_reseed(&mut self, selectors: &[String], related: usize, unrelated: usize) -> usize {
        if is_related(&self.block_stems, selectors) {
            debug!("{:?} continues block {:?}", selectors, self.block_stems);
            related
        } else {
            self.reseed(selectors);
            unrelated
        }
    }

    fn at_rule_spacing(&self, preceding: Option<Preceding>, at_rule: &AtRule) -> Option<usize> {
        let options = self.options;
        match preceding {
            None => None,
            Some(Preceding::HeadingComment) if at_rule.is_statement() => {
                Some(options.space_heading_after)
            }
            // one gap, the larger of the two
            Some(Preceding::HeadingComment) => {
                Some(options.space_heading_after.max(self.group_spacing(at_rule)))
            }
            Some(_) if at_rule.is_statement() => None,
            Some(_) => Some(self.group_spacing(at_rule)),
        }
    }

    /// Related or unrelated group count. The group is judged against the
    /// outer block; its own rules never start a new one here.
    fn group_spacing(&self, at_rule: &AtRule) -> usize {
        let inner = at_rule.child_selectors();
        if is_related(&self.block_stems, &inner) {
            debug!("@{} is related to block {:?}", at_rule.name, self.block_stems);
            self.options.space_related_at_rule
        } else {
            debug!("@{} isolated", at_rule.name);
            self.options.space_unrelated_at_rule
        }
    }

    fn reseed(&mut self, selectors: &[String]) {
        self.block_stems = selector_stems(selectors);
        trace!("new block stems {:?}", self.block_stems);
    }

    fn break_rule_selectors(&self, rule: &mut Rule, before: &str) {
        let indentation = indentation_of(before);
        if let Some(broken) = break_selectors(&rule.selector, indentation, self.line_ending) {
            rule.selector = broken;
        }
    }
}
