//! Lossless stylesheet parser.
//!
//! Splits CSS text into the nodes the spacing pass cares about (rules,
//! comments and at-rules) and records every byte of whitespace around them,
//! so serializing the tree gives back the exact input. Tokenizing is done by
//! `cssparser`; this module only assembles the tree, slicing the source
//! between token positions. Rule bodies are kept as text.

use crate::parser::error::{ParseError, Position};
use crate::tree::css_tree::{
    is_conditional_group, AtRule, AtRuleBlock, Block, Comment, LineEnding, Node, NodeKind, Rule,
    Stylesheet,
};
use cssparser::{ParseErrorKind, Parser, ParserInput, ParserState, SourcePosition, Token};

/// How many conditional groups may be nested inside each other.
pub const MAX_NESTING_DEPTH: usize = 64;

/// Parse CSS source into a `Stylesheet` tree.
///
/// # Arguments
///
/// * `source` - The stylesheet text.
///
/// # Returns
///
/// The tree, or the first structural error found (unclosed block,
/// unterminated comment or string, stray `}`, selector without a block,
/// groups nested deeper than [`MAX_NESTING_DEPTH`]).
pub fn parse_stylesheet(source: &str) -> Result<Stylesheet, ParseError> {
    let mut input = ParserInput::new(source);
    let mut parser = Parser::new(&mut input);
    let builder = TreeBuilder { source };
    let (nodes, after) = builder.parse_nodes(&mut parser, 0)?;
    log::trace!("parsed {} top level nodes", nodes.len());
    Ok(Stylesheet {
        nodes,
        after,
        line_ending: LineEnding::detect(source),
    })
}

/// The tokens the tree builder distinguishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Lexeme {
    Whitespace,
    Comment,
    AtKeyword,
    OpenBrace,
    Semicolon,
    CloseBrace,
    BadString,
    Other,
    /// End of input, or the `}` closing the block being parsed.
    End,
}

fn next_lexeme(input: &mut Parser<'_, '_>) -> Lexeme {
    match input.next_including_whitespace_and_comments() {
        Ok(Token::WhiteSpace(_)) => Lexeme::Whitespace,
        Ok(Token::Comment(_)) => Lexeme::Comment,
        Ok(Token::AtKeyword(_)) => Lexeme::AtKeyword,
        Ok(Token::CurlyBracketBlock) => Lexeme::OpenBrace,
        Ok(Token::Semicolon) => Lexeme::Semicolon,
        Ok(Token::CloseCurlyBracket) => Lexeme::CloseBrace,
        Ok(Token::BadString(_)) => Lexeme::BadString,
        Ok(_) => Lexeme::Other,
        Err(_) => Lexeme::End,
    }
}

/// Where a prelude (selector or at-rule params) stopped.
struct Prelude {
    terminator: Lexeme,
    /// Position of the terminator, i.e. the end of the prelude text.
    end: SourcePosition,
}

struct TreeBuilder<'a> {
    source: &'a str,
}

impl<'a> TreeBuilder<'a> {
    fn position(&self, pos: SourcePosition) -> Position {
        Position::from_offset(self.source, pos.byte_index())
    }

    fn slice(&self, start: SourcePosition, end: SourcePosition) -> &'a str {
        &self.source[start.byte_index()..end.byte_index()]
    }

    /// Parses sibling nodes until the input (or the enclosing block) ends.
    /// Returns the nodes and the trailing whitespace. `depth` is the number of
    /// enclosing conditional groups.
    fn parse_nodes(
        &self,
        input: &mut Parser<'_, '_>,
        depth: usize,
    ) -> Result<(Vec<Node>, String), ParseError> {
        let mut nodes = Vec::new();
        loop {
            let ws_start = input.position();
            let (lexeme, token_start) = loop {
                let state = input.state();
                let lexeme = next_lexeme(input);
                if lexeme != Lexeme::Whitespace {
                    break (lexeme, state);
                }
            };
            let before = self.slice(ws_start, token_start.position()).to_string();

            match lexeme {
                Lexeme::End => return Ok((nodes, before)),
                // inside a block the closing brace ends the input, so this is top level
                Lexeme::CloseBrace => {
                    return Err(ParseError::UnexpectedCloseBrace(
                        self.position(token_start.position()),
                    ));
                }
                Lexeme::Comment => {
                    let text = self.comment_text(input, token_start.position())?;
                    nodes.push(Node::new(before, NodeKind::Comment(Comment { text })));
                }
                Lexeme::AtKeyword => {
                    let at_rule = self.parse_at_rule(input, token_start.position(), depth)?;
                    nodes.push(Node::new(before, NodeKind::AtRule(at_rule)));
                }
                _ => {
                    let rule = self.parse_rule(input, &token_start)?;
                    nodes.push(Node::new(before, NodeKind::Rule(rule)));
                }
            }
        }
    }

    fn parse_rule(&self, input: &mut Parser<'_, '_>, start: &ParserState) -> Result<Rule, ParseError> {
        input.reset(start);
        let start = start.position();
        let prelude = self.scan_prelude(input)?;
        if prelude.terminator != Lexeme::OpenBrace {
            return Err(ParseError::MissingBlock(self.position(start)));
        }

        let text = self.slice(start, prelude.end);
        let selector = text.trim_end_matches(|c: char| c.is_ascii_whitespace());
        let between = &text[selector.len()..];
        let body = self.parse_opaque_block(input, prelude.end)?;

        Ok(Rule {
            selector: selector.to_string(),
            between: between.to_string(),
            body,
        })
    }

    fn parse_at_rule(
        &self,
        input: &mut Parser<'_, '_>,
        start: SourcePosition,
        depth: usize,
    ) -> Result<AtRule, ParseError> {
        let params_start = input.position();
        // skip '@'
        let name = input.slice_from(start)[1..].to_string();
        let prelude = self.scan_prelude(input)?;
        let params = self.slice(params_start, prelude.end).to_string();

        let block = match prelude.terminator {
            Lexeme::Semicolon => AtRuleBlock::Statement { semicolon: true },
            Lexeme::OpenBrace if is_conditional_group(&name) => {
                if depth >= MAX_NESTING_DEPTH {
                    return Err(ParseError::NestingTooDeep(self.position(start)));
                }
                AtRuleBlock::Nested(self.parse_group_block(input, prelude.end, depth + 1)?)
            }
            Lexeme::OpenBrace => AtRuleBlock::Opaque(self.parse_opaque_block(input, prelude.end)?),
            // `}` closing the parent, or EOF: the closing brace is left for the caller
            _ => AtRuleBlock::Statement { semicolon: false },
        };

        Ok(AtRule {
            name,
            params,
            block,
        })
    }

    /// Advances to the first top-level `{`, `;` or `}`. `{` and `;` are
    /// consumed, `}` is left in place. Brackets and functions are skipped by
    /// the tokenizer as a whole.
    fn scan_prelude(&self, input: &mut Parser<'_, '_>) -> Result<Prelude, ParseError> {
        loop {
            let state = input.state();
            let terminator = next_lexeme(input);
            match terminator {
                Lexeme::Comment => {
                    self.comment_text(input, state.position())?;
                }
                Lexeme::BadString => {
                    return Err(ParseError::UnterminatedString(self.position(state.position())));
                }
                Lexeme::OpenBrace | Lexeme::Semicolon | Lexeme::End => {
                    return Ok(Prelude {
                        terminator,
                        end: state.position(),
                    });
                }
                Lexeme::CloseBrace => {
                    input.reset(&state);
                    return Ok(Prelude {
                        terminator,
                        end: state.position(),
                    });
                }
                _ => {}
            }
        }
    }

    /// Reads the block just opened at `open` as text, up to the matching `}`.
    fn parse_opaque_block(&self, input: &mut Parser<'_, '_>, open: SourcePosition) -> Result<String, ParseError> {
        let body_start = input.position();
        let body_end = nested(input, |block| {
            loop {
                let state = block.state();
                match next_lexeme(block) {
                    Lexeme::End => return Ok(block.position()),
                    Lexeme::Comment => {
                        self.comment_text(block, state.position())?;
                    }
                    _ => {}
                }
            }
        })?;
        self.expect_closed(input, open, body_end)?;
        Ok(self.slice(body_start, body_end).to_string())
    }

    /// Parses the children of a conditional group opened at `open`.
    fn parse_group_block(
        &self,
        input: &mut Parser<'_, '_>,
        open: SourcePosition,
        depth: usize,
    ) -> Result<Block, ParseError> {
        let (nodes, after, end) = nested(input, |block| {
            let (nodes, after) = self.parse_nodes(block, depth)?;
            Ok((nodes, after, block.position()))
        })?;
        self.expect_closed(input, open, end)?;
        Ok(Block { nodes, after })
    }

    /// `cssparser` closes blocks left open at EOF; an unclosed block is one
    /// whose contents are not followed by `}`.
    fn expect_closed(
        &self,
        input: &Parser<'_, '_>,
        open: SourcePosition,
        contents_end: SourcePosition,
    ) -> Result<(), ParseError> {
        if input.slice_from(contents_end) == "}" {
            Ok(())
        } else {
            Err(ParseError::UnclosedBlock(self.position(open)))
        }
    }

    /// Inner text of the comment token starting at `start`, which the parser
    /// has just consumed.
    fn comment_text(&self, input: &Parser<'_, '_>, start: SourcePosition) -> Result<String, ParseError> {
        let raw = input.slice_from(start);
        if raw.len() < 4 || !raw.ends_with("*/") {
            return Err(ParseError::UnterminatedComment(self.position(start)));
        }
        Ok(raw[2..raw.len() - 2].to_string())
    }
}

/// Run `parse` over the contents of the block whose opening token was just
/// consumed, carrying our error type through `cssparser`.
fn nested<'i, T, F>(input: &mut Parser<'i, '_>, parse: F) -> Result<T, ParseError>
where
    F: for<'tt> FnOnce(&mut Parser<'i, 'tt>) -> Result<T, ParseError>,
{
    input
        .parse_nested_block(|block| {
            let parsed = parse(&mut *block);
            parsed.map_err(|inner| cssparser::ParseError {
                kind: ParseErrorKind::Custom(inner),
                location: block.current_source_location(),
            })
        })
        .map_err(|err| match err.kind {
            ParseErrorKind::Custom(inner) => inner,
            ParseErrorKind::Basic(_) => ParseError::UnexpectedToken(Position::from(err.location)),
        })
}
