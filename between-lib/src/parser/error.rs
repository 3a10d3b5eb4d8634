use cssparser::SourceLocation;
use std::fmt;
use thiserror::Error;

/// A 1-based line/column location in the source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Position {
    /// Computes the position of the byte `offset` within `source`.
    pub fn from_offset(source: &str, offset: usize) -> Self {
        let offset = offset.min(source.len());
        let prefix = &source.as_bytes()[..offset];
        let line = prefix.iter().filter(|&&b| b == b'\n').count() + 1;
        let line_start = prefix
            .iter()
            .rposition(|&b| b == b'\n')
            .map_or(0, |idx| idx + 1);
        let column = String::from_utf8_lossy(&prefix[line_start..]).chars().count() + 1;
        Position { line, column }
    }
}

impl From<SourceLocation> for Position {
    /// `cssparser` lines are 0-based, columns 1-based.
    fn from(location: SourceLocation) -> Self {
        Position {
            line: location.line as usize + 1,
            column: location.column as usize,
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("unterminated comment starting at {0}")]
    UnterminatedComment(Position),
    #[error("unterminated string starting at {0}")]
    UnterminatedString(Position),
    #[error("block opened at {0} is never closed")]
    UnclosedBlock(Position),
    #[error("unexpected `}}` at {0}")]
    UnexpectedCloseBrace(Position),
    #[error("expected `{{` after selector at {0}")]
    MissingBlock(Position),
    #[error("conditional groups nested too deeply at {0}")]
    NestingTooDeep(Position),
    #[error("unexpected token at {0}")]
    UnexpectedToken(Position),
}

impl ParseError {
    pub fn position(&self) -> Position {
        match self {
            ParseError::UnterminatedComment(pos)
            | ParseError::UnterminatedString(pos)
            | ParseError::UnclosedBlock(pos)
            | ParseError::UnexpectedCloseBrace(pos)
            | ParseError::MissingBlock(pos)
            | ParseError::NestingTooDeep(pos)
            | ParseError::UnexpectedToken(pos) => *pos,
        }
    }
}
