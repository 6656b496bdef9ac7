use thiserror::Error;

/// The distinguishing reason a parse failed. Carries enough detail for a
/// caller to format a diagnostic without re-deriving it from the source.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseErrorKind {
    #[error("unexpected end of file")]
    UnexpectedEof,
    #[error("unexpected closing tag `{found}` with no matching open section")]
    UnexpectedCloseSection { found: String },
    #[error("closing tag `{closed}` does not match opening tag `{opened}`")]
    ClosingTagMismatch { opened: String, closed: String },
    #[error("malformed delimiter-change tag")]
    InvalidDelimiters,
    #[error("tag identifier is empty or contains internal whitespace")]
    InvalidIdentifier,
    #[error("I/O error: {0}")]
    Io(String),
}

/// A fatal parse failure, tagged with the 1-based line and column of the
/// tag opener that triggered it.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{kind} at line {line}, column {column}")]
pub struct ParseError {
    pub kind: ParseErrorKind,
    pub line: u32,
    pub column: u32,
}

impl ParseError {
    pub fn new(kind: ParseErrorKind, line: u32, column: u32) -> Self {
        Self { kind, line, column }
    }
}

impl From<std::io::Error> for ParseError {
    fn from(err: std::io::Error) -> Self {
        ParseError::new(ParseErrorKind::Io(err.to_string()), 0, 0)
    }
}

pub type ParseResult<T> = Result<T, ParseError>;
