//! Error types for statement parsing and table extraction.

use crate::lexer::Span;

/// The statement does not belong to the supported SQL subset.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("syntax error at line {line}, column {column}: expected {expected}, found {found}")]
pub struct SyntaxError {
    /// Byte offset of the offending token.
    pub position: usize,
    /// 1-based line of the offending token.
    pub line: usize,
    /// 1-based character column of the offending token.
    pub column: usize,
    /// What the parser was prepared to accept.
    pub expected: String,
    /// What the statement actually contained.
    pub found: String,
}

impl SyntaxError {
    #[must_use]
    pub(crate) fn new(
        source: &str,
        span: Span,
        expected: impl Into<String>,
        found: impl Into<String>,
    ) -> Self {
        let (line, column) = line_column(source, span.start);
        Self {
            position: span.start,
            line,
            column,
            expected: expected.into(),
            found: found.into(),
        }
    }
}

/// The statement is grammatical but uses a construct in an unsupported way.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LogicError {
    /// An `EXTERNAL_QUERY` call appeared inside the statement of another
    /// `EXTERNAL_QUERY` call.
    #[error("EXTERNAL_QUERY cannot be nested inside another EXTERNAL_QUERY")]
    NestedExternalQuery,
    /// A table reference inside an `EXTERNAL_QUERY` statement had more than
    /// one component.
    #[error("table reference `{path}` inside EXTERNAL_QUERY `{connection}` must be a single name")]
    ExternalQueryTablePath {
        /// The active external connection.
        connection: String,
        /// The offending dotted path.
        path: String,
    },
}

/// Any failure of [`extract_table_names`](crate::extract_table_names).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ExtractError {
    /// The statement could not be parsed.
    #[error(transparent)]
    Syntax(#[from] SyntaxError),
    /// The statement parsed but was semantically invalid.
    #[error(transparent)]
    Logic(#[from] LogicError),
}

/// Computes the 1-based line and character column of a byte offset.
fn line_column(source: &str, offset: usize) -> (usize, usize) {
    let clamped = offset.min(source.len());
    let prefix = &source[..clamped];
    let line = prefix.matches('\n').count() + 1;
    let column = prefix.rsplit('\n').next().map_or(0, |tail| tail.chars().count()) + 1;
    (line, column)
}
