//! Token and keyword definitions for the BigQuery SELECT subset.

use crate::lexer::Span;

/// SQL keywords recognized by the lexer.
///
/// Keywords are matched case-insensitively. A subset of them, the
/// [function keywords](Keyword::is_function_keyword), may still be used as
/// identifiers in positions where no clause keyword is expected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Keyword {
    // Core clauses
    Select,
    From,
    Where,
    Group,
    By,
    Having,
    Qualify,
    Order,
    Limit,
    Offset,
    Distinct,
    All,
    As,
    With,
    Window,
    // Joins
    Join,
    Inner,
    Left,
    Right,
    Full,
    Outer,
    Cross,
    Natural,
    On,
    Using,
    // Set operations
    Union,
    Intersect,
    Except,
    // Predicates
    And,
    Or,
    Not,
    In,
    Between,
    Like,
    Glob,
    Match,
    Regexp,
    Is,
    Isnull,
    Notnull,
    Null,
    Exists,
    Escape,
    // CASE expressions
    Case,
    When,
    Then,
    Else,
    End,
    // Casts and extraction
    Cast,
    SafeCast,
    Extract,
    Treat,
    Lookup,
    // Ordering and collation
    Asc,
    Desc,
    Collate,
    Nulls,
    Ignore,
    Respect,
    // Window specifications
    Over,
    Partition,
    Rows,
    Range,
    Unbounded,
    Preceding,
    Following,
    Current,
    Row,
    // Table modifiers
    Unnest,
    Indexed,
    For,
    SystemTime,
    Of,
    ExternalQuery,
    // Date and time
    Date,
    Time,
    Datetime,
    Timestamp,
    CurrentDate,
    CurrentTime,
    CurrentTimestamp,
    Interval,
    DateAdd,
    DateSub,
    Adddate,
    Subdate,
    TimestampAdd,
    TimestampSub,
    // Arrays and structs
    Array,
    Struct,
    Ordinal,
    GenerateArray,
    GenerateDateArray,
    GenerateTimestampArray,
    // Aggregate functions
    AnyValue,
    ArrayAgg,
    ArrayConcatAgg,
    Avg,
    BitAnd,
    BitOr,
    BitXor,
    Count,
    Countif,
    LogicalAnd,
    LogicalOr,
    Max,
    Min,
    Sum,
    StringAgg,
    // Statistical aggregates
    Corr,
    CovarPop,
    CovarSamp,
    Stddev,
    StddevPop,
    StddevSamp,
    Variance,
    VarPop,
    VarSamp,
    // Analytic functions
    CumeDist,
    DenseRank,
    FirstValue,
    Lag,
    LastValue,
    Lead,
    NthValue,
    Ntile,
    PercentileCont,
    PercentileDisc,
    PercentRank,
    Rank,
    RowNumber,
    // String functions
    RegexpExtract,
    Split,
    // Type names
    Int64,
    Float64,
    Numeric,
    Bool,
    Bytes,
    Geography,
}

impl Keyword {
    /// Looks up a keyword from an identifier-shaped word, ignoring case.
    #[must_use]
    pub fn from_str(word: &str) -> Option<Self> {
        let keyword = match word.to_ascii_uppercase().as_str() {
            "SELECT" => Self::Select,
            "FROM" => Self::From,
            "WHERE" => Self::Where,
            "GROUP" => Self::Group,
            "BY" => Self::By,
            "HAVING" => Self::Having,
            "QUALIFY" => Self::Qualify,
            "ORDER" => Self::Order,
            "LIMIT" => Self::Limit,
            "OFFSET" => Self::Offset,
            "DISTINCT" => Self::Distinct,
            "ALL" => Self::All,
            "AS" => Self::As,
            "WITH" => Self::With,
            "WINDOW" => Self::Window,
            "JOIN" => Self::Join,
            "INNER" => Self::Inner,
            "LEFT" => Self::Left,
            "RIGHT" => Self::Right,
            "FULL" => Self::Full,
            "OUTER" => Self::Outer,
            "CROSS" => Self::Cross,
            "NATURAL" => Self::Natural,
            "ON" => Self::On,
            "USING" => Self::Using,
            "UNION" => Self::Union,
            "INTERSECT" => Self::Intersect,
            "EXCEPT" => Self::Except,
            "AND" => Self::And,
            "OR" => Self::Or,
            "NOT" => Self::Not,
            "IN" => Self::In,
            "BETWEEN" => Self::Between,
            "LIKE" => Self::Like,
            "GLOB" => Self::Glob,
            "MATCH" => Self::Match,
            "REGEXP" => Self::Regexp,
            "IS" => Self::Is,
            "ISNULL" => Self::Isnull,
            "NOTNULL" => Self::Notnull,
            "NULL" => Self::Null,
            "EXISTS" => Self::Exists,
            "ESCAPE" => Self::Escape,
            "CASE" => Self::Case,
            "WHEN" => Self::When,
            "THEN" => Self::Then,
            "ELSE" => Self::Else,
            "END" => Self::End,
            "CAST" => Self::Cast,
            "SAFE_CAST" => Self::SafeCast,
            "EXTRACT" => Self::Extract,
            "TREAT" => Self::Treat,
            "LOOKUP" => Self::Lookup,
            "ASC" => Self::Asc,
            "DESC" => Self::Desc,
            "COLLATE" => Self::Collate,
            "NULLS" => Self::Nulls,
            "IGNORE" => Self::Ignore,
            "RESPECT" => Self::Respect,
            "OVER" => Self::Over,
            "PARTITION" => Self::Partition,
            "ROWS" => Self::Rows,
            "RANGE" => Self::Range,
            "UNBOUNDED" => Self::Unbounded,
            "PRECEDING" => Self::Preceding,
            "FOLLOWING" => Self::Following,
            "CURRENT" => Self::Current,
            "ROW" => Self::Row,
            "UNNEST" => Self::Unnest,
            "INDEXED" => Self::Indexed,
            "FOR" => Self::For,
            "SYSTEM_TIME" => Self::SystemTime,
            "OF" => Self::Of,
            "EXTERNAL_QUERY" => Self::ExternalQuery,
            "DATE" => Self::Date,
            "TIME" => Self::Time,
            "DATETIME" => Self::Datetime,
            "TIMESTAMP" => Self::Timestamp,
            "CURRENT_DATE" => Self::CurrentDate,
            "CURRENT_TIME" => Self::CurrentTime,
            "CURRENT_TIMESTAMP" => Self::CurrentTimestamp,
            "INTERVAL" => Self::Interval,
            "DATE_ADD" => Self::DateAdd,
            "DATE_SUB" => Self::DateSub,
            "ADDDATE" => Self::Adddate,
            "SUBDATE" => Self::Subdate,
            "TIMESTAMP_ADD" => Self::TimestampAdd,
            "TIMESTAMP_SUB" => Self::TimestampSub,
            "ARRAY" => Self::Array,
            "STRUCT" => Self::Struct,
            "ORDINAL" => Self::Ordinal,
            "GENERATE_ARRAY" => Self::GenerateArray,
            "GENERATE_DATE_ARRAY" => Self::GenerateDateArray,
            "GENERATE_TIMESTAMP_ARRAY" => Self::GenerateTimestampArray,
            "ANY_VALUE" => Self::AnyValue,
            "ARRAY_AGG" => Self::ArrayAgg,
            "ARRAY_CONCAT_AGG" => Self::ArrayConcatAgg,
            "AVG" => Self::Avg,
            "BIT_AND" => Self::BitAnd,
            "BIT_OR" => Self::BitOr,
            "BIT_XOR" => Self::BitXor,
            "COUNT" => Self::Count,
            "COUNTIF" => Self::Countif,
            "LOGICAL_AND" => Self::LogicalAnd,
            "LOGICAL_OR" => Self::LogicalOr,
            "MAX" => Self::Max,
            "MIN" => Self::Min,
            "SUM" => Self::Sum,
            "STRING_AGG" => Self::StringAgg,
            "CORR" => Self::Corr,
            "COVAR_POP" => Self::CovarPop,
            "COVAR_SAMP" => Self::CovarSamp,
            "STDDEV" => Self::Stddev,
            "STDDEV_POP" => Self::StddevPop,
            "STDDEV_SAMP" => Self::StddevSamp,
            "VARIANCE" => Self::Variance,
            "VAR_POP" => Self::VarPop,
            "VAR_SAMP" => Self::VarSamp,
            "CUME_DIST" => Self::CumeDist,
            "DENSE_RANK" => Self::DenseRank,
            "FIRST_VALUE" => Self::FirstValue,
            "LAG" => Self::Lag,
            "LAST_VALUE" => Self::LastValue,
            "LEAD" => Self::Lead,
            "NTH_VALUE" => Self::NthValue,
            "NTILE" => Self::Ntile,
            "PERCENTILE_CONT" => Self::PercentileCont,
            "PERCENTILE_DISC" => Self::PercentileDisc,
            "PERCENT_RANK" => Self::PercentRank,
            "RANK" => Self::Rank,
            "ROW_NUMBER" => Self::RowNumber,
            "REGEXP_EXTRACT" => Self::RegexpExtract,
            "SPLIT" => Self::Split,
            "INT64" => Self::Int64,
            "FLOAT64" => Self::Float64,
            "NUMERIC" => Self::Numeric,
            "BOOL" => Self::Bool,
            "BYTES" => Self::Bytes,
            "GEOGRAPHY" => Self::Geography,
            _ => return None,
        };
        Some(keyword)
    }

    /// Canonical upper-case spelling of the keyword.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Select => "SELECT",
            Self::From => "FROM",
            Self::Where => "WHERE",
            Self::Group => "GROUP",
            Self::By => "BY",
            Self::Having => "HAVING",
            Self::Qualify => "QUALIFY",
            Self::Order => "ORDER",
            Self::Limit => "LIMIT",
            Self::Offset => "OFFSET",
            Self::Distinct => "DISTINCT",
            Self::All => "ALL",
            Self::As => "AS",
            Self::With => "WITH",
            Self::Window => "WINDOW",
            Self::Join => "JOIN",
            Self::Inner => "INNER",
            Self::Left => "LEFT",
            Self::Right => "RIGHT",
            Self::Full => "FULL",
            Self::Outer => "OUTER",
            Self::Cross => "CROSS",
            Self::Natural => "NATURAL",
            Self::On => "ON",
            Self::Using => "USING",
            Self::Union => "UNION",
            Self::Intersect => "INTERSECT",
            Self::Except => "EXCEPT",
            Self::And => "AND",
            Self::Or => "OR",
            Self::Not => "NOT",
            Self::In => "IN",
            Self::Between => "BETWEEN",
            Self::Like => "LIKE",
            Self::Glob => "GLOB",
            Self::Match => "MATCH",
            Self::Regexp => "REGEXP",
            Self::Is => "IS",
            Self::Isnull => "ISNULL",
            Self::Notnull => "NOTNULL",
            Self::Null => "NULL",
            Self::Exists => "EXISTS",
            Self::Escape => "ESCAPE",
            Self::Case => "CASE",
            Self::When => "WHEN",
            Self::Then => "THEN",
            Self::Else => "ELSE",
            Self::End => "END",
            Self::Cast => "CAST",
            Self::SafeCast => "SAFE_CAST",
            Self::Extract => "EXTRACT",
            Self::Treat => "TREAT",
            Self::Lookup => "LOOKUP",
            Self::Asc => "ASC",
            Self::Desc => "DESC",
            Self::Collate => "COLLATE",
            Self::Nulls => "NULLS",
            Self::Ignore => "IGNORE",
            Self::Respect => "RESPECT",
            Self::Over => "OVER",
            Self::Partition => "PARTITION",
            Self::Rows => "ROWS",
            Self::Range => "RANGE",
            Self::Unbounded => "UNBOUNDED",
            Self::Preceding => "PRECEDING",
            Self::Following => "FOLLOWING",
            Self::Current => "CURRENT",
            Self::Row => "ROW",
            Self::Unnest => "UNNEST",
            Self::Indexed => "INDEXED",
            Self::For => "FOR",
            Self::SystemTime => "SYSTEM_TIME",
            Self::Of => "OF",
            Self::ExternalQuery => "EXTERNAL_QUERY",
            Self::Date => "DATE",
            Self::Time => "TIME",
            Self::Datetime => "DATETIME",
            Self::Timestamp => "TIMESTAMP",
            Self::CurrentDate => "CURRENT_DATE",
            Self::CurrentTime => "CURRENT_TIME",
            Self::CurrentTimestamp => "CURRENT_TIMESTAMP",
            Self::Interval => "INTERVAL",
            Self::DateAdd => "DATE_ADD",
            Self::DateSub => "DATE_SUB",
            Self::Adddate => "ADDDATE",
            Self::Subdate => "SUBDATE",
            Self::TimestampAdd => "TIMESTAMP_ADD",
            Self::TimestampSub => "TIMESTAMP_SUB",
            Self::Array => "ARRAY",
            Self::Struct => "STRUCT",
            Self::Ordinal => "ORDINAL",
            Self::GenerateArray => "GENERATE_ARRAY",
            Self::GenerateDateArray => "GENERATE_DATE_ARRAY",
            Self::GenerateTimestampArray => "GENERATE_TIMESTAMP_ARRAY",
            Self::AnyValue => "ANY_VALUE",
            Self::ArrayAgg => "ARRAY_AGG",
            Self::ArrayConcatAgg => "ARRAY_CONCAT_AGG",
            Self::Avg => "AVG",
            Self::BitAnd => "BIT_AND",
            Self::BitOr => "BIT_OR",
            Self::BitXor => "BIT_XOR",
            Self::Count => "COUNT",
            Self::Countif => "COUNTIF",
            Self::LogicalAnd => "LOGICAL_AND",
            Self::LogicalOr => "LOGICAL_OR",
            Self::Max => "MAX",
            Self::Min => "MIN",
            Self::Sum => "SUM",
            Self::StringAgg => "STRING_AGG",
            Self::Corr => "CORR",
            Self::CovarPop => "COVAR_POP",
            Self::CovarSamp => "COVAR_SAMP",
            Self::Stddev => "STDDEV",
            Self::StddevPop => "STDDEV_POP",
            Self::StddevSamp => "STDDEV_SAMP",
            Self::Variance => "VARIANCE",
            Self::VarPop => "VAR_POP",
            Self::VarSamp => "VAR_SAMP",
            Self::CumeDist => "CUME_DIST",
            Self::DenseRank => "DENSE_RANK",
            Self::FirstValue => "FIRST_VALUE",
            Self::Lag => "LAG",
            Self::LastValue => "LAST_VALUE",
            Self::Lead => "LEAD",
            Self::NthValue => "NTH_VALUE",
            Self::Ntile => "NTILE",
            Self::PercentileCont => "PERCENTILE_CONT",
            Self::PercentileDisc => "PERCENTILE_DISC",
            Self::PercentRank => "PERCENT_RANK",
            Self::Rank => "RANK",
            Self::RowNumber => "ROW_NUMBER",
            Self::RegexpExtract => "REGEXP_EXTRACT",
            Self::Split => "SPLIT",
            Self::Int64 => "INT64",
            Self::Float64 => "FLOAT64",
            Self::Numeric => "NUMERIC",
            Self::Bool => "BOOL",
            Self::Bytes => "BYTES",
            Self::Geography => "GEOGRAPHY",
        }
    }

    /// Whether this keyword may double as an identifier.
    ///
    /// Function keywords are accepted as function names, column aliases, and
    /// column-path components, but never as table names, table aliases, or
    /// WITH names.
    #[must_use]
    pub const fn is_function_keyword(self) -> bool {
        matches!(
            self,
            Self::Treat
                | Self::Lookup
                | Self::Left
                | Self::Right
                | Self::Current
                | Self::Escape
                | Self::Date
                | Self::Time
                | Self::Datetime
                | Self::Timestamp
                | Self::CurrentDate
                | Self::CurrentTime
                | Self::CurrentTimestamp
                | Self::DateAdd
                | Self::DateSub
                | Self::Adddate
                | Self::Subdate
                | Self::TimestampAdd
                | Self::TimestampSub
                | Self::Array
                | Self::GenerateArray
                | Self::GenerateDateArray
                | Self::GenerateTimestampArray
                | Self::AnyValue
                | Self::ArrayAgg
                | Self::ArrayConcatAgg
                | Self::Avg
                | Self::BitAnd
                | Self::BitOr
                | Self::BitXor
                | Self::Count
                | Self::Countif
                | Self::LogicalAnd
                | Self::LogicalOr
                | Self::Max
                | Self::Min
                | Self::Sum
                | Self::StringAgg
                | Self::Corr
                | Self::CovarPop
                | Self::CovarSamp
                | Self::Stddev
                | Self::StddevPop
                | Self::StddevSamp
                | Self::Variance
                | Self::VarPop
                | Self::VarSamp
                | Self::CumeDist
                | Self::DenseRank
                | Self::FirstValue
                | Self::Lag
                | Self::LastValue
                | Self::Lead
                | Self::NthValue
                | Self::Ntile
                | Self::PercentileCont
                | Self::PercentileDisc
                | Self::PercentRank
                | Self::Rank
                | Self::RowNumber
                | Self::RegexpExtract
                | Self::Split
                | Self::SafeCast
                | Self::ExternalQuery
                | Self::Int64
                | Self::Float64
                | Self::Numeric
                | Self::Bool
                | Self::Bytes
                | Self::Geography
        )
    }
}

/// The kind of a lexed token.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    /// A recognized SQL keyword.
    Keyword(Keyword),
    /// A bare identifier word.
    Ident(String),
    /// A quoted token with its surrounding quotes stripped. Single quotes,
    /// double quotes, and backticks all produce this kind.
    Quoted(String),
    /// A numeric literal kept in its source spelling.
    Number(String),
    /// A hex blob literal (`X'53514C'`) without the `X'...'` wrapper.
    Blob(String),

    // Arithmetic
    Plus,
    Minus,
    Star,
    Slash,
    Percent,

    // Comparison
    Eq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,
    NotLt,
    NotGt,

    // Bitwise and string
    Concat,
    BitAnd,
    BitOr,
    BitNot,
    LeftShift,
    RightShift,

    // Delimiters
    LeftParen,
    RightParen,
    LeftBracket,
    RightBracket,
    Comma,
    Dot,
    Semicolon,

    // Bind parameter markers
    Question,
    Colon,
    At,
    Dollar,

    /// A lexing failure with its message.
    Error(String),
    /// End of input.
    Eof,
}

impl TokenKind {
    /// Human-readable rendering used in syntax error messages.
    #[must_use]
    pub fn describe(&self) -> String {
        let symbol = match self {
            Self::Keyword(keyword) => return format!("keyword {}", keyword.as_str()),
            Self::Ident(name) => return format!("identifier `{name}`"),
            Self::Quoted(_) => return "string literal".to_string(),
            Self::Number(text) => return format!("number {text}"),
            Self::Blob(_) => return "blob literal".to_string(),
            Self::Error(message) => return message.clone(),
            Self::Eof => return "end of input".to_string(),
            Self::Plus => "+",
            Self::Minus => "-",
            Self::Star => "*",
            Self::Slash => "/",
            Self::Percent => "%",
            Self::Eq => "=",
            Self::NotEq => "!=",
            Self::Lt => "<",
            Self::LtEq => "<=",
            Self::Gt => ">",
            Self::GtEq => ">=",
            Self::NotLt => "!<",
            Self::NotGt => "!>",
            Self::Concat => "||",
            Self::BitAnd => "&",
            Self::BitOr => "|",
            Self::BitNot => "~",
            Self::LeftShift => "<<",
            Self::RightShift => ">>",
            Self::LeftParen => "(",
            Self::RightParen => ")",
            Self::LeftBracket => "[",
            Self::RightBracket => "]",
            Self::Comma => ",",
            Self::Dot => ".",
            Self::Semicolon => ";",
            Self::Question => "?",
            Self::Colon => ":",
            Self::At => "@",
            Self::Dollar => "$",
        };
        format!("`{symbol}`")
    }
}

/// A token with its source span.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

impl Token {
    /// Creates a new token.
    #[must_use]
    pub const fn new(kind: TokenKind, span: Span) -> Self {
        Self { kind, span }
    }

    /// Whether this token marks the end of input.
    #[must_use]
    pub const fn is_eof(&self) -> bool {
        matches!(self.kind, TokenKind::Eof)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyword_from_str_case_insensitive() {
        assert_eq!(Keyword::from_str("select"), Some(Keyword::Select));
        assert_eq!(Keyword::from_str("SELECT"), Some(Keyword::Select));
        assert_eq!(Keyword::from_str("SeLeCt"), Some(Keyword::Select));
        assert_eq!(Keyword::from_str("system_time"), Some(Keyword::SystemTime));
        assert_eq!(Keyword::from_str("not_a_keyword"), None);
    }

    #[test]
    fn test_keyword_as_str_round_trip() {
        for keyword in [
            Keyword::Select,
            Keyword::SafeCast,
            Keyword::ExternalQuery,
            Keyword::GenerateTimestampArray,
            Keyword::PercentRank,
        ] {
            assert_eq!(Keyword::from_str(keyword.as_str()), Some(keyword));
        }
    }

    #[test]
    fn test_function_keyword_classification() {
        assert!(Keyword::Count.is_function_keyword());
        assert!(Keyword::Left.is_function_keyword());
        assert!(Keyword::Escape.is_function_keyword());
        assert!(Keyword::CurrentTime.is_function_keyword());
        assert!(!Keyword::Select.is_function_keyword());
        assert!(!Keyword::From.is_function_keyword());
        assert!(!Keyword::Union.is_function_keyword());
        assert!(!Keyword::Interval.is_function_keyword());
    }

    #[test]
    fn test_describe() {
        assert_eq!(TokenKind::Concat.describe(), "`||`");
        assert_eq!(TokenKind::Keyword(Keyword::From).describe(), "keyword FROM");
        assert_eq!(TokenKind::Ident("col".to_string()).describe(), "identifier `col`");
        assert_eq!(TokenKind::Eof.describe(), "end of input");
    }

    #[test]
    fn test_token_is_eof() {
        let token = Token::new(TokenKind::Eof, Span::new(4, 4));
        assert!(token.is_eof());
        let token = Token::new(TokenKind::Comma, Span::new(0, 1));
        assert!(!token.is_eof());
    }
}
