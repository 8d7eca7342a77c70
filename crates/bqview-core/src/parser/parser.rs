//! Recursive-descent parser for the supported SELECT grammar.
//!
//! The parser walks a fully tokenized statement with a movable position so
//! grammar alternatives can be retried from a saved point. It builds no
//! syntax tree: its only output is the set of table references and WITH
//! aliases it records into the [`TableCollector`] it borrows. Recording is
//! append-only into sets, so replaying a prefix of the input after
//! backtracking cannot produce duplicates.

use std::mem;

use crate::error::{ExtractError, SyntaxError};
use crate::extract::{TableCollector, TablePart};
use crate::lexer::{Keyword, Lexer, Token, TokenKind};

use super::pratt::{
    infix_binding_power, prefix_binding_power, BETWEEN_BP, COMPARISON_CLASS_BP, IN_LIST_BP,
    NULL_TEST_BP,
};

type Result<T> = std::result::Result<T, ExtractError>;

/// Keeps the error that made it furthest into the input.
fn deeper(first: SyntaxError, second: SyntaxError) -> SyntaxError {
    if second.position >= first.position {
        second
    } else {
        first
    }
}

/// Date parts accepted after an `INTERVAL` quantity.
fn is_date_part(word: &str) -> bool {
    const DATE_PARTS: &[&str] = &[
        "DAY",
        "DAY_HOUR",
        "DAY_MICROSECOND",
        "DAY_MINUTE",
        "DAY_SECOND",
        "HOUR",
        "HOUR_MICROSECOND",
        "HOUR_MINUTE",
        "HOUR_SECOND",
        "MICROSECOND",
        "MINUTE",
        "MINUTE_MICROSECOND",
        "MINUTE_SECOND",
        "MONTH",
        "QUARTER",
        "SECOND",
        "SECOND_MICROSECOND",
        "WEEK",
        "YEAR",
        "YEAR_MONTH",
    ];
    DATE_PARTS.iter().any(|part| word.eq_ignore_ascii_case(part))
}

/// A parser over one SQL statement.
pub(crate) struct Parser<'a, 'c> {
    source: &'a str,
    tokens: Vec<Token>,
    pos: usize,
    collector: &'c mut TableCollector,
}

impl<'a, 'c> Parser<'a, 'c> {
    /// Creates a parser for the given statement, recording what it finds
    /// into the collector.
    #[must_use]
    pub(crate) fn new(source: &'a str, collector: &'c mut TableCollector) -> Self {
        let tokens = Lexer::new(source).tokenize();
        Self {
            source,
            tokens,
            pos: 0,
            collector,
        }
    }

    /// Parses a complete statement, requiring that nothing but an optional
    /// semicolon follows it.
    ///
    /// # Errors
    ///
    /// Returns a syntax error for input outside the supported grammar and a
    /// logic error for invalid `EXTERNAL_QUERY` usage.
    pub(crate) fn parse_statement(&mut self) -> Result<()> {
        self.parse_query()?;
        if self.check(&TokenKind::Semicolon) {
            self.advance();
        }
        if !self.check(&TokenKind::Eof) {
            return Err(self.unexpected("end of input"));
        }
        Ok(())
    }

    // --- Token access ---

    fn current(&self) -> &Token {
        &self.tokens[self.pos]
    }

    /// Moves past the current token, staying on the end-of-input token.
    fn advance(&mut self) {
        if self.pos + 1 < self.tokens.len() {
            self.pos += 1;
        }
    }

    /// Returns the kind of the token `offset` positions ahead.
    fn peek_kind(&self, offset: usize) -> &TokenKind {
        let index = (self.pos + offset).min(self.tokens.len() - 1);
        &self.tokens[index].kind
    }

    /// Checks whether the current token matches the given kind, ignoring any
    /// carried values.
    fn check(&self, kind: &TokenKind) -> bool {
        mem::discriminant(&self.current().kind) == mem::discriminant(kind)
    }

    fn check_keyword(&self, keyword: Keyword) -> bool {
        matches!(self.current().kind, TokenKind::Keyword(k) if k == keyword)
    }

    fn eat(&mut self, kind: &TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn eat_keyword(&mut self, keyword: Keyword) -> bool {
        if self.check_keyword(keyword) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, kind: &TokenKind, expected: &str) -> Result<()> {
        if self.eat(kind) {
            Ok(())
        } else {
            Err(self.unexpected(expected))
        }
    }

    fn expect_keyword(&mut self, keyword: Keyword) -> Result<()> {
        if self.eat_keyword(keyword) {
            Ok(())
        } else {
            Err(self.unexpected(keyword.as_str()))
        }
    }

    fn unexpected(&self, expected: &str) -> ExtractError {
        let token = self.current();
        SyntaxError::new(self.source, token.span, expected, token.kind.describe()).into()
    }

    fn expect_identifier(&mut self) -> Result<String> {
        if let TokenKind::Ident(name) = &self.current().kind {
            let name = name.clone();
            self.advance();
            return Ok(name);
        }
        Err(self.unexpected("identifier"))
    }

    /// Accepts a bare identifier or a function keyword, for the positions
    /// where the keyword exemption applies.
    fn expect_identifier_like(&mut self) -> Result<String> {
        match &self.current().kind {
            TokenKind::Ident(name) => {
                let name = name.clone();
                self.advance();
                Ok(name)
            }
            TokenKind::Keyword(keyword) if keyword.is_function_keyword() => {
                let name = keyword.as_str().to_string();
                self.advance();
                Ok(name)
            }
            _ => Err(self.unexpected("identifier")),
        }
    }

    fn expect_string(&mut self) -> Result<String> {
        if let TokenKind::Quoted(value) = &self.current().kind {
            let value = value.clone();
            self.advance();
            return Ok(value);
        }
        Err(self.unexpected("string literal"))
    }

    fn ident_like_follows(&self, offset: usize) -> bool {
        match self.peek_kind(offset) {
            TokenKind::Ident(_) => true,
            TokenKind::Keyword(keyword) => keyword.is_function_keyword(),
            _ => false,
        }
    }

    /// Runs a grammar alternative from the current position. A syntax error
    /// rewinds the position and is handed back for the caller to try the
    /// next alternative; logic errors abort the parse outright.
    fn attempt<T>(
        &mut self,
        alternative: impl FnOnce(&mut Self) -> Result<T>,
    ) -> Result<std::result::Result<T, SyntaxError>> {
        let start = self.pos;
        match alternative(self) {
            Ok(value) => Ok(Ok(value)),
            Err(ExtractError::Syntax(error)) => {
                self.pos = start;
                Ok(Err(error))
            }
            Err(error) => Err(error),
        }
    }

    // --- Statements ---

    /// Parses a select statement with an optional leading WITH clause.
    fn parse_query(&mut self) -> Result<()> {
        if self.check_keyword(Keyword::With) {
            self.parse_with_statement()
        } else {
            self.parse_select_statement()
        }
    }

    /// `WITH name AS ( query ) [, ...] select_statement`
    ///
    /// Each name is recorded as an alias; a WITH body may itself start with
    /// WITH.
    fn parse_with_statement(&mut self) -> Result<()> {
        self.expect_keyword(Keyword::With)?;
        loop {
            let name = self.expect_identifier()?;
            self.collector.record_alias(name);
            self.expect_keyword(Keyword::As)?;
            self.expect(&TokenKind::LeftParen, "`(`")?;
            self.parse_query()?;
            self.expect(&TokenKind::RightParen, "`)`")?;
            if !self.check(&TokenKind::Comma) {
                break;
            }
            self.advance();
        }
        self.parse_select_statement()
    }

    /// A compound select, or one wrapped in parentheses. The wrapped reading
    /// is only tried when the direct one fails, so that parens around a
    /// leading core stay attached to the core.
    fn parse_select_statement(&mut self) -> Result<()> {
        let first = match self.attempt(Self::parse_compound_select)? {
            Ok(()) => return Ok(()),
            Err(error) => error,
        };
        if self.check(&TokenKind::LeftParen) {
            let second = match self.attempt(|p| {
                p.advance();
                p.parse_query()?;
                p.expect(&TokenKind::RightParen, "`)`")
            })? {
                Ok(()) => return Ok(()),
                Err(error) => error,
            };
            return Err(deeper(first, second).into());
        }
        Err(first.into())
    }

    /// `select_core (compound_operator select_core)* [ORDER BY ...] [LIMIT ...]`
    fn parse_compound_select(&mut self) -> Result<()> {
        self.parse_select_core()?;
        loop {
            if self.eat_keyword(Keyword::Union) {
                if !self.eat_keyword(Keyword::All) {
                    let _ = self.eat_keyword(Keyword::Distinct);
                }
            } else if self.eat_keyword(Keyword::Intersect) || self.eat_keyword(Keyword::Except) {
                let _ = self.eat_keyword(Keyword::Distinct);
            } else {
                break;
            }
            self.parse_select_core()?;
        }
        if self.check_keyword(Keyword::Order) {
            self.parse_order_by()?;
        }
        if self.check_keyword(Keyword::Limit) {
            self.parse_limit()?;
        }
        Ok(())
    }

    /// One SELECT core, possibly parenthesized.
    fn parse_select_core(&mut self) -> Result<()> {
        if self.check(&TokenKind::LeftParen) {
            self.advance();
            self.parse_select_core()?;
            return self.expect(&TokenKind::RightParen, "`)`");
        }
        self.expect_keyword(Keyword::Select)?;
        if !self.eat_keyword(Keyword::Distinct) {
            let _ = self.eat_keyword(Keyword::All);
        }
        self.parse_result_columns()?;
        if self.eat_keyword(Keyword::From) {
            self.parse_join_source()?;
        }
        if self.eat_keyword(Keyword::Where) {
            self.parse_expression(0)?;
        }
        if self.eat_keyword(Keyword::Qualify) {
            self.parse_expression(0)?;
        }
        if self.eat_keyword(Keyword::Group) {
            self.expect_keyword(Keyword::By)?;
            self.parse_expression_list()?;
        }
        if self.eat_keyword(Keyword::Having) {
            self.parse_expression(0)?;
        }
        if self.check_keyword(Keyword::Order) {
            self.parse_order_by()?;
        }
        if self.check_keyword(Keyword::Window) {
            self.parse_window_clause()?;
        }
        Ok(())
    }

    fn parse_result_columns(&mut self) -> Result<()> {
        loop {
            self.parse_result_column()?;
            if !self.check(&TokenKind::Comma) {
                break;
            }
            self.advance();
        }
        Ok(())
    }

    /// `*`, `name.*`, or an expression with an optional alias.
    fn parse_result_column(&mut self) -> Result<()> {
        if self.check(&TokenKind::Star) {
            self.advance();
            return self.parse_star_modifiers();
        }
        if matches!(self.current().kind, TokenKind::Ident(_))
            && matches!(self.peek_kind(1), TokenKind::Dot)
            && matches!(self.peek_kind(2), TokenKind::Star)
        {
            self.advance();
            self.advance();
            self.advance();
            return self.parse_star_modifiers();
        }
        self.parse_expression(0)?;
        if self.eat_keyword(Keyword::As) {
            self.expect_identifier_like()?;
        } else {
            let _ = self.eat_column_alias();
        }
        Ok(())
    }

    /// `EXCEPT ( column [, ...] )` after a star. The lookahead keeps a
    /// compound EXCEPT whose operand is parenthesized out of this rule.
    fn parse_star_modifiers(&mut self) -> Result<()> {
        if self.check_keyword(Keyword::Except)
            && matches!(self.peek_kind(1), TokenKind::LeftParen)
            && !matches!(
                self.peek_kind(2),
                TokenKind::Keyword(Keyword::Select) | TokenKind::LeftParen
            )
        {
            self.advance(); // EXCEPT
            self.advance(); // (
            loop {
                self.expect_identifier_like()?;
                if !self.check(&TokenKind::Comma) {
                    break;
                }
                self.advance();
            }
            self.expect(&TokenKind::RightParen, "`)`")?;
        }
        Ok(())
    }

    fn eat_column_alias(&mut self) -> bool {
        let is_alias = match &self.current().kind {
            TokenKind::Ident(_) => true,
            TokenKind::Keyword(keyword) => keyword.is_function_keyword(),
            _ => false,
        };
        if is_alias {
            self.advance();
        }
        is_alias
    }

    // --- FROM clause ---

    /// A chain of sources connected by commas and JOIN operators.
    fn parse_join_source(&mut self) -> Result<()> {
        self.parse_single_source()?;
        loop {
            if self.check(&TokenKind::Comma) {
                self.advance();
            } else if self.at_join_operator() {
                self.parse_join_operator()?;
            } else {
                break;
            }
            self.parse_single_source()?;
            self.parse_join_constraint()?;
        }
        Ok(())
    }

    fn at_join_operator(&self) -> bool {
        matches!(
            self.current().kind,
            TokenKind::Keyword(
                Keyword::Natural
                    | Keyword::Inner
                    | Keyword::Cross
                    | Keyword::Left
                    | Keyword::Right
                    | Keyword::Full
                    | Keyword::Outer
                    | Keyword::Join,
            )
        )
    }

    fn parse_join_operator(&mut self) -> Result<()> {
        let _ = self.eat_keyword(Keyword::Natural);
        if self.eat_keyword(Keyword::Join) {
            return Ok(());
        }
        if self.eat_keyword(Keyword::Inner) || self.eat_keyword(Keyword::Cross) {
            return self.expect_keyword(Keyword::Join);
        }
        if self.eat_keyword(Keyword::Left)
            || self.eat_keyword(Keyword::Right)
            || self.eat_keyword(Keyword::Full)
        {
            let _ = self.eat_keyword(Keyword::Outer);
            return self.expect_keyword(Keyword::Join);
        }
        if self.eat_keyword(Keyword::Outer) {
            return self.expect_keyword(Keyword::Join);
        }
        Err(self.unexpected("JOIN"))
    }

    /// Optional `ON expr` or `USING ( column [, ...] )`.
    fn parse_join_constraint(&mut self) -> Result<()> {
        if self.eat_keyword(Keyword::On) {
            self.parse_expression(0)?;
        } else if self.eat_keyword(Keyword::Using) {
            self.expect(&TokenKind::LeftParen, "`(`")?;
            loop {
                self.parse_column_path()?;
                if !self.check(&TokenKind::Comma) {
                    break;
                }
                self.advance();
            }
            self.expect(&TokenKind::RightParen, "`)`")?;
        }
        Ok(())
    }

    /// One FROM source: a table reference, `UNNEST(...)`, `EXTERNAL_QUERY(...)`,
    /// a parenthesized subquery, or a parenthesized join.
    fn parse_single_source(&mut self) -> Result<()> {
        if self.check_keyword(Keyword::Unnest) && matches!(self.peek_kind(1), TokenKind::LeftParen)
        {
            self.advance();
            self.advance();
            self.parse_expression(0)?;
            self.expect(&TokenKind::RightParen, "`)`")?;
            return self.parse_table_alias();
        }
        if self.check_keyword(Keyword::ExternalQuery) {
            return self.parse_external_query();
        }
        if self.check(&TokenKind::LeftParen) {
            let first = match self.attempt(|p| {
                p.advance();
                p.parse_query()?;
                p.expect(&TokenKind::RightParen, "`)`")?;
                p.parse_table_alias()
            })? {
                Ok(()) => return Ok(()),
                Err(error) => error,
            };
            let second = match self.attempt(|p| {
                p.advance();
                p.parse_join_source()?;
                p.expect(&TokenKind::RightParen, "`)`")
            })? {
                Ok(()) => return Ok(()),
                Err(error) => error,
            };
            return Err(deeper(first, second).into());
        }
        self.parse_table_reference()?;
        self.parse_table_alias()?;
        if self.eat_keyword(Keyword::For) {
            self.expect_keyword(Keyword::SystemTime)?;
            self.expect_keyword(Keyword::As)?;
            self.expect_keyword(Keyword::Of)?;
            self.parse_expression(0)?;
        }
        if self.eat_keyword(Keyword::Indexed) {
            self.expect_keyword(Keyword::By)?;
            self.expect_identifier()?;
        } else if self.check_keyword(Keyword::Not)
            && matches!(self.peek_kind(1), TokenKind::Keyword(Keyword::Indexed))
        {
            self.advance();
            self.advance();
        }
        Ok(())
    }

    /// `EXTERNAL_QUERY('connection', 'statement')`: parses the inner
    /// statement with the connection active, which re-homes the tables it
    /// references. The connection is cleared again no matter how the inner
    /// parse ends.
    fn parse_external_query(&mut self) -> Result<()> {
        self.expect_keyword(Keyword::ExternalQuery)?;
        self.expect(&TokenKind::LeftParen, "`(`")?;
        let connection = self.expect_string()?;
        self.expect(&TokenKind::Comma, "`,`")?;
        let statement = self.expect_string()?;
        self.expect(&TokenKind::RightParen, "`)`")?;

        self.collector.enter_external_query(connection)?;
        let inner = Parser::new(&statement, &mut *self.collector).parse_statement();
        self.collector.leave_external_query();
        inner?;

        self.parse_table_alias()
    }

    /// Collects a dotted table path and records it.
    fn parse_table_reference(&mut self) -> Result<()> {
        let mut parts = vec![self.expect_table_part()?];
        while self.check(&TokenKind::Dot) && self.table_part_follows(1) {
            self.advance();
            parts.push(self.expect_table_part()?);
        }
        self.collector.record_table_reference(&parts)?;
        Ok(())
    }

    fn expect_table_part(&mut self) -> Result<TablePart> {
        match &self.current().kind {
            TokenKind::Ident(name) => {
                let part = TablePart {
                    text: name.clone(),
                    quoted: false,
                };
                self.advance();
                Ok(part)
            }
            TokenKind::Quoted(content) => {
                if content.is_empty() {
                    return Err(self.unexpected("table name"));
                }
                let part = TablePart {
                    text: content.clone(),
                    quoted: true,
                };
                self.advance();
                Ok(part)
            }
            _ => Err(self.unexpected("table name")),
        }
    }

    fn table_part_follows(&self, offset: usize) -> bool {
        matches!(
            self.peek_kind(offset),
            TokenKind::Ident(_) | TokenKind::Quoted(_)
        )
    }

    /// Optional `[AS] alias`. Bare aliases must be plain identifiers so that
    /// a following keyword such as LEFT keeps its meaning.
    fn parse_table_alias(&mut self) -> Result<()> {
        if self.eat_keyword(Keyword::As) {
            self.expect_identifier()?;
        } else if matches!(self.current().kind, TokenKind::Ident(_)) {
            self.advance();
        }
        Ok(())
    }

    // --- Trailing clauses ---

    fn parse_order_by(&mut self) -> Result<()> {
        self.expect_keyword(Keyword::Order)?;
        self.expect_keyword(Keyword::By)?;
        loop {
            self.parse_expression(0)?;
            if self.eat_keyword(Keyword::Collate) {
                self.expect_identifier()?;
            }
            if !self.eat_keyword(Keyword::Asc) {
                let _ = self.eat_keyword(Keyword::Desc);
            }
            if !self.check(&TokenKind::Comma) {
                break;
            }
            self.advance();
        }
        Ok(())
    }

    /// `LIMIT count [OFFSET skip]`, with the comma spelling accepted too.
    fn parse_limit(&mut self) -> Result<()> {
        self.expect_keyword(Keyword::Limit)?;
        self.parse_expression(0)?;
        if self.eat_keyword(Keyword::Offset) || self.eat(&TokenKind::Comma) {
            self.parse_expression(0)?;
        }
        Ok(())
    }

    /// `WINDOW name AS ( spec ) [, ...]`
    fn parse_window_clause(&mut self) -> Result<()> {
        self.expect_keyword(Keyword::Window)?;
        loop {
            self.expect_identifier()?;
            self.expect_keyword(Keyword::As)?;
            self.expect(&TokenKind::LeftParen, "`(`")?;
            self.parse_window_spec()?;
            self.expect(&TokenKind::RightParen, "`)`")?;
            if !self.check(&TokenKind::Comma) {
                break;
            }
            self.advance();
        }
        Ok(())
    }

    /// `[base_window] [PARTITION BY ...] [ORDER BY ...] [frame]`
    fn parse_window_spec(&mut self) -> Result<()> {
        if matches!(self.current().kind, TokenKind::Ident(_)) {
            self.advance();
        }
        if self.eat_keyword(Keyword::Partition) {
            self.expect_keyword(Keyword::By)?;
            self.parse_expression_list()?;
        }
        if self.check_keyword(Keyword::Order) {
            self.parse_order_by()?;
        }
        if self.check_keyword(Keyword::Rows) || self.check_keyword(Keyword::Range) {
            self.parse_window_frame()?;
        }
        Ok(())
    }

    fn parse_window_frame(&mut self) -> Result<()> {
        self.advance(); // ROWS | RANGE
        if self.eat_keyword(Keyword::Between) {
            self.parse_frame_bound()?;
            self.expect_keyword(Keyword::And)?;
            self.parse_frame_bound()?;
        } else {
            self.parse_frame_bound()?;
        }
        Ok(())
    }

    /// `UNBOUNDED PRECEDING`, `CURRENT ROW`, or `expr PRECEDING|FOLLOWING`.
    fn parse_frame_bound(&mut self) -> Result<()> {
        if self.eat_keyword(Keyword::Unbounded) {
            if !self.eat_keyword(Keyword::Preceding) {
                self.expect_keyword(Keyword::Following)?;
            }
            return Ok(());
        }
        if self.eat_keyword(Keyword::Current) {
            return self.expect_keyword(Keyword::Row);
        }
        // the offset must stop before a separating AND
        self.parse_expression(4)?;
        if !self.eat_keyword(Keyword::Preceding) {
            self.expect_keyword(Keyword::Following)?;
        }
        Ok(())
    }

    // --- Expressions ---

    fn parse_expression_list(&mut self) -> Result<()> {
        loop {
            self.parse_expression(0)?;
            if !self.check(&TokenKind::Comma) {
                break;
            }
            self.advance();
        }
        Ok(())
    }

    /// Pratt expression loop. Keyword operators that need lookahead (`NOT`
    /// pairs, the paren form of `IN`, `IS`, `BETWEEN`) are resolved here;
    /// everything else comes from the binding power table.
    fn parse_expression(&mut self, min_bp: u8) -> Result<()> {
        self.parse_prefix()?;
        loop {
            if self.check_keyword(Keyword::Isnull) || self.check_keyword(Keyword::Notnull) {
                if NULL_TEST_BP < min_bp {
                    break;
                }
                self.advance();
                continue;
            }
            if self.check_keyword(Keyword::Not) {
                match self.peek_kind(1) {
                    TokenKind::Keyword(Keyword::Null) => {
                        if NULL_TEST_BP < min_bp {
                            break;
                        }
                        self.advance();
                        self.advance();
                        continue;
                    }
                    TokenKind::Keyword(Keyword::In) => {
                        if !self.parse_in_operator(min_bp, 1)? {
                            break;
                        }
                        continue;
                    }
                    TokenKind::Keyword(Keyword::Like) => {
                        if COMPARISON_CLASS_BP.0 < min_bp {
                            break;
                        }
                        self.advance();
                        self.advance();
                        self.parse_expression(COMPARISON_CLASS_BP.1)?;
                        continue;
                    }
                    _ => break,
                }
            }
            if self.check_keyword(Keyword::In) {
                if !self.parse_in_operator(min_bp, 0)? {
                    break;
                }
                continue;
            }
            if self.check_keyword(Keyword::Is) {
                if COMPARISON_CLASS_BP.0 < min_bp {
                    break;
                }
                self.advance();
                let _ = self.eat_keyword(Keyword::Not);
                self.parse_expression(COMPARISON_CLASS_BP.1)?;
                continue;
            }
            if self.check_keyword(Keyword::Between) {
                if BETWEEN_BP.0 < min_bp {
                    break;
                }
                self.advance();
                self.parse_expression(BETWEEN_BP.1)?;
                self.expect_keyword(Keyword::And)?;
                self.parse_expression(BETWEEN_BP.1)?;
                continue;
            }
            let Some((l_bp, r_bp)) = infix_binding_power(&self.current().kind) else {
                break;
            };
            if l_bp < min_bp {
                break;
            }
            self.advance();
            self.parse_expression(r_bp)?;
        }
        Ok(())
    }

    /// Parses the `[NOT] IN` operator at the current position.
    /// `keyword_offset` is 1 when a NOT precedes the IN. Returns false
    /// without consuming anything when the operator binds too loosely for
    /// the current context.
    fn parse_in_operator(&mut self, min_bp: u8, keyword_offset: usize) -> Result<bool> {
        let list_form = matches!(self.peek_kind(keyword_offset + 1), TokenKind::LeftParen);
        let l_bp = if list_form {
            IN_LIST_BP
        } else {
            COMPARISON_CLASS_BP.0
        };
        if l_bp < min_bp {
            return Ok(false);
        }
        if keyword_offset == 1 {
            self.advance(); // NOT
        }
        self.advance(); // IN
        if list_form {
            self.advance(); // (
            if self.check_keyword(Keyword::Select) || self.check_keyword(Keyword::With) {
                self.parse_query()?;
            } else {
                self.parse_expression_list()?;
            }
            self.expect(&TokenKind::RightParen, "`)`")?;
        } else if self.eat_keyword(Keyword::Unnest) {
            self.expect(&TokenKind::LeftParen, "`(`")?;
            self.parse_expression(0)?;
            self.expect(&TokenKind::RightParen, "`)`")?;
        } else {
            return Err(self.unexpected("UNNEST or `(`"));
        }
        Ok(true)
    }

    fn parse_prefix(&mut self) -> Result<()> {
        if let Some(bp) = prefix_binding_power(&self.current().kind) {
            self.advance();
            return self.parse_expression(bp);
        }
        self.parse_atom()
    }

    fn parse_atom(&mut self) -> Result<()> {
        let kind = self.current().kind.clone();
        match kind {
            TokenKind::Number(_) | TokenKind::Quoted(_) | TokenKind::Blob(_) => {
                self.advance();
            }
            TokenKind::Question => {
                self.advance();
                if matches!(self.current().kind, TokenKind::Number(_)) {
                    self.advance();
                }
            }
            TokenKind::Colon | TokenKind::At | TokenKind::Dollar => {
                self.advance();
                self.expect_identifier()?;
            }
            TokenKind::LeftBracket => self.parse_array_body()?,
            TokenKind::LeftParen => self.parse_paren_atom()?,
            TokenKind::Keyword(keyword) => self.parse_keyword_atom(keyword)?,
            TokenKind::Ident(_) => self.parse_identifier_atom()?,
            _ => return Err(self.unexpected("expression")),
        }
        self.parse_index_suffix()
    }

    /// Optional `[OFFSET(expr)]` or `[ORDINAL(expr)]` after an atom. A plain
    /// bracket is left alone so a following array literal is not captured.
    fn parse_index_suffix(&mut self) -> Result<()> {
        if self.check(&TokenKind::LeftBracket)
            && matches!(
                self.peek_kind(1),
                TokenKind::Keyword(Keyword::Offset | Keyword::Ordinal)
            )
        {
            self.advance(); // [
            self.advance(); // OFFSET | ORDINAL
            self.expect(&TokenKind::LeftParen, "`(`")?;
            self.parse_expression(0)?;
            self.expect(&TokenKind::RightParen, "`)`")?;
            self.expect(&TokenKind::RightBracket, "`]`")?;
        }
        Ok(())
    }

    /// A parenthesized subquery, a grouped expression, or a struct value
    /// written as a list of two or more expressions.
    fn parse_paren_atom(&mut self) -> Result<()> {
        self.advance(); // (
        if self.check_keyword(Keyword::Select) || self.check_keyword(Keyword::With) {
            self.parse_query()?;
            return self.expect(&TokenKind::RightParen, "`)`");
        }
        if self.check(&TokenKind::LeftParen) {
            let subquery = self.attempt(|p| {
                p.parse_compound_select()?;
                p.expect(&TokenKind::RightParen, "`)`")
            })?;
            if subquery.is_ok() {
                return Ok(());
            }
        }
        self.parse_expression(0)?;
        while self.check(&TokenKind::Comma) {
            self.advance();
            self.parse_expression(0)?;
        }
        self.expect(&TokenKind::RightParen, "`)`")
    }

    fn parse_keyword_atom(&mut self, keyword: Keyword) -> Result<()> {
        match keyword {
            Keyword::Null => self.advance(),
            Keyword::Case => self.parse_case()?,
            Keyword::Cast | Keyword::SafeCast => self.parse_cast()?,
            Keyword::Exists => {
                self.advance();
                self.expect(&TokenKind::LeftParen, "`(`")?;
                self.parse_query()?;
                self.expect(&TokenKind::RightParen, "`)`")?;
            }
            Keyword::Extract => {
                self.advance();
                self.expect(&TokenKind::LeftParen, "`(`")?;
                self.parse_expression(0)?;
                self.expect_keyword(Keyword::From)?;
                self.parse_expression(0)?;
                self.expect(&TokenKind::RightParen, "`)`")?;
            }
            Keyword::CurrentDate | Keyword::CurrentTime | Keyword::CurrentTimestamp => {
                self.advance();
                if self.eat(&TokenKind::LeftParen) {
                    if !self.check(&TokenKind::RightParen) {
                        self.expect_string()?;
                    }
                    self.expect(&TokenKind::RightParen, "`)`")?;
                }
            }
            Keyword::Date | Keyword::Time | Keyword::Datetime | Keyword::Timestamp => {
                self.advance();
                if matches!(self.current().kind, TokenKind::Quoted(_)) {
                    self.advance();
                } else if self.check(&TokenKind::LeftParen) {
                    self.parse_call_tail()?;
                } else {
                    // bare: the type word doubles as a column reference
                    self.parse_path_tail();
                }
            }
            Keyword::Struct => self.parse_struct_literal()?,
            Keyword::Array => {
                self.advance();
                if self.check(&TokenKind::Lt) {
                    self.parse_type_list()?;
                    self.parse_array_body()?;
                } else if self.check(&TokenKind::LeftBracket) {
                    self.parse_array_body()?;
                } else if self.check(&TokenKind::LeftParen) {
                    self.parse_call_tail()?;
                }
            }
            Keyword::StringAgg => self.parse_string_agg()?,
            keyword if keyword.is_function_keyword() => {
                self.advance();
                if self.check(&TokenKind::LeftParen) {
                    self.parse_call_tail()?;
                } else {
                    self.parse_path_tail();
                }
            }
            _ => return Err(self.unexpected("expression")),
        }
        Ok(())
    }

    /// `CASE [operand] WHEN ... THEN ... [WHEN ...] [ELSE ...] END`
    fn parse_case(&mut self) -> Result<()> {
        self.advance(); // CASE
        if !self.check_keyword(Keyword::When) {
            self.parse_expression(0)?;
        }
        self.expect_keyword(Keyword::When)?;
        loop {
            self.parse_expression(0)?;
            self.expect_keyword(Keyword::Then)?;
            self.parse_expression(0)?;
            if !self.eat_keyword(Keyword::When) {
                break;
            }
        }
        if self.eat_keyword(Keyword::Else) {
            self.parse_expression(0)?;
        }
        self.expect_keyword(Keyword::End)
    }

    /// `CAST ( expr AS type )` and the SAFE_CAST spelling.
    fn parse_cast(&mut self) -> Result<()> {
        self.advance(); // CAST | SAFE_CAST
        self.expect(&TokenKind::LeftParen, "`(`")?;
        self.parse_expression(0)?;
        self.expect_keyword(Keyword::As)?;
        self.parse_type_name()?;
        self.expect(&TokenKind::RightParen, "`)`")
    }

    fn parse_type_name(&mut self) -> Result<()> {
        let is_type = match &self.current().kind {
            TokenKind::Keyword(
                Keyword::Date
                | Keyword::Time
                | Keyword::Datetime
                | Keyword::Timestamp
                | Keyword::Int64
                | Keyword::Float64
                | Keyword::Numeric
                | Keyword::Bool
                | Keyword::Bytes
                | Keyword::Geography
                | Keyword::Array
                | Keyword::Struct
                | Keyword::Null,
            ) => true,
            TokenKind::Ident(name) => ["STRING", "TEXT", "REAL", "INTEGER", "BLOB"]
                .iter()
                .any(|t| name.eq_ignore_ascii_case(t)),
            _ => false,
        };
        if is_type {
            self.advance();
            Ok(())
        } else {
            Err(self.unexpected("type name"))
        }
    }

    /// `< type [, ...] >`
    fn parse_type_list(&mut self) -> Result<()> {
        self.expect(&TokenKind::Lt, "`<`")?;
        loop {
            self.parse_type_name()?;
            if !self.check(&TokenKind::Comma) {
                break;
            }
            self.advance();
        }
        self.expect(&TokenKind::Gt, "`>`")
    }

    /// `STRUCT [<types>] ( [expr [AS name] [, ...]] )`
    fn parse_struct_literal(&mut self) -> Result<()> {
        self.advance(); // STRUCT
        if self.check(&TokenKind::Lt) {
            self.parse_type_list()?;
        }
        self.expect(&TokenKind::LeftParen, "`(`")?;
        if !self.check(&TokenKind::RightParen) {
            loop {
                self.parse_expression(0)?;
                if self.eat_keyword(Keyword::As) {
                    self.expect_identifier_like()?;
                }
                if !self.check(&TokenKind::Comma) {
                    break;
                }
                self.advance();
            }
        }
        self.expect(&TokenKind::RightParen, "`)`")
    }

    /// `[ expr [, ...] ]`
    fn parse_array_body(&mut self) -> Result<()> {
        self.expect(&TokenKind::LeftBracket, "`[`")?;
        if !self.check(&TokenKind::RightBracket) {
            loop {
                self.parse_expression(0)?;
                if !self.check(&TokenKind::Comma) {
                    break;
                }
                self.advance();
            }
        }
        self.expect(&TokenKind::RightBracket, "`]`")
    }

    /// `STRING_AGG ( [DISTINCT] expr [, delimiter] [ORDER BY ...] [LIMIT n] )`
    fn parse_string_agg(&mut self) -> Result<()> {
        self.advance(); // STRING_AGG
        self.expect(&TokenKind::LeftParen, "`(`")?;
        let _ = self.eat_keyword(Keyword::Distinct);
        self.parse_expression(0)?;
        if self.eat(&TokenKind::Comma) {
            self.expect_string()?;
        }
        if self.check_keyword(Keyword::Order) {
            self.advance();
            self.expect_keyword(Keyword::By)?;
            self.parse_expression(0)?;
            if !self.eat_keyword(Keyword::Asc) {
                let _ = self.eat_keyword(Keyword::Desc);
            }
            if self.eat_keyword(Keyword::Limit) {
                self.parse_expression(0)?;
            }
        }
        self.expect(&TokenKind::RightParen, "`)`")?;
        if self.check_keyword(Keyword::Over) {
            self.parse_over_clause()?;
        }
        Ok(())
    }

    /// A regex literal, a function call with up to two dotted qualifiers, or
    /// a dotted column path.
    fn parse_identifier_atom(&mut self) -> Result<()> {
        if let TokenKind::Ident(name) = &self.current().kind {
            if name.eq_ignore_ascii_case("r")
                && matches!(self.peek_kind(1), TokenKind::Quoted(_))
            {
                self.advance();
                self.advance();
                return Ok(());
            }
        }
        if let Some(name_tokens) = self.function_call_lookahead() {
            for _ in 0..name_tokens {
                self.advance();
            }
            return self.parse_call_tail();
        }
        self.parse_column_path()
    }

    /// Detects a function call at the current identifier. Returns the number
    /// of tokens in the dotted name when an opening paren follows it.
    fn function_call_lookahead(&self) -> Option<usize> {
        if matches!(self.peek_kind(1), TokenKind::LeftParen) {
            return Some(1);
        }
        if matches!(self.peek_kind(1), TokenKind::Dot) && self.ident_like_follows(2) {
            if matches!(self.peek_kind(3), TokenKind::LeftParen) {
                return Some(3);
            }
            if matches!(self.peek_kind(3), TokenKind::Dot)
                && self.ident_like_follows(4)
                && matches!(self.peek_kind(5), TokenKind::LeftParen)
            {
                return Some(5);
            }
        }
        None
    }

    /// A dotted column path of at most seven components.
    fn parse_column_path(&mut self) -> Result<()> {
        self.expect_identifier_like()?;
        self.parse_path_tail();
        Ok(())
    }

    /// Consumes `.name` segments after a path head.
    fn parse_path_tail(&mut self) {
        let mut depth = 0;
        while depth < 6 && self.check(&TokenKind::Dot) && self.ident_like_follows(1) {
            self.advance();
            self.advance();
            depth += 1;
        }
    }

    /// Argument list and optional OVER clause; the opening paren has not
    /// been consumed yet.
    fn parse_call_tail(&mut self) -> Result<()> {
        self.expect(&TokenKind::LeftParen, "`(`")?;
        if self.check(&TokenKind::Star) {
            self.advance();
        } else if !self.check(&TokenKind::RightParen) {
            let _ = self.eat_keyword(Keyword::Distinct);
            loop {
                self.parse_call_argument()?;
                if !self.check(&TokenKind::Comma) {
                    break;
                }
                self.advance();
            }
            if self.check_keyword(Keyword::Ignore) || self.check_keyword(Keyword::Respect) {
                self.advance();
                self.expect_keyword(Keyword::Nulls)?;
            }
        }
        self.expect(&TokenKind::RightParen, "`)`")?;
        if self.check_keyword(Keyword::Over) {
            self.parse_over_clause()?;
        }
        Ok(())
    }

    /// One call argument: an expression or `INTERVAL expr date_part`.
    fn parse_call_argument(&mut self) -> Result<()> {
        if self.eat_keyword(Keyword::Interval) {
            self.parse_expression(0)?;
            return self.expect_date_part();
        }
        self.parse_expression(0)
    }

    fn expect_date_part(&mut self) -> Result<()> {
        let recognized = match &self.current().kind {
            TokenKind::Ident(name) => is_date_part(name),
            _ => false,
        };
        if recognized {
            self.advance();
            Ok(())
        } else {
            Err(self.unexpected("date part"))
        }
    }

    /// `OVER window_name` or `OVER ( spec )`.
    fn parse_over_clause(&mut self) -> Result<()> {
        self.expect_keyword(Keyword::Over)?;
        if self.eat(&TokenKind::LeftParen) {
            self.parse_window_spec()?;
            self.expect(&TokenKind::RightParen, "`)`")?;
        } else {
            self.expect_identifier()?;
        }
        Ok(())
    }
}
