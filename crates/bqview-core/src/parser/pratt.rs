//! Binding powers for the expression grammar.
//!
//! Higher numbers bind tighter. Left-associative operators use the pair
//! `(l, l + 1)`: the left power gates entry from the enclosing context and
//! the right power is the minimum for the operand that follows.

use crate::lexer::{Keyword, TokenKind};

/// Binding power of the prefix operators `+`, `-`, `~`, and `NOT`.
pub(crate) const PREFIX_BP: u8 = 23;

/// Binding power of the postfix null tests `ISNULL`, `NOTNULL`, `NOT NULL`.
pub(crate) const NULL_TEST_BP: u8 = 21;

/// Binding powers of the keyword comparison class: `IS`, `[NOT] LIKE`,
/// `[NOT] IN UNNEST`, `GLOB`, `MATCH`, `REGEXP`.
pub(crate) const COMPARISON_CLASS_BP: (u8, u8) = (9, 10);

/// Binding powers of `BETWEEN low AND high`. The bound operands parse at the
/// right power, which keeps them from swallowing the separating `AND`.
pub(crate) const BETWEEN_BP: (u8, u8) = (7, 8);

/// Binding power of the loose postfix `[NOT] IN ( ... )` membership test.
pub(crate) const IN_LIST_BP: u8 = 5;

/// Returns the binding power pair for a plain infix operator, or `None` when
/// the token cannot continue an expression. `NOT`-led operators and the
/// paren form of `IN` are resolved by the parser with lookahead instead.
#[must_use]
pub(crate) const fn infix_binding_power(kind: &TokenKind) -> Option<(u8, u8)> {
    let powers = match kind {
        TokenKind::Keyword(Keyword::Or) => (1, 2),
        TokenKind::Keyword(Keyword::And) => (3, 4),
        TokenKind::Keyword(Keyword::Between) => BETWEEN_BP,
        TokenKind::Keyword(
            Keyword::Is | Keyword::In | Keyword::Like | Keyword::Glob | Keyword::Match
            | Keyword::Regexp,
        ) => COMPARISON_CLASS_BP,
        TokenKind::Eq
        | TokenKind::NotEq
        | TokenKind::Lt
        | TokenKind::LtEq
        | TokenKind::Gt
        | TokenKind::GtEq
        | TokenKind::NotLt
        | TokenKind::NotGt => (11, 12),
        TokenKind::LeftShift | TokenKind::RightShift | TokenKind::BitAnd | TokenKind::BitOr => {
            (13, 14)
        }
        TokenKind::Plus | TokenKind::Minus => (15, 16),
        TokenKind::Star | TokenKind::Slash | TokenKind::Percent => (17, 18),
        TokenKind::Concat => (19, 20),
        _ => return None,
    };
    Some(powers)
}

/// Returns the binding power for a prefix operator.
#[must_use]
pub(crate) const fn prefix_binding_power(kind: &TokenKind) -> Option<u8> {
    match kind {
        TokenKind::Plus | TokenKind::Minus | TokenKind::BitNot
        | TokenKind::Keyword(Keyword::Not) => Some(PREFIX_BP),
        _ => None,
    }
}
