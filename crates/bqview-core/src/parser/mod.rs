//! Statement parsing.
//!
//! [`Parser`] drives a hand-written grammar over the token stream. Operator
//! precedence for expressions comes from the binding power tables in
//! `pratt`.

mod parser;
mod pratt;

pub(crate) use parser::Parser;
