//! # bqview-core
//!
//! Extracts the base tables referenced by a BigQuery Standard SQL view body.
//!
//! This crate provides:
//! - A lexer and a hand-written recursive descent parser with Pratt
//!   expression parsing for a practical subset of the SELECT grammar
//! - Extraction of every referenced table, with WITH aliases filtered out
//! - Normalized `project.dataset.table` identifiers
//!
//! ## Extracting Table Names
//!
//! ```rust
//! use bqview_core::extract_table_names;
//!
//! let tables = extract_table_names(
//!     "WITH sessions AS (SELECT * FROM telemetry.raw_events) \
//!      SELECT user_id FROM sessions JOIN billing.accounts USING (user_id)",
//! )?;
//!
//! let rendered: Vec<String> = tables.iter().map(ToString::to_string).collect();
//! assert_eq!(rendered, ["billing.accounts", "telemetry.raw_events"]);
//! # Ok::<(), bqview_core::ExtractError>(())
//! ```
//!
//! WITH names shadow tables wherever the view mentions them, so `sessions`
//! above is not part of the result even though it appears in a FROM clause.
//!
//! ## Inspecting Failures
//!
//! Errors carry the position of the offending token:
//!
//! ```rust
//! use bqview_core::{ExtractError, extract_table_names};
//!
//! let error = extract_table_names("SELECT FROM x").unwrap_err();
//! match error {
//!     ExtractError::Syntax(syntax) => assert_eq!(syntax.line, 1),
//!     ExtractError::Logic(_) => unreachable!(),
//! }
//! ```

pub mod error;
pub mod extract;
pub mod lexer;
mod parser;

pub use error::{ExtractError, LogicError, SyntaxError};
pub use extract::{TableIdentifier, extract_table_names};
