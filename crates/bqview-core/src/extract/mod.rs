//! Table name extraction.

mod collector;
mod ident;

use std::collections::BTreeSet;

use tracing::debug;

pub(crate) use collector::TableCollector;
pub use ident::TableIdentifier;
pub(crate) use ident::TablePart;

use crate::error::ExtractError;
use crate::parser::Parser;

/// Extracts the base tables referenced by a view body.
///
/// Names introduced by a WITH clause are not base tables and do not appear
/// in the result. References are deduplicated and ordered.
///
/// ```
/// use bqview_core::extract_table_names;
///
/// let tables = extract_table_names(
///     "SELECT name FROM census.people WHERE age > 21",
/// )?;
/// let rendered: Vec<String> = tables.iter().map(ToString::to_string).collect();
/// assert_eq!(rendered, ["census.people"]);
/// # Ok::<(), bqview_core::ExtractError>(())
/// ```
///
/// # Errors
///
/// Returns [`ExtractError::Syntax`] when the statement falls outside the
/// supported grammar and [`ExtractError::Logic`] for invalid
/// `EXTERNAL_QUERY` usage.
pub fn extract_table_names(sql: &str) -> Result<BTreeSet<TableIdentifier>, ExtractError> {
    let mut collector = TableCollector::new();
    Parser::new(sql, &mut collector).parse_statement()?;
    let tables = collector.into_table_names();
    debug!(tables = tables.len(), "extraction complete");
    Ok(tables)
}
