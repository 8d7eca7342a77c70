//! Accumulates table references and aliases while a statement is parsed.

use std::collections::BTreeSet;

use tracing::debug;

use crate::error::LogicError;

use super::ident::{TableIdentifier, TablePart};

/// Collects what the parser finds: referenced tables, WITH aliases, and the
/// active `EXTERNAL_QUERY` connection if any.
#[derive(Debug, Default)]
pub(crate) struct TableCollector {
    tables: BTreeSet<TableIdentifier>,
    aliases: BTreeSet<TableIdentifier>,
    external_query: Option<String>,
}

impl TableCollector {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Records a WITH alias. Aliases are compared case-insensitively when
    /// the final table set is assembled.
    pub(crate) fn record_alias(&mut self, name: String) {
        debug!(alias = %name, "recorded WITH alias");
        self.aliases.insert(TableIdentifier {
            project: None,
            dataset: None,
            table: name,
        });
    }

    /// Records a dotted table path from a FROM clause.
    ///
    /// Inside an `EXTERNAL_QUERY` the path must be a single name, which is
    /// re-homed under the connection; outside, a single quoted part may
    /// carry a whole dotted path.
    pub(crate) fn record_table_reference(&mut self, parts: &[TablePart]) -> Result<(), LogicError> {
        let identifier = if let Some(connection) = &self.external_query {
            let components: Vec<&str> = if parts.len() == 1 && parts[0].quoted {
                parts[0].text.split('.').collect()
            } else {
                parts.iter().map(|part| part.text.as_str()).collect()
            };
            if components.len() == 1 {
                TableIdentifier {
                    project: Some(connection.clone()),
                    dataset: None,
                    table: components[0].to_string(),
                }
            } else {
                return Err(LogicError::ExternalQueryTablePath {
                    connection: connection.clone(),
                    path: components.join("."),
                });
            }
        } else if parts.len() == 1 && parts[0].quoted {
            TableIdentifier::from_quoted_content(&parts[0].text)
        } else {
            TableIdentifier::from_components(parts.iter().map(|p| p.text.clone()).collect())
        };
        debug!(table = %identifier, "recorded table reference");
        self.tables.insert(identifier);
        Ok(())
    }

    /// Marks the start of an `EXTERNAL_QUERY` body.
    pub(crate) fn enter_external_query(&mut self, connection: String) -> Result<(), LogicError> {
        if self.external_query.is_some() {
            return Err(LogicError::NestedExternalQuery);
        }
        debug!(connection = %connection, "entering EXTERNAL_QUERY");
        self.external_query = Some(connection);
        Ok(())
    }

    pub(crate) fn leave_external_query(&mut self) {
        debug!("leaving EXTERNAL_QUERY");
        self.external_query = None;
    }

    /// The referenced tables with every alias filtered out.
    #[must_use]
    pub(crate) fn into_table_names(self) -> BTreeSet<TableIdentifier> {
        let aliases: BTreeSet<TableIdentifier> =
            self.aliases.iter().map(TableIdentifier::lowered).collect();
        self.tables
            .into_iter()
            .filter(|table| !aliases.contains(&table.lowered()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn part(text: &str) -> TablePart {
        TablePart {
            text: text.to_string(),
            quoted: false,
        }
    }

    fn quoted_part(text: &str) -> TablePart {
        TablePart {
            text: text.to_string(),
            quoted: true,
        }
    }

    #[test]
    fn test_alias_filtering_ignores_case() {
        let mut collector = TableCollector::new();
        collector.record_alias("Sessions".to_string());
        collector
            .record_table_reference(&[part("SESSIONS")])
            .unwrap();
        collector.record_table_reference(&[part("events")]).unwrap();
        let tables = collector.into_table_names();
        assert_eq!(tables.len(), 1);
        assert!(tables.iter().any(|t| t.table == "events"));
    }

    #[test]
    fn test_qualified_references_are_not_aliases() {
        let mut collector = TableCollector::new();
        collector.record_alias("sessions".to_string());
        collector
            .record_table_reference(&[part("d"), part("sessions")])
            .unwrap();
        assert_eq!(collector.into_table_names().len(), 1);
    }

    #[test]
    fn test_duplicate_references_collapse() {
        let mut collector = TableCollector::new();
        collector.record_table_reference(&[part("t")]).unwrap();
        collector.record_table_reference(&[part("t")]).unwrap();
        assert_eq!(collector.into_table_names().len(), 1);
    }

    #[test]
    fn test_external_query_re_homes_single_names() {
        let mut collector = TableCollector::new();
        collector.enter_external_query("conn".to_string()).unwrap();
        collector.record_table_reference(&[part("orders")]).unwrap();
        collector.leave_external_query();
        let table = collector.into_table_names().into_iter().next().unwrap();
        assert_eq!(table.project.as_deref(), Some("conn"));
        assert_eq!(table.dataset, None);
        assert_eq!(table.table, "orders");
    }

    #[test]
    fn test_external_query_rejects_dotted_paths() {
        let mut collector = TableCollector::new();
        collector.enter_external_query("conn".to_string()).unwrap();
        let error = collector
            .record_table_reference(&[part("d"), part("t")])
            .unwrap_err();
        assert!(matches!(error, LogicError::ExternalQueryTablePath { .. }));
        let error = collector
            .record_table_reference(&[quoted_part("a.b")])
            .unwrap_err();
        assert!(matches!(error, LogicError::ExternalQueryTablePath { .. }));
    }

    #[test]
    fn test_external_query_cannot_nest() {
        let mut collector = TableCollector::new();
        collector.enter_external_query("outer".to_string()).unwrap();
        let error = collector
            .enter_external_query("inner".to_string())
            .unwrap_err();
        assert!(matches!(error, LogicError::NestedExternalQuery));
    }
}
