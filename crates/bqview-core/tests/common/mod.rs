#![allow(dead_code)]

use std::collections::BTreeSet;

use bqview_core::{ExtractError, TableIdentifier, extract_table_names};

pub fn tables(sql: &str) -> BTreeSet<TableIdentifier> {
    extract_table_names(sql).unwrap_or_else(|e| panic!("Failed to extract: {sql}\nError: {e:?}"))
}

pub fn extract_err(sql: &str) -> ExtractError {
    extract_table_names(sql).expect_err(&format!("Expected extraction error for: {sql}"))
}

/// An identifier with only a table component.
pub fn t1(table: &str) -> TableIdentifier {
    TableIdentifier {
        project: None,
        dataset: None,
        table: table.to_string(),
    }
}

/// An identifier with dataset and table components.
pub fn t2(dataset: &str, table: &str) -> TableIdentifier {
    TableIdentifier {
        project: None,
        dataset: Some(dataset.to_string()),
        table: table.to_string(),
    }
}

/// A fully qualified identifier.
pub fn t3(project: &str, dataset: &str, table: &str) -> TableIdentifier {
    TableIdentifier {
        project: Some(project.to_string()),
        dataset: Some(dataset.to_string()),
        table: table.to_string(),
    }
}

pub fn set(identifiers: &[TableIdentifier]) -> BTreeSet<TableIdentifier> {
    identifiers.iter().cloned().collect()
}
