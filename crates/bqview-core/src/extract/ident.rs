//! Table identifiers and the normalization rules that produce them.

use std::fmt;

use serde::ser::{Serialize, SerializeTuple, Serializer};

/// One component of a dotted table path as written in the statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct TablePart {
    pub(crate) text: String,
    pub(crate) quoted: bool,
}

/// A table referenced by a statement, split into its optional qualifiers.
///
/// Paths with fewer than three components fill from the right, so `a.b`
/// has no project and `b` alone has neither project nor dataset. Paths
/// with more than three components keep the first two as project and
/// dataset and join the rest into the table name.
///
/// Serializes as the three-element array `[project, dataset, table]`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TableIdentifier {
    pub project: Option<String>,
    pub dataset: Option<String>,
    pub table: String,
}

impl TableIdentifier {
    /// Normalizes a component list into an identifier.
    #[must_use]
    pub(crate) fn from_components(mut components: Vec<String>) -> Self {
        if components.len() > 3 {
            let tail = components.split_off(2).join(".");
            components.push(tail);
        }
        let mut components = components.into_iter();
        match (components.next(), components.next(), components.next()) {
            (Some(project), Some(dataset), Some(table)) => Self {
                project: Some(project),
                dataset: Some(dataset),
                table,
            },
            (Some(dataset), Some(table), None) => Self {
                project: None,
                dataset: Some(dataset),
                table,
            },
            (Some(table), None, None) => Self {
                project: None,
                dataset: None,
                table,
            },
            _ => Self {
                project: None,
                dataset: None,
                table: String::new(),
            },
        }
    }

    /// Builds an identifier from the content of a single quoted path, which
    /// may carry dots inside the quotes.
    #[must_use]
    pub(crate) fn from_quoted_content(content: &str) -> Self {
        let mut components: Vec<String> = content.split('.').map(str::to_string).collect();
        // INFORMATION_SCHEMA belongs to the view name that follows it
        if components.len() >= 2
            && components[components.len() - 2].eq_ignore_ascii_case("INFORMATION_SCHEMA")
        {
            if let (Some(last), Some(schema)) = (components.pop(), components.pop()) {
                components.push(format!("{schema}.{last}"));
            }
        }
        Self::from_components(components)
    }

    /// The identifier with every component lowercased, for case-insensitive
    /// comparison against aliases.
    #[must_use]
    pub(crate) fn lowered(&self) -> Self {
        Self {
            project: self.project.as_ref().map(|p| p.to_lowercase()),
            dataset: self.dataset.as_ref().map(|d| d.to_lowercase()),
            table: self.table.to_lowercase(),
        }
    }
}

impl fmt::Display for TableIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(project) = &self.project {
            write!(f, "{project}.")?;
        }
        if let Some(dataset) = &self.dataset {
            write!(f, "{dataset}.")?;
        }
        write!(f, "{}", self.table)
    }
}

impl Serialize for TableIdentifier {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut tuple = serializer.serialize_tuple(3)?;
        tuple.serialize_element(&self.project)?;
        tuple.serialize_element(&self.dataset)?;
        tuple.serialize_element(&self.table)?;
        tuple.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ident(project: Option<&str>, dataset: Option<&str>, table: &str) -> TableIdentifier {
        TableIdentifier {
            project: project.map(str::to_string),
            dataset: dataset.map(str::to_string),
            table: table.to_string(),
        }
    }

    fn components(parts: &[&str]) -> Vec<String> {
        parts.iter().map(|p| (*p).to_string()).collect()
    }

    #[test]
    fn test_from_components_pads_from_the_right() {
        assert_eq!(
            TableIdentifier::from_components(components(&["t"])),
            ident(None, None, "t")
        );
        assert_eq!(
            TableIdentifier::from_components(components(&["d", "t"])),
            ident(None, Some("d"), "t")
        );
        assert_eq!(
            TableIdentifier::from_components(components(&["p", "d", "t"])),
            ident(Some("p"), Some("d"), "t")
        );
    }

    #[test]
    fn test_from_components_joins_extra_components_into_the_table() {
        assert_eq!(
            TableIdentifier::from_components(components(&["p", "d", "t", "u"])),
            ident(Some("p"), Some("d"), "t.u")
        );
        assert_eq!(
            TableIdentifier::from_components(components(&["p", "d", "t", "u", "v"])),
            ident(Some("p"), Some("d"), "t.u.v")
        );
    }

    #[test]
    fn test_from_components_keeps_information_schema_split() {
        assert_eq!(
            TableIdentifier::from_components(components(&["d", "INFORMATION_SCHEMA", "TABLES"])),
            ident(Some("d"), Some("INFORMATION_SCHEMA"), "TABLES")
        );
        assert_eq!(
            TableIdentifier::from_components(components(&["INFORMATION_SCHEMA", "SCHEMATA"])),
            ident(None, Some("INFORMATION_SCHEMA"), "SCHEMATA")
        );
    }

    #[test]
    fn test_quoted_information_schema_merges_with_the_view_name() {
        assert_eq!(
            TableIdentifier::from_quoted_content("d.INFORMATION_SCHEMA.TABLES"),
            ident(None, Some("d"), "INFORMATION_SCHEMA.TABLES")
        );
        assert_eq!(
            TableIdentifier::from_quoted_content("d.information_schema.COLUMNS"),
            ident(None, Some("d"), "information_schema.COLUMNS")
        );
        assert_eq!(
            TableIdentifier::from_quoted_content("INFORMATION_SCHEMA.SCHEMATA"),
            ident(None, None, "INFORMATION_SCHEMA.SCHEMATA")
        );
        assert_eq!(
            TableIdentifier::from_quoted_content("p.d.INFORMATION_SCHEMA.TABLES"),
            ident(Some("p"), Some("d"), "INFORMATION_SCHEMA.TABLES")
        );
    }

    #[test]
    fn test_from_quoted_content_splits_on_dots() {
        assert_eq!(
            TableIdentifier::from_quoted_content("p.d.t"),
            ident(Some("p"), Some("d"), "t")
        );
        assert_eq!(
            TableIdentifier::from_quoted_content("plain"),
            ident(None, None, "plain")
        );
    }

    #[test]
    fn test_lowered_lowercases_every_component() {
        let identifier = ident(Some("Proj"), Some("DataSet"), "TaBlE");
        assert_eq!(
            identifier.lowered(),
            ident(Some("proj"), Some("dataset"), "table")
        );
    }

    #[test]
    fn test_display_joins_present_components() {
        assert_eq!(ident(Some("p"), Some("d"), "t").to_string(), "p.d.t");
        assert_eq!(ident(None, Some("d"), "t").to_string(), "d.t");
        assert_eq!(ident(None, None, "t").to_string(), "t");
    }
}
