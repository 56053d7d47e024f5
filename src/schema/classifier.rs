//! Turning CSV headers into column definitions

use log::{debug, warn};

use super::catalog::{self, CATALOG};
use super::types::{Column, TableRole, TableSchema, MAX_COLUMN_NAME_LENGTH};
use crate::chooser::Chooser;
use crate::error::{Error, Result};

/// Schema-safe column name: at most 64 characters, spaces become `_`,
/// parentheses are dropped
pub fn format_column_name(name: &str) -> String {
    name.chars()
        .take(MAX_COLUMN_NAME_LENGTH)
        .filter(|c| *c != '(' && *c != ')')
        .map(|c| if c == ' ' { '_' } else { c })
        .collect()
}

/// Resolves headers to columns, treating the identity header specially
#[derive(Debug, Clone)]
pub struct HeaderClassifier {
    primary_table: String,
    identity_header: String,
}

impl HeaderClassifier {
    pub fn new(primary_table: impl Into<String>, identity_header: impl Into<String>) -> Self {
        Self {
            primary_table: primary_table.into(),
            identity_header: identity_header.into(),
        }
    }

    pub fn identity_header(&self) -> &str {
        &self.identity_header
    }

    pub fn primary_table(&self) -> &str {
        &self.primary_table
    }

    pub fn classify(
        &self,
        header: &str,
        role: TableRole,
        chooser: &mut dyn Chooser,
    ) -> Result<Column> {
        if header == self.identity_header {
            return Ok(match role {
                TableRole::Primary => Column::primary_key(format_column_name(header)),
                TableRole::Secondary => Column::foreign_key(
                    format_column_name(header),
                    &self.primary_table,
                    format_column_name(&self.identity_header),
                ),
            });
        }

        loop {
            let code = chooser.choose_column_type(header, &CATALOG)?;
            match catalog::resolve(&code, &format_column_name(header)) {
                Some(column) => {
                    debug!("{} -> {} (indexed: {})", header, column.kind, column.indexed);
                    return Ok(column);
                }
                None => warn!("{:?} is not a valid column type for {}", code, header),
            }
        }
    }

    /// Classify every header with a non-empty column name, in order.
    /// Secondary tables get the synthetic `id` primary key first. Fails
    /// before asking anything when the identity header is missing.
    pub fn build_schema(
        &self,
        table_name: &str,
        headers: &[String],
        role: TableRole,
        chooser: &mut dyn Chooser,
    ) -> Result<TableSchema> {
        if !headers.iter().any(|h| *h == self.identity_header) {
            return Err(Error::MissingIdentityHeader {
                table: table_name.to_string(),
                header: self.identity_header.clone(),
            });
        }

        let mut columns = Vec::with_capacity(headers.len() + 1);
        if role == TableRole::Secondary {
            columns.push(Column::synthetic_id());
        }

        for header in headers
            .iter()
            .filter(|h| !format_column_name(h).is_empty())
        {
            columns.push(self.classify(header, role, chooser)?);
        }

        Ok(TableSchema {
            name: table_name.to_string(),
            columns,
        })
    }
}
