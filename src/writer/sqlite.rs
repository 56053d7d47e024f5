use std::path::Path;

use log::{debug, info};
use rusqlite::{Connection, OptionalExtension};

use super::schema_gen::{generate_create_table, generate_indexes, generate_insert, quote_ident};
use crate::error::{Error, Result};
use crate::parser::{ParsedRow, SqlValue};
use crate::schema::TableSchema;

/// Database session shared by every table manager of a run
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open (creating if needed) the database file at `db_path`
    pub fn open(db_path: &Path) -> Result<Self> {
        if let Some(parent) = db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        info!("Opening database {:?}", db_path);
        Self::configure(Connection::open(db_path)?)
    }

    pub fn open_in_memory() -> Result<Self> {
        Self::configure(Connection::open_in_memory()?)
    }

    fn configure(conn: Connection) -> Result<Self> {
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        Ok(Self { conn })
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    pub fn table_exists(&self, name: &str) -> Result<bool> {
        let found = self
            .conn
            .query_row(
                "SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1",
                [name],
                |_| Ok(()),
            )
            .optional()?;
        Ok(found.is_some())
    }

    /// User tables, sorted by name
    pub fn table_names(&self) -> Result<Vec<String>> {
        let mut stmt = self.conn.prepare(
            "SELECT name FROM sqlite_master
             WHERE type = 'table' AND name NOT LIKE 'sqlite_%'
             ORDER BY name",
        )?;
        let names = stmt
            .query_map([], |row| row.get(0))?
            .collect::<rusqlite::Result<Vec<String>>>()?;
        Ok(names)
    }

    /// Create the table and its indexes. Fails if the name is taken.
    pub fn create_table(&self, schema: &TableSchema) -> Result<()> {
        if self.table_exists(&schema.name)? {
            return Err(Error::DuplicateTable {
                table: schema.name.clone(),
            });
        }

        let sql = generate_create_table(schema);
        debug!("{}", sql);
        self.conn.execute(&sql, [])?;

        for index_sql in generate_indexes(schema) {
            debug!("{}", index_sql);
            self.conn.execute(&index_sql, [])?;
        }

        info!(
            "Created table {} with {} columns",
            schema.name,
            schema.columns.len()
        );
        Ok(())
    }

    /// Insert all rows in one transaction. A value that does not coerce to
    /// its column's kind, or a missing value in a non-nullable column,
    /// aborts the whole batch.
    pub fn insert_rows(&mut self, schema: &TableSchema, rows: &[ParsedRow]) -> Result<u64> {
        let insert_sql = generate_insert(schema);
        debug!("{}", insert_sql);
        let columns: Vec<_> = schema.data_columns().collect();

        let tx = self.conn.transaction()?;
        {
            let mut stmt = tx.prepare_cached(&insert_sql)?;
            for row in rows {
                for (idx, col) in columns.iter().enumerate() {
                    let raw = row.values.get(&col.name).and_then(|v| v.as_deref());
                    let value = SqlValue::coerce(raw, col.kind)
                        .filter(|value| col.nullable || *value != SqlValue::Null)
                        .ok_or_else(|| Error::MalformedRow {
                            line: row.line,
                            column: col.name.clone(),
                            value: raw.unwrap_or_default().to_string(),
                            kind: col.kind,
                        })?;
                    value.bind_to(idx + 1, &mut stmt)?;
                }
                stmt.raw_execute()?;
            }
        }
        tx.commit()?;

        info!("Inserted {} rows into {}", rows.len(), schema.name);
        Ok(rows.len() as u64)
    }

    pub fn count_rows(&self, table: &str) -> Result<u64> {
        let sql = format!("SELECT COUNT(*) FROM {}", quote_ident(table));
        let count: i64 = self.conn.query_row(&sql, [], |row| row.get(0))?;
        Ok(count as u64)
    }
}
