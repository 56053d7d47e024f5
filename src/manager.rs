//! Lifecycle of one imported table: schema, creation, load, insert

use std::path::{Path, PathBuf};

use log::info;

use crate::chooser::Chooser;
use crate::error::{Error, Result};
use crate::parser::{read_headers, read_rows};
use crate::schema::{HeaderClassifier, TableRole, TableSchema};
use crate::settings::Settings;
use crate::writer::Database;

/// Imports one CSV file into one table.
///
/// A primary manager keys its table on the identity column. A secondary
/// manager adds a synthetic `id` key and turns the identity column into a
/// foreign key to the primary table; only construct one once the primary
/// table exists (see [`crate::populator::Populator::require_primary`]).
pub struct TableManager<'a> {
    db: &'a mut Database,
    classifier: HeaderClassifier,
    file: PathBuf,
    table_name: String,
    role: TableRole,
    schema: Option<TableSchema>,
}

impl<'a> TableManager<'a> {
    pub fn primary(db: &'a mut Database, settings: &Settings, file: impl Into<PathBuf>) -> Self {
        let table_name = settings.primary_table.clone();
        Self::new(db, settings, file, table_name, TableRole::Primary)
    }

    pub fn secondary(
        db: &'a mut Database,
        settings: &Settings,
        file: impl Into<PathBuf>,
        table_name: impl Into<String>,
    ) -> Self {
        Self::new(db, settings, file, table_name.into(), TableRole::Secondary)
    }

    fn new(
        db: &'a mut Database,
        settings: &Settings,
        file: impl Into<PathBuf>,
        table_name: String,
        role: TableRole,
    ) -> Self {
        Self {
            db,
            classifier: HeaderClassifier::new(&settings.primary_table, &settings.identity_header),
            file: file.into(),
            table_name,
            role,
            schema: None,
        }
    }

    pub fn table_name(&self) -> &str {
        &self.table_name
    }

    pub fn file(&self) -> &Path {
        &self.file
    }

    pub fn role(&self) -> TableRole {
        self.role
    }

    /// Schema of the table, once created by this manager
    pub fn schema(&self) -> Option<&TableSchema> {
        self.schema.as_ref()
    }

    /// Derive the schema from the CSV headers
    pub fn build_schema(&self, chooser: &mut dyn Chooser) -> Result<TableSchema> {
        let headers = read_headers(&self.file)?;
        self.classifier
            .build_schema(&self.table_name, &headers, self.role, chooser)
    }

    /// Build the schema and create the table. Fails with
    /// [`Error::DuplicateTable`] before asking anything if the name is taken.
    pub fn create_table(&mut self, chooser: &mut dyn Chooser) -> Result<&TableSchema> {
        let schema = self.create(chooser)?;
        Ok(self.schema.insert(schema))
    }

    fn create(&mut self, chooser: &mut dyn Chooser) -> Result<TableSchema> {
        if self.db.table_exists(&self.table_name)? {
            return Err(Error::DuplicateTable {
                table: self.table_name.clone(),
            });
        }
        let schema = self.build_schema(chooser)?;
        self.db.create_table(&schema)?;
        Ok(schema)
    }

    /// Create the table if this manager has not yet, then insert every row
    /// of the CSV in one batch. Returns the number of rows inserted.
    pub fn populate_table(&mut self, chooser: &mut dyn Chooser) -> Result<u64> {
        let schema = match self.schema.take() {
            Some(schema) => schema,
            None => self.create(chooser)?,
        };
        let schema = self.schema.insert(schema);

        let rows = read_rows(&self.file)?;
        let count = self.db.insert_rows(schema, &rows)?;
        info!("{:?} -> {}: {} rows", self.file, self.table_name, count);
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chooser::{FixedColumnType, ScriptedChooser};
    use crate::schema::SYNTHETIC_ID;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const FIXTURE: &str = "UnitID,Institution Name,Enrollment (Fall 2016),\n\
                           1,A University,100,\n\
                           2,B University,,\n\
                           3,C University,30,\n";

    fn fixture() -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(FIXTURE.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_primary_manager_creates_table_keyed_on_identity() {
        let file = fixture();
        let settings = Settings::default();
        let mut db = Database::open_in_memory().unwrap();
        let mut chooser = FixedColumnType::new("1");

        let mut manager = TableManager::primary(&mut db, &settings, file.path());
        let schema = manager.create_table(&mut chooser).unwrap();
        assert_eq!(schema.name, "school");
        let names: Vec<_> = schema.columns.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["UnitID", "Institution_Name", "Enrollment_Fall_2016"]);
        assert_eq!(schema.primary_key().unwrap().name, "UnitID");

        let err = manager.populate_table(&mut chooser).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Line 2: value \"A University\" in column Institution_Name is not a valid integer"
        );
        assert_eq!(db.count_rows("school").unwrap(), 0);
    }

    #[test]
    fn test_populate_creates_table_lazily() {
        let file = fixture();
        let settings = Settings::default();
        let mut db = Database::open_in_memory().unwrap();
        let mut chooser = FixedColumnType::new("3");

        let count = TableManager::primary(&mut db, &settings, file.path())
            .populate_table(&mut chooser)
            .unwrap();
        assert_eq!(count, 3);

        let mut manager = TableManager::secondary(&mut db, &settings, file.path(), "enrollment");
        assert_eq!(manager.populate_table(&mut chooser).unwrap(), 3);
        let schema = manager.schema().unwrap();
        assert_eq!(schema.columns[0].name, SYNTHETIC_ID);
        assert_eq!(schema.columns.len(), 4);
        assert_eq!(db.count_rows("enrollment").unwrap(), 3);
    }

    #[test]
    fn test_create_existing_table_fails_before_asking() {
        let file = fixture();
        let settings = Settings::default();
        let mut db = Database::open_in_memory().unwrap();

        TableManager::primary(&mut db, &settings, file.path())
            .populate_table(&mut FixedColumnType::new("3"))
            .unwrap();

        let mut chooser = ScriptedChooser::default();
        let mut manager = TableManager::primary(&mut db, &settings, file.path());
        let result = manager.create_table(&mut chooser);
        assert!(matches!(result, Err(Error::DuplicateTable { .. })));
        assert!(chooser.asked.is_empty());
    }
}
