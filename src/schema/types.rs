use std::fmt;

/// Declared length of string columns
pub const STRING_LENGTH: usize = 256;

/// Maximum length of a column name
pub const MAX_COLUMN_NAME_LENGTH: usize = 64;

/// Name of the synthetic primary key on secondary tables
pub const SYNTHETIC_ID: &str = "id";

/// Underlying scalar kind of a column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScalarKind {
    Integer,
    Float,
    /// Bounded string, `VARCHAR(STRING_LENGTH)`
    String,
}

impl ScalarKind {
    pub fn sql_type(&self) -> String {
        match self {
            ScalarKind::Integer => "INTEGER".to_string(),
            ScalarKind::Float => "FLOAT".to_string(),
            ScalarKind::String => format!("VARCHAR({})", STRING_LENGTH),
        }
    }
}

impl fmt::Display for ScalarKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScalarKind::Integer => write!(f, "integer"),
            ScalarKind::Float => write!(f, "float"),
            ScalarKind::String => write!(f, "string"),
        }
    }
}

/// Foreign key reference
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForeignKey {
    pub references_table: String,
    pub references_column: String,
}

/// What a column means to the table it belongs to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColumnRole {
    Plain,
    PrimaryKey {
        /// Synthetic key filled in by the database
        auto_increment: bool,
    },
    ForeignKey(ForeignKey),
}

/// Column definition
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub kind: ScalarKind,
    pub nullable: bool,
    pub indexed: bool,
    pub role: ColumnRole,
}

impl Column {
    /// Create an optional (nullable) plain column
    pub fn new(name: impl Into<String>, kind: ScalarKind) -> Self {
        Self {
            name: name.into(),
            kind,
            nullable: true,
            indexed: false,
            role: ColumnRole::Plain,
        }
    }

    /// Integer primary key holding the values read from the CSV
    pub fn primary_key(name: impl Into<String>) -> Self {
        Self {
            nullable: false,
            role: ColumnRole::PrimaryKey {
                auto_increment: false,
            },
            ..Self::new(name, ScalarKind::Integer)
        }
    }

    /// Auto-increment `id` primary key added to secondary tables
    pub fn synthetic_id() -> Self {
        Self {
            nullable: false,
            role: ColumnRole::PrimaryKey {
                auto_increment: true,
            },
            ..Self::new(SYNTHETIC_ID, ScalarKind::Integer)
        }
    }

    /// Required integer column referencing another table's column
    pub fn foreign_key(
        name: impl Into<String>,
        references_table: impl Into<String>,
        references_column: impl Into<String>,
    ) -> Self {
        Self {
            nullable: false,
            role: ColumnRole::ForeignKey(ForeignKey {
                references_table: references_table.into(),
                references_column: references_column.into(),
            }),
            ..Self::new(name, ScalarKind::Integer)
        }
    }

    pub fn indexed(self) -> Self {
        Self {
            indexed: true,
            ..self
        }
    }

    pub fn is_primary_key(&self) -> bool {
        matches!(self.role, ColumnRole::PrimaryKey { .. })
    }

    /// Whether values for this column come from the CSV
    pub fn is_synthetic(&self) -> bool {
        matches!(
            self.role,
            ColumnRole::PrimaryKey {
                auto_increment: true
            }
        )
    }

    pub fn foreign_key_ref(&self) -> Option<&ForeignKey> {
        match &self.role {
            ColumnRole::ForeignKey(fk) => Some(fk),
            _ => None,
        }
    }
}

/// Whether a table is the canonical primary table or references it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableRole {
    Primary,
    Secondary,
}

/// Table schema definition
#[derive(Debug, Clone, PartialEq)]
pub struct TableSchema {
    pub name: String,
    pub columns: Vec<Column>,
}

impl TableSchema {
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn primary_key(&self) -> Option<&Column> {
        self.columns.iter().find(|c| c.is_primary_key())
    }

    /// Columns whose values are read from the CSV, in table order
    pub fn data_columns(&self) -> impl Iterator<Item = &Column> {
        self.columns.iter().filter(|c| !c.is_synthetic())
    }

    /// Tables this table depends on (FK parents)
    pub fn dependencies(&self) -> Vec<&str> {
        self.columns
            .iter()
            .filter_map(|c| c.foreign_key_ref())
            .map(|fk| fk.references_table.as_str())
            .collect()
    }
}
