//! Fixed catalog of column types a user can pick for a CSV header

use super::types::{Column, ScalarKind};

pub const INTEGER: &str = "1";
pub const FLOAT: &str = "2";
pub const STRING: &str = "3";
pub const INTEGER_WITH_INDEX: &str = "4";
pub const FLOAT_WITH_INDEX: &str = "5";
pub const STRING_WITH_INDEX: &str = "6";

/// One selectable column type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnTypeDescriptor {
    pub code: &'static str,
    pub label: &'static str,
    pub kind: ScalarKind,
    pub indexed: bool,
}

impl ColumnTypeDescriptor {
    const fn new(code: &'static str, label: &'static str, kind: ScalarKind, indexed: bool) -> Self {
        Self {
            code,
            label,
            kind,
            indexed,
        }
    }

    /// Prompt line for this choice, e.g. `3. String? (Select 3)`
    pub fn question(&self) -> String {
        format!("{code}. {label}? (Select {code})", code = self.code, label = self.label)
    }

    /// Build a column of this type under `name`
    pub fn as_column(&self, name: impl Into<String>) -> Column {
        let column = Column::new(name, self.kind);
        if self.indexed {
            column.indexed()
        } else {
            column
        }
    }
}

/// Catalog in presentation order
pub static CATALOG: [ColumnTypeDescriptor; 6] = [
    ColumnTypeDescriptor::new(INTEGER, "Integer", ScalarKind::Integer, false),
    ColumnTypeDescriptor::new(FLOAT, "Float", ScalarKind::Float, false),
    ColumnTypeDescriptor::new(STRING, "String", ScalarKind::String, false),
    ColumnTypeDescriptor::new(INTEGER_WITH_INDEX, "Integer with index", ScalarKind::Integer, true),
    ColumnTypeDescriptor::new(FLOAT_WITH_INDEX, "Float with index", ScalarKind::Float, true),
    ColumnTypeDescriptor::new(STRING_WITH_INDEX, "String with index", ScalarKind::String, true),
];

pub fn lookup(code: &str) -> Option<&'static ColumnTypeDescriptor> {
    let code = code.trim();
    CATALOG.iter().find(|d| d.code == code)
}

pub fn describe(code: &str) -> Option<String> {
    lookup(code).map(|d| d.question())
}

/// Resolve a code into a column named `target_name`
pub fn resolve(code: &str, target_name: &str) -> Option<Column> {
    lookup(code).map(|d| d.as_column(target_name))
}

/// All choices, one question per line
pub fn choices() -> String {
    CATALOG
        .iter()
        .map(|d| format!("{}\n", d.question()))
        .collect()
}
