use std::collections::BTreeMap;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::error::{Error, Result};
use crate::schema::{format_column_name, ScalarKind};

/// Column name to value; `None` stands for NULL
pub type Row = BTreeMap<String, Option<String>>;

/// A normalized row ready for insertion
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedRow {
    /// 1-based line of the record in the source file
    pub line: u64,
    pub values: Row,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
}

impl SqlValue {
    /// Coerce a raw CSV value to `kind`. `None` when the text does not parse.
    pub fn coerce(raw: Option<&str>, kind: ScalarKind) -> Option<SqlValue> {
        let Some(raw) = raw else {
            return Some(SqlValue::Null);
        };
        match kind {
            ScalarKind::Integer => raw.trim().parse().ok().map(SqlValue::Integer),
            ScalarKind::Float => raw
                .trim()
                .parse::<f64>()
                .ok()
                .filter(|f| f.is_finite())
                .map(SqlValue::Real),
            ScalarKind::String => Some(SqlValue::Text(raw.to_string())),
        }
    }

    pub fn bind_to(&self, idx: usize, stmt: &mut rusqlite::Statement) -> rusqlite::Result<()> {
        match self {
            SqlValue::Null => stmt.raw_bind_parameter(idx, rusqlite::types::Null)?,
            SqlValue::Integer(i) => stmt.raw_bind_parameter(idx, i)?,
            SqlValue::Real(f) => stmt.raw_bind_parameter(idx, f)?,
            SqlValue::Text(s) => stmt.raw_bind_parameter(idx, s.as_str())?,
        }
        Ok(())
    }
}

/// Clean one raw CSV row:
/// - entries with an empty name are dropped (trailing delimiter artifacts)
/// - empty values become `None`
/// - names are rewritten with [`format_column_name`]
pub fn normalize<I, K, V>(raw: I) -> Row
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: Into<Option<String>>,
{
    raw.into_iter()
        .filter_map(|(key, value)| {
            let name = format_column_name(key.as_ref());
            if name.is_empty() {
                return None;
            }
            let value: Option<String> = value.into();
            let value = value.filter(|v| !v.is_empty());
            Some((name, value))
        })
        .collect()
}

fn open_csv(path: &Path) -> Result<csv::Reader<BufReader<File>>> {
    if !path.is_file() {
        return Err(Error::FileNotFound(path.to_path_buf()));
    }
    let file = File::open(path)?;
    Ok(csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(BufReader::new(file)))
}

/// First row of the file, as written
pub fn read_headers(path: &Path) -> Result<Vec<String>> {
    let mut reader = open_csv(path)?;
    let headers = reader.headers()?;
    if headers.is_empty() {
        return Err(Error::EmptyHeader(path.to_path_buf()));
    }
    Ok(headers.iter().map(String::from).collect())
}

/// Every data row of the file, normalized. Fields missing from short rows
/// are NULL; fields beyond the header are ignored.
pub fn read_rows(path: &Path) -> Result<Vec<ParsedRow>> {
    let mut reader = open_csv(path)?;
    let headers = reader.headers()?.clone();
    if headers.is_empty() {
        return Err(Error::EmptyHeader(path.to_path_buf()));
    }

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        let line = record.position().map(|p| p.line()).unwrap_or_default();
        let raw = headers
            .iter()
            .enumerate()
            .map(|(idx, header)| (header, record.get(idx).map(String::from)));
        rows.push(ParsedRow {
            line,
            values: normalize(raw),
        });
    }

    Ok(rows)
}
