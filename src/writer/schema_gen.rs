use crate::schema::{ColumnRole, TableSchema};

/// Double-quote an identifier for SQLite
pub fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// Generate CREATE TABLE SQL for a table schema
pub fn generate_create_table(schema: &TableSchema) -> String {
    let mut sql = format!("CREATE TABLE {} (\n", quote_ident(&schema.name));
    let mut columns = Vec::new();

    for col in &schema.columns {
        let key = match col.role {
            ColumnRole::PrimaryKey {
                auto_increment: true,
            } => " PRIMARY KEY AUTOINCREMENT",
            ColumnRole::PrimaryKey {
                auto_increment: false,
            } => " PRIMARY KEY",
            _ => "",
        };
        // an INTEGER PRIMARY KEY is the rowid and turns NULL into a fresh key
        let null_constraint = if !col.nullable && !col.is_synthetic() {
            " NOT NULL"
        } else {
            ""
        };

        columns.push(format!(
            "    {} {}{}{}",
            quote_ident(&col.name),
            col.kind.sql_type(),
            key,
            null_constraint
        ));
    }

    // Add foreign key constraints
    for col in &schema.columns {
        if let Some(fk) = col.foreign_key_ref() {
            columns.push(format!(
                "    FOREIGN KEY ({}) REFERENCES {}({})",
                quote_ident(&col.name),
                quote_ident(&fk.references_table),
                quote_ident(&fk.references_column)
            ));
        }
    }

    sql.push_str(&columns.join(",\n"));
    sql.push_str("\n)");

    sql
}

/// Generate CREATE INDEX statements for indexed columns
pub fn generate_indexes(schema: &TableSchema) -> Vec<String> {
    schema
        .columns
        .iter()
        .filter(|col| col.indexed)
        .map(|col| {
            format!(
                "CREATE INDEX {} ON {} ({})",
                quote_ident(&format!("ix_{}_{}", schema.name, col.name)),
                quote_ident(&schema.name),
                quote_ident(&col.name)
            )
        })
        .collect()
}

/// Generate the INSERT statement for the columns read from the CSV
pub fn generate_insert(schema: &TableSchema) -> String {
    let columns: Vec<String> = schema.data_columns().map(|c| quote_ident(&c.name)).collect();
    let placeholders: Vec<&str> = columns.iter().map(|_| "?").collect();
    format!(
        "INSERT INTO {} ({}) VALUES ({})",
        quote_ident(&schema.name),
        columns.join(", "),
        placeholders.join(", ")
    )
}
