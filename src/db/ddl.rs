//! SQL text for replacing a table
//!
//! Every identifier is double-quoted so table and column names taken from
//! filenames and headers are used exactly as given.

use crate::db::types::ColumnDef;

/// Quote an identifier, doubling embedded quotes.
pub fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

pub fn drop_table_sql(table: &str) -> String {
    format!("DROP TABLE IF EXISTS {}", quote_ident(table))
}

pub fn create_table_sql(table: &str, columns: &[ColumnDef]) -> String {
    let cols: Vec<String> = columns
        .iter()
        .map(|c| format!("{} {}", quote_ident(&c.name), c.data_type.sql_name()))
        .collect();
    format!("CREATE TABLE {} ({})", quote_ident(table), cols.join(", "))
}

pub fn copy_in_sql(table: &str, columns: &[ColumnDef]) -> String {
    let cols: Vec<String> = columns.iter().map(|c| quote_ident(&c.name)).collect();
    format!(
        "COPY {} ({}) FROM STDIN (FORMAT binary)",
        quote_ident(table),
        cols.join(", ")
    )
}

pub fn create_database_sql(database: &str) -> String {
    format!("CREATE DATABASE {}", quote_ident(database))
}
