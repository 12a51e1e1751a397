//! Statement text for the generic CRUD operations.
//!
//! Table and column names are interpolated, so each one passes
//! [`validate_identifier`] first. Values never appear here: inserts and
//! updates use `:column` named parameters, by-id lookups use `?1`.

use crate::error::{DatabaseError, Result};

/// Name of the primary key column every CRUD table is assumed to have.
pub const ID_COLUMN: &str = "id";

/// Accepts `[A-Za-z_][A-Za-z0-9_]*`.
pub fn validate_identifier(name: &str) -> Result<&str> {
    let mut chars = name.chars();
    let valid = match chars.next() {
        Some(first) => {
            (first.is_ascii_alphabetic() || first == '_')
                && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        None => false,
    };
    if valid {
        Ok(name)
    } else {
        Err(DatabaseError::InvalidIdentifier(name.to_string()))
    }
}

/// Named parameter for a column, as rusqlite expects it (with the `:` prefix).
pub fn param_name(column: &str) -> String {
    format!(":{column}")
}

fn validated_columns<'a>(columns: impl IntoIterator<Item = &'a str>) -> Result<Vec<&'a str>> {
    columns.into_iter().map(validate_identifier).collect()
}

pub fn insert<'a>(table: &str, columns: impl IntoIterator<Item = &'a str>) -> Result<String> {
    let table = validate_identifier(table)?;
    let columns = validated_columns(columns)?;
    if columns.is_empty() {
        return Ok(format!("INSERT INTO {table} DEFAULT VALUES"));
    }
    let placeholders: Vec<String> = columns.iter().map(|c| param_name(c)).collect();
    Ok(format!(
        "INSERT INTO {table} ({}) VALUES ({})",
        columns.join(", "),
        placeholders.join(", ")
    ))
}

pub fn select_by_id(table: &str) -> Result<String> {
    let table = validate_identifier(table)?;
    Ok(format!("SELECT * FROM {table} WHERE {ID_COLUMN} = ?1"))
}

pub fn exists_by_id(table: &str) -> Result<String> {
    let table = validate_identifier(table)?;
    Ok(format!("SELECT 1 FROM {table} WHERE {ID_COLUMN} = ?1"))
}

/// `columns` must not contain the id column; it is bound separately as `:id`.
pub fn update_by_id<'a>(table: &str, columns: impl IntoIterator<Item = &'a str>) -> Result<String> {
    let table = validate_identifier(table)?;
    let assignments: Vec<String> = validated_columns(columns)?
        .into_iter()
        .map(|c| format!("{c} = {}", param_name(c)))
        .collect();
    Ok(format!(
        "UPDATE {table} SET {} WHERE {ID_COLUMN} = {}",
        assignments.join(", "),
        param_name(ID_COLUMN)
    ))
}

pub fn delete_by_id(table: &str) -> Result<String> {
    let table = validate_identifier(table)?;
    Ok(format!("DELETE FROM {table} WHERE {ID_COLUMN} = ?1"))
}

pub fn count(table: &str) -> Result<String> {
    let table = validate_identifier(table)?;
    Ok(format!("SELECT COUNT(*) FROM {table}"))
}
