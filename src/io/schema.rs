//! Declared table schemas, bound to the header row once per table.

use crate::io::{Row, cell::Cell};

#[derive(Debug, thiserror::Error, Eq, PartialEq)]
pub enum SchemaError {
    #[error("no header row found")]
    NoHeader,

    #[error("missing fields: {}", .missing.join(", "))]
    MissingFields { missing: Vec<String> },
}

#[must_use]
#[derive(Clone, Debug)]
pub struct Schema {
    fields: Vec<String>,
}

/// Field-to-column mapping resolved from a header row.
#[must_use]
#[derive(Clone, Debug)]
pub struct Binding {
    pub header_row: usize,
    columns: Vec<usize>,
}

static EMPTY: Cell = Cell::Empty;

impl Schema {
    pub fn new<S: Into<String>>(fields: impl IntoIterator<Item = S>) -> Self {
        Self { fields: fields.into_iter().map(Into::into).collect() }
    }

    /// Bind the first non-empty row as the header.
    ///
    /// Fields match header cells by trimmed, case-insensitive equality. Every
    /// missing field is listed in the error.
    pub fn bind(&self, rows: &[Row]) -> Result<Binding, SchemaError> {
        let (header_row, header) = rows
            .iter()
            .enumerate()
            .find(|(_, row)| row.iter().any(|cell| !cell.is_empty()))
            .ok_or(SchemaError::NoHeader)?;
        let mut columns = Vec::with_capacity(self.fields.len());
        let mut missing = Vec::new();
        for field in &self.fields {
            let key = field.trim().to_lowercase();
            match header.iter().position(|cell| cell.normalized() == key) {
                Some(column) => columns.push(column),
                None => missing.push(field.clone()),
            }
        }
        if missing.is_empty() {
            Ok(Binding { header_row, columns })
        } else {
            Err(SchemaError::MissingFields { missing })
        }
    }
}

impl Binding {
    /// Cell of the field in the row, in schema order. Short rows give an empty cell.
    pub fn cell<'r>(&self, row: &'r [Cell], field: usize) -> &'r Cell {
        row.get(self.columns[field]).unwrap_or(&EMPTY)
    }
}
