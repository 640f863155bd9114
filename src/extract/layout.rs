use crate::{
    extract::template::SettlementTemplate,
    io::{Row, cell::Cell, schema::SchemaError},
};

/// Subject and field columns found in a bill header.
#[must_use]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct HeaderLayout {
    pub header_row: usize,
    pub subject_column: usize,

    /// Column of each template field, in template order.
    pub field_columns: Vec<usize>,
}

impl HeaderLayout {
    /// Locate the first row naming the subject column and at least one field.
    ///
    /// Header cells match keywords by containment. A field takes the first
    /// column not claimed by an earlier field.
    pub fn locate(template: &SettlementTemplate, rows: &[Row]) -> Result<Self, SchemaError> {
        let subject_keyword = template.subject_keyword.to_lowercase();
        for (header_row, row) in rows.iter().enumerate() {
            let header = row.iter().map(Cell::normalized).collect::<Vec<_>>();
            let Some(subject_column) = header.iter().position(|cell| cell.contains(&subject_keyword))
            else {
                continue;
            };
            let mut claimed = vec![subject_column];
            let mut missing = Vec::new();
            for field in &template.fields {
                let keywords =
                    field.keywords.iter().map(|keyword| keyword.to_lowercase()).collect::<Vec<_>>();
                let column = header.iter().enumerate().position(|(column, cell)| {
                    !claimed.contains(&column)
                        && !cell.is_empty()
                        && keywords.iter().any(|keyword| cell.contains(keyword.as_str()))
                });
                match column {
                    Some(column) => claimed.push(column),
                    None => missing.push(field.name.clone()),
                }
            }
            if claimed.len() == 1 {
                continue;
            }
            if !missing.is_empty() {
                return Err(SchemaError::MissingFields { missing });
            }
            return Ok(Self { header_row, subject_column, field_columns: claimed.split_off(1) });
        }
        Err(SchemaError::NoHeader)
    }
}
