//! Assembling and rendering a single record.

use std::collections::HashMap;

use crate::error::FieldError;
use crate::header::ColumnWidths;
use crate::schema::{Record, Schema};

/// Trimmed cell text of one line, keyed by column name.
pub type RawFieldIndex<'a> = HashMap<&'a str, &'a str>;

/// Build one record from the cells of a line.
///
/// Fields whose column is absent keep their default value. The first field
/// that fails to decode aborts the record.
pub fn build_record<R: Record>(cells: &RawFieldIndex<'_>, schema: &Schema<R>) -> Result<R, FieldError> {
    let mut record = R::default();
    for field in schema.fields() {
        let Some(raw) = cells.get(field.descriptor().column()) else {
            continue;
        };
        field.decode(&mut record, raw)?;
    }
    Ok(record)
}

/// Rendered cell text for each field, in field order. `None` marks a field
/// without a value.
pub fn render_cells<R: Record>(record: &R, schema: &Schema<R>) -> Result<Vec<Option<String>>, FieldError> {
    schema.fields().iter().map(|field| field.encode(record)).collect()
}

/// Render one data line: every cell left-justified to its column width and
/// separated by a single space. A missing record renders as blanks.
pub fn render_record<R: Record>(
    record: Option<&R>,
    schema: &Schema<R>,
    widths: &ColumnWidths,
) -> Result<String, FieldError> {
    let cells = match record {
        Some(record) => render_cells(record, schema)?,
        None => vec![None; schema.len()],
    };

    let mut line = String::new();
    for (i, (field, cell)) in schema.fields().iter().zip(cells).enumerate() {
        if i > 0 {
            line.push(' ');
        }
        let width = widths.get(field.descriptor().column());
        pad_into(&mut line, cell.as_deref().unwrap_or(""), width);
    }
    Ok(line)
}

/// Append `text` left-justified in `width` characters.
pub(crate) fn pad_into(line: &mut String, text: &str, width: usize) {
    line.push_str(text);
    let len = text.chars().count();
    if len < width {
        line.extend(std::iter::repeat_n(' ', width - len));
    }
}
