//! Table encoding.
//!
//! Encoding makes two passes over the rows. The first renders every cell to
//! learn each column's width (never narrower than the column name); the
//! second writes the header and the rows, each cell left-justified to its
//! column width and separated by one space. Lines are joined by `\n` with
//! no newline after the last one.

use std::io::Write;

use tracing::debug;

use crate::error::CodecError;
use crate::header::ColumnWidths;
use crate::record::{pad_into, render_cells, render_record};
use crate::schema::{Record, Row, Schema};

/// Encode rows into a string.
pub fn to_string<T: Row>(rows: &[T]) -> Result<String, CodecError> {
    let bytes = to_vec(rows)?;
    // Every cell is a Rust string, so the output is valid UTF-8.
    String::from_utf8(bytes).map_err(|e| CodecError::Write(std::io::Error::other(e)))
}

/// Encode rows into a byte vector.
pub fn to_vec<T: Row>(rows: &[T]) -> Result<Vec<u8>, CodecError> {
    let mut out = Vec::new();
    to_writer(&mut out, rows)?;
    Ok(out)
}

/// Encode rows into `writer`.
///
/// Width computation finishes before anything is written, so a cell that
/// fails to render leaves the writer untouched. A failed write leaves it
/// holding a partial table.
pub fn to_writer<W: Write, T: Row>(mut writer: W, rows: &[T]) -> Result<(), CodecError> {
    let schema = T::Record::schema();
    schema.ensure_usable()?;

    let widths = column_widths(&schema, rows)?;
    debug!(rows = rows.len(), columns = schema.len(), "encoding fixed-width table");

    let mut header = String::new();
    for (i, name) in schema.column_names().into_iter().enumerate() {
        if i > 0 {
            header.push(' ');
        }
        pad_into(&mut header, name, widths.get(name));
    }
    writer.write_all(header.as_bytes()).map_err(CodecError::Write)?;

    for (row, item) in rows.iter().enumerate() {
        let line = render_record(item.record(), &schema, &widths)
            .map_err(|source| CodecError::Encode { row, source })?;
        writer.write_all(b"\n").map_err(CodecError::Write)?;
        writer.write_all(line.as_bytes()).map_err(CodecError::Write)?;
    }

    writer.flush().map_err(CodecError::Write)
}

/// First pass: widest rendering of every column. Missing rows add nothing.
fn column_widths<R: Record, T: Row<Record = R>>(
    schema: &Schema<R>,
    rows: &[T],
) -> Result<ColumnWidths, CodecError> {
    let mut widths = ColumnWidths::new(&schema.column_names());
    for (row, item) in rows.iter().enumerate() {
        let Some(record) = item.record() else {
            continue;
        };
        let cells = render_cells(record, schema).map_err(|source| CodecError::Encode { row, source })?;
        for (field, cell) in schema.fields().iter().zip(cells) {
            let width = cell.map_or(0, |c| c.chars().count());
            widths.observe(field.descriptor().column(), width);
        }
    }
    Ok(widths)
}
