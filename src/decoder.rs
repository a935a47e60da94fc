//! Table decoding.
//!
//! The first line is the header: it fixes the logical line length and the
//! column spans. Every following line must have exactly that length; its
//! columns are sliced out, trimmed, and handed to the record codec.
//!
//! ```
//! use fixed_width::{Record, SchemaBuilder};
//!
//! #[derive(Debug, Default, PartialEq)]
//! struct Stock {
//!     item: String,
//!     qty: u16,
//! }
//!
//! impl Record for Stock {
//!     fn describe(schema: SchemaBuilder<Self>) -> SchemaBuilder<Self> {
//!         schema
//!             .field("Item", |s| &s.item, |s| &mut s.item)
//!             .field("Qty", |s| &s.qty, |s| &mut s.qty)
//!     }
//! }
//!
//! let rows: Vec<Stock> = fixed_width::from_str("Item  Qty\nbolts 12 \nnuts  7  ").unwrap();
//! assert_eq!(rows[1], Stock { item: "nuts".into(), qty: 7 });
//! ```

use std::io::{BufRead, BufReader, Read};

use tracing::{debug, trace};

use crate::error::CodecError;
use crate::header::{Column, resolve_header_columns};
use crate::record::{RawFieldIndex, build_record};
use crate::schema::{Record, Row};

/// Where the line scanner is in the table.
#[derive(Debug)]
enum ScanState<'n> {
    AwaitHeader,
    ReadingRows {
        columns: Vec<Column>,
        spans: Vec<(&'n str, usize, usize)>,
        line_len: usize,
    },
}

/// Walks a table line by line: header first, then length-checked rows.
#[derive(Debug)]
pub(crate) struct LineScanner<'n> {
    names: &'n [&'n str],
    state: ScanState<'n>,
}

impl<'n> LineScanner<'n> {
    pub(crate) fn new(names: &'n [&'n str]) -> Self {
        Self {
            names,
            state: ScanState::AwaitHeader,
        }
    }

    /// Feed line `line_no` (1-based). The header yields `None`; each data
    /// line yields its trimmed cells.
    pub(crate) fn feed<'l>(
        &mut self,
        line_no: usize,
        line: &'l str,
    ) -> Result<Option<RawFieldIndex<'l>>, CodecError>
    where
        'n: 'l,
    {
        match &self.state {
            ScanState::AwaitHeader => {
                let line_len = line.chars().count();
                let columns = resolve_header_columns(line, self.names)?;
                let spans = columns
                    .iter()
                    .filter_map(|c| {
                        let name = self.names.iter().find(|n| **n == c.name)?;
                        Some((*name, c.start, c.end))
                    })
                    .collect();
                trace!(line_len, "parsed header");
                self.state = ScanState::ReadingRows {
                    columns,
                    spans,
                    line_len,
                };
                Ok(None)
            }
            ScanState::ReadingRows {
                spans, line_len, ..
            } => {
                // Byte offset of every character boundary, plus the end.
                let bounds: Vec<usize> = line
                    .char_indices()
                    .map(|(i, _)| i)
                    .chain(std::iter::once(line.len()))
                    .collect();
                let actual = bounds.len() - 1;
                if actual != *line_len {
                    return Err(CodecError::LineLength {
                        line: line_no,
                        expected: *line_len,
                        actual,
                    });
                }

                let cells = spans
                    .iter()
                    .map(|&(name, start, end)| (name, line[bounds[start]..bounds[end]].trim()))
                    .collect();
                Ok(Some(cells))
            }
        }
    }

    /// Columns resolved from the header, empty until the header is seen.
    pub(crate) fn columns(&self) -> &[Column] {
        match &self.state {
            ScanState::AwaitHeader => &[],
            ScanState::ReadingRows { columns, .. } => columns,
        }
    }
}

/// Decode a table held in a string.
///
/// The target must be a sequence of records. A scalar element type is
/// rejected when the call is compiled:
///
/// ```compile_fail
/// let numbers: Vec<i32> = fixed_width::from_str("Int\n5").unwrap();
/// ```
pub fn from_str<T: Row>(input: &str) -> Result<Vec<T>, CodecError> {
    from_reader(input.as_bytes())
}

/// Decode a table from raw bytes.
pub fn from_slice<T: Row>(input: &[u8]) -> Result<Vec<T>, CodecError> {
    from_reader(input)
}

/// Decode a table from any reader.
pub fn from_reader<T: Row, Rd: Read>(reader: Rd) -> Result<Vec<T>, CodecError> {
    let mut rows = Vec::new();
    read_into(BufReader::new(reader), &mut rows)?;
    Ok(rows)
}

/// Decode a table into `target`, replacing whatever it held.
///
/// `target` is cleared before any input is read and is left empty if
/// decoding fails.
pub fn read_into<T: Row, B: BufRead>(reader: B, target: &mut Vec<T>) -> Result<(), CodecError> {
    target.clear();
    let schema = T::Record::schema();
    schema.ensure_usable()?;

    let names = schema.column_names();
    let mut scanner = LineScanner::new(&names);
    let mut rows = Vec::new();

    for (idx, line) in reader.lines().enumerate() {
        let line_no = idx + 1;
        let line = line.map_err(CodecError::Read)?;
        let Some(cells) = scanner.feed(line_no, &line)? else {
            continue;
        };
        let record = build_record(&cells, &schema).map_err(|source| CodecError::Decode {
            line: line_no,
            source,
        })?;
        rows.push(T::from_record(record));
    }

    debug!(rows = rows.len(), "decoded fixed-width table");
    *target = rows;
    Ok(())
}

/// Column layout and size of a table, without decoding any values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableLayout {
    pub columns: Vec<Column>,
    pub line_len: usize,
    pub rows: usize,
}

/// Resolve `names` against the header of a table and check that every
/// data line has the header's length.
pub fn inspect<B: BufRead, S: AsRef<str>>(reader: B, names: &[S]) -> Result<TableLayout, CodecError> {
    let names: Vec<&str> = names.iter().map(|n| n.as_ref()).collect();
    let mut scanner = LineScanner::new(&names);
    let mut line_len = 0;
    let mut rows = 0;

    for (idx, line) in reader.lines().enumerate() {
        let line = line.map_err(CodecError::Read)?;
        if idx == 0 {
            line_len = line.chars().count();
        }
        if scanner.feed(idx + 1, &line)?.is_some() {
            rows += 1;
        }
    }

    Ok(TableLayout {
        columns: scanner.columns().to_vec(),
        line_len,
        rows,
    })
}
