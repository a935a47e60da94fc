//! Column discovery.
//!
//! On decode, column spans come from the header line: each column name is
//! located as the pattern `(<name> *)`, so a column extends over the
//! padding that follows its name. On encode, each column's width is the
//! widest of its name and every rendered cell.

use std::collections::HashMap;

use regex::Regex;
use tracing::debug;

use crate::error::CodecError;

/// A named character span of every line in a table.
///
/// Offsets count characters, not bytes. `end` is exclusive and includes
/// the padding after the column name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    pub name: String,
    pub start: usize,
    pub end: usize,
}

impl Column {
    pub fn width(&self) -> usize {
        self.end - self.start
    }

    fn overlaps(&self, start: usize, end: usize) -> bool {
        start < self.end && self.start < end
    }
}

/// Locate each named column in a header line.
///
/// Names are matched longest first, and a match that overlaps a column
/// already claimed is skipped in favour of the next occurrence, so `Int`
/// never lands inside `Int8`. Names absent from the header are left out of
/// the result. The returned columns are ordered by position.
///
/// Each name is used as a regular expression, not escaped. A name with
/// metacharacters either fails to compile (a `Pattern` error) or matches
/// different header text, in which case the column is simply not found.
pub fn resolve_header_columns<S: AsRef<str>>(
    header: &str,
    names: &[S],
) -> Result<Vec<Column>, CodecError> {
    let mut ordered: Vec<&str> = Vec::with_capacity(names.len());
    for name in names {
        let name = name.as_ref();
        if !ordered.contains(&name) {
            ordered.push(name);
        }
    }
    // Stable, so equal lengths keep declaration order.
    ordered.sort_by_key(|name| std::cmp::Reverse(name.chars().count()));

    let mut columns: Vec<Column> = Vec::with_capacity(ordered.len());
    for name in ordered {
        let pattern = Regex::new(&format!("({name} *)")).map_err(|e| CodecError::Pattern {
            column: name.to_string(),
            source: Box::new(e),
        })?;

        match find_unclaimed(&pattern, header, &columns) {
            Some(column) => columns.push(Column {
                name: name.to_string(),
                ..column
            }),
            None => debug!(column = name, "column not found in header, skipping"),
        }
    }

    columns.sort_by_key(|c| c.start);
    debug!(columns = columns.len(), "resolved header columns");
    Ok(columns)
}

/// First match of `pattern` in `header` that does not overlap `claimed`.
fn find_unclaimed(pattern: &Regex, header: &str, claimed: &[Column]) -> Option<Column> {
    let mut from = 0;
    while from <= header.len() {
        let found = pattern.find_at(header, from)?;
        let start = header[..found.start()].chars().count();
        let end = start + found.as_str().chars().count();
        if end > start && !claimed.iter().any(|c| c.overlaps(start, end)) {
            return Some(Column {
                name: String::new(),
                start,
                end,
            });
        }
        // Retry one character past this match's start.
        from = found.start()
            + header[found.start()..]
                .chars()
                .next()
                .map_or(1, char::len_utf8);
    }
    None
}

/// Per-column output widths, seeded with each column's name length.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnWidths {
    widths: HashMap<String, usize>,
}

impl ColumnWidths {
    pub fn new<S: AsRef<str>>(names: &[S]) -> Self {
        let widths = names
            .iter()
            .map(|name| {
                let name = name.as_ref();
                (name.to_string(), name.chars().count())
            })
            .collect();
        Self { widths }
    }

    /// Widen `name` to at least `width` characters.
    pub fn observe(&mut self, name: &str, width: usize) {
        let current = self
            .widths
            .entry(name.to_string())
            .or_insert_with(|| name.chars().count());
        if *current < width {
            *current = width;
        }
    }

    /// Final width of `name`; unknown columns have width zero.
    pub fn get(&self, name: &str) -> usize {
        self.widths.get(name).copied().unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn span(columns: &[Column], name: &str) -> (usize, usize) {
        let c = columns.iter().find(|c| c.name == name).unwrap();
        (c.start, c.end)
    }

    #[test]
    fn test_spans_include_padding() {
        let header = "Name   Age City";
        let columns = resolve_header_columns(header, &["Name", "Age", "City"]).unwrap();
        assert_eq!(columns.len(), 3);
        assert_eq!(span(&columns, "Name"), (0, 7));
        assert_eq!(span(&columns, "Age"), (7, 11));
        assert_eq!(span(&columns, "City"), (11, 15));
        assert_eq!(columns[0].width(), 7);
    }

    #[test]
    fn test_missing_column_skipped() {
        let columns = resolve_header_columns("Name Age", &["Name", "Zip", "Age"]).unwrap();
        let names: Vec<&str> = columns.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Name", "Age"]);
    }

    #[test]
    fn test_names_with_spaces() {
        let header = "Credit Limit Zip  ";
        let columns = resolve_header_columns(header, &["Zip", "Credit Limit"]).unwrap();
        assert_eq!(span(&columns, "Credit Limit"), (0, 13));
        assert_eq!(span(&columns, "Zip"), (13, 18));
    }

    #[test]
    fn test_prefix_names_do_not_overlap() {
        let header = "Int8 Int16 Int";
        let columns = resolve_header_columns(header, &["Int", "Int8", "Int16"]).unwrap();
        assert_eq!(span(&columns, "Int8"), (0, 5));
        assert_eq!(span(&columns, "Int16"), (5, 11));
        assert_eq!(span(&columns, "Int"), (11, 14));
    }

    #[test]
    fn test_offsets_count_characters() {
        let header = "Név  Kor";
        let columns = resolve_header_columns(header, &["Név", "Kor"]).unwrap();
        assert_eq!(span(&columns, "Név"), (0, 5));
        assert_eq!(span(&columns, "Kor"), (5, 8));
    }

    #[test]
    fn test_invalid_pattern() {
        let err = resolve_header_columns("Float32", &[")Float32"]).unwrap_err();
        match err {
            CodecError::Pattern { column, .. } => assert_eq!(column, ")Float32"),
            other => panic!("Expected Pattern, got {other:?}"),
        }
    }

    #[test]
    fn test_names_are_unescaped_patterns() {
        // `(USD)` is a group matching `USD`, so the literal header text is never found.
        let columns = resolve_header_columns("Price (USD) Qty", &["Price (USD)", "Qty"]).unwrap();
        let names: Vec<&str> = columns.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Qty"]);

        let columns = resolve_header_columns("Price USD Qty", &["Price (USD)"]).unwrap();
        assert_eq!(span(&columns, "Price (USD)"), (0, 10));
    }

    #[test]
    fn test_duplicate_names_resolve_once() {
        let columns = resolve_header_columns("String Int", &["String", "Int", "String"]).unwrap();
        assert_eq!(columns.len(), 2);
    }

    #[test]
    fn test_widths_seeded_by_name() {
        let mut widths = ColumnWidths::new(&["Name", "Credit Limit"]);
        assert_eq!(widths.get("Name"), 4);
        widths.observe("Name", 2);
        assert_eq!(widths.get("Name"), 4);
        widths.observe("Name", 11);
        assert_eq!(widths.get("Name"), 11);
        widths.observe("Credit Limit", 3);
        assert_eq!(widths.get("Credit Limit"), 12);
        assert_eq!(widths.get("Other"), 0);
    }
}
